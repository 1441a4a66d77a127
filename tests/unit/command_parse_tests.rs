//! Unit tests for command and control-value parsing.

use taskcaster::engine::Verdict;
use taskcaster::slack::commands::{
    parse_grade_args, parse_mention, parse_task_id, parse_verdict,
};
use taskcaster::slack::handlers::catalog::{parse_delete_value, parse_nav_value};
use taskcaster::slack::handlers::offer::parse_offer_value;

#[test]
fn task_id_parses_with_surrounding_whitespace() {
    assert_eq!(parse_task_id(" 42 "), Some(42));
    assert_eq!(parse_task_id("0"), Some(0));
}

#[test]
fn task_id_rejects_non_numeric() {
    assert_eq!(parse_task_id("abc"), None);
    assert_eq!(parse_task_id("12b"), None);
    assert_eq!(parse_task_id(""), None);
}

#[test]
fn verdict_keywords_are_case_insensitive() {
    assert_eq!(parse_verdict("pass"), Some(Verdict::Pass));
    assert_eq!(parse_verdict("PASS"), Some(Verdict::Pass));
    assert_eq!(parse_verdict("Fail"), Some(Verdict::Fail));
    assert_eq!(parse_verdict("meh"), None);
}

#[test]
fn mention_with_and_without_display_name() {
    assert_eq!(parse_mention("<@U123>"), Some("U123".to_owned()));
    assert_eq!(parse_mention("<@U123|bob>"), Some("U123".to_owned()));
}

#[test]
fn mention_rejects_malformed_tokens() {
    assert_eq!(parse_mention("U123"), None);
    assert_eq!(parse_mention("<@>"), None);
    assert_eq!(parse_mention("<@U123"), None);
}

#[test]
fn grade_args_parse_verdict_then_mention() {
    let (verdict, target) = parse_grade_args("pass <@U42|ann>").expect("parse");
    assert_eq!(verdict, Verdict::Pass);
    assert_eq!(target, "U42");
}

#[test]
fn grade_args_reject_missing_pieces() {
    assert!(parse_grade_args("").is_none());
    assert!(parse_grade_args("pass").is_none());
    assert!(parse_grade_args("<@U42> pass").is_none());
    assert!(parse_grade_args("maybe <@U42>").is_none());
}

#[test]
fn offer_value_splits_owner_and_task() {
    assert_eq!(
        parse_offer_value("U123:42"),
        Some(("U123".to_owned(), 42))
    );
}

#[test]
fn offer_value_rejects_malformed() {
    assert_eq!(parse_offer_value("U123"), None);
    assert_eq!(parse_offer_value(":42"), None);
    assert_eq!(parse_offer_value("U123:x"), None);
}

#[test]
fn delete_value_splits_task_and_page() {
    assert_eq!(parse_delete_value("42:1"), Some((42, 1)));
    assert_eq!(parse_delete_value("42"), None);
    assert_eq!(parse_delete_value("x:1"), None);
}

#[test]
fn nav_value_accepts_known_views_only() {
    assert_eq!(parse_nav_value("list:2"), Some(("list".to_owned(), 2)));
    assert_eq!(
        parse_nav_value("delete:0"),
        Some(("delete".to_owned(), 0))
    );
    assert_eq!(parse_nav_value("other:1"), None);
    assert_eq!(parse_nav_value("list:x"), None);
}
