//! Unit tests for Slack Block Kit builders.
//!
//! Verifies that the builders embed the action ids and values the
//! interaction dispatcher routes on, by inspecting the serialized payloads.

use chrono::Utc;
use taskcaster::engine::TaskPage;
use taskcaster::models::stat::UserStat;
use taskcaster::models::task::Task;
use taskcaster::slack::blocks;

fn task(id: i64, text: &str) -> Task {
    Task {
        id,
        text: text.into(),
        created_at: Utc::now(),
    }
}

fn page(tasks: Vec<Task>, page: usize, total_pages: usize, total: usize) -> TaskPage {
    TaskPage {
        tasks,
        page,
        total_pages,
        total,
    }
}

#[test]
fn offer_blocks_carry_task_text_and_both_buttons() {
    let rendered = blocks::offer_blocks("U123", &task(42, "walk the dog"));
    let json = serde_json::to_string(&rendered).expect("serialize");

    assert!(json.contains("walk the dog"));
    assert!(json.contains("offer_accept"));
    assert!(json.contains("offer_decline"));
}

#[test]
fn offer_buttons_value_scopes_user_and_task() {
    let rendered = blocks::offer_buttons("U123", 42);
    let json = serde_json::to_string(&rendered).expect("serialize");

    assert!(
        json.contains("U123:42"),
        "offer value must carry user_id:task_id"
    );
}

#[test]
fn catalog_blocks_empty_catalog_renders_notice() {
    let rendered = blocks::catalog_blocks(&page(vec![], 0, 0, 0), true);
    let json = serde_json::to_string(&rendered).expect("serialize");

    assert!(json.contains("empty"));
    assert!(!json.contains("task_delete"));
}

#[test]
fn catalog_blocks_delete_view_has_per_task_controls() {
    let tasks = vec![task(1, "first"), task(2, "second")];
    let rendered = blocks::catalog_blocks(&page(tasks, 0, 1, 2), true);
    let json = serde_json::to_string(&rendered).expect("serialize");

    assert!(json.contains("task_delete"));
    // Delete values carry task id and current page for in-place refresh.
    assert!(json.contains("1:0"));
    assert!(json.contains("2:0"));
}

#[test]
fn catalog_blocks_listing_view_has_no_delete_controls() {
    let tasks = vec![task(1, "first")];
    let rendered = blocks::catalog_blocks(&page(tasks, 0, 1, 1), false);
    let json = serde_json::to_string(&rendered).expect("serialize");

    assert!(!json.contains("task_delete"));
}

#[test]
fn catalog_blocks_middle_page_has_both_nav_buttons() {
    let tasks = vec![task(11, "middle")];
    let rendered = blocks::catalog_blocks(&page(tasks, 1, 3, 21), false);
    let json = serde_json::to_string(&rendered).expect("serialize");

    assert!(json.contains("tasks_prev"));
    assert!(json.contains("tasks_next"));
    assert!(json.contains("list:0"));
    assert!(json.contains("list:2"));
}

#[test]
fn catalog_blocks_first_page_has_no_previous() {
    let tasks = vec![task(1, "first")];
    let rendered = blocks::catalog_blocks(&page(tasks, 0, 2, 11), true);
    let json = serde_json::to_string(&rendered).expect("serialize");

    assert!(!json.contains("tasks_prev"));
    assert!(json.contains("tasks_next"));
    assert!(json.contains("delete:1"));
}

#[test]
fn stats_message_lists_leaderboard_in_order() {
    let top = vec![
        UserStat {
            user_id: "U_B".into(),
            completed_tasks: 9,
        },
        UserStat {
            user_id: "U_A".into(),
            completed_tasks: 5,
        },
    ];

    let message = blocks::stats_message(3, &top);

    assert!(message.starts_with("You have 3 completed task(s)."));
    let b_pos = message.find("U_B").expect("U_B present");
    let a_pos = message.find("U_A").expect("U_A present");
    assert!(b_pos < a_pos, "leaderboard order must be preserved");
}

#[test]
fn stats_message_without_leaderboard_is_personal_only() {
    let message = blocks::stats_message(0, &[]);
    assert_eq!(message, "You have 0 completed task(s).");
}
