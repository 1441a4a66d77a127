//! Integration tests for leaderboard and personal stats.
//!
//! Validates the ordering property: given {A:5, B:9, C:1}, the top two
//! are B then A, with C excluded; ties break on ascending user id.

use std::sync::Arc;

use taskcaster::engine::AssignmentEngine;
use taskcaster::persistence::{db, ledger_repo::LedgerRepo};

async fn engine() -> (AssignmentEngine, LedgerRepo) {
    let pool = Arc::new(db::connect_memory().await.expect("db"));
    (
        AssignmentEngine::new(Arc::clone(&pool), 10),
        LedgerRepo::new(pool),
    )
}

#[tokio::test]
async fn top_two_excludes_the_trailing_user() {
    let (engine, ledger) = engine().await;

    for (user, count) in [("U_A", 5), ("U_B", 9), ("U_C", 1)] {
        ledger.adjust_stat(user, count).await.expect("seed stat");
    }

    let top = engine.leaderboard(2).await.expect("leaderboard");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].user_id, "U_B");
    assert_eq!(top[0].completed_tasks, 9);
    assert_eq!(top[1].user_id, "U_A");
    assert_eq!(top[1].completed_tasks, 5);
}

#[tokio::test]
async fn ties_break_on_ascending_user_id() {
    let (engine, ledger) = engine().await;

    for user in ["U_C", "U_A", "U_B"] {
        ledger.adjust_stat(user, 7).await.expect("seed stat");
    }

    let top = engine.leaderboard(3).await.expect("leaderboard");
    let ids: Vec<&str> = top.iter().map(|s| s.user_id.as_str()).collect();
    assert_eq!(ids, vec!["U_A", "U_B", "U_C"]);
}

#[tokio::test]
async fn stat_for_unknown_user_is_zero() {
    let (engine, _) = engine().await;

    assert_eq!(engine.stat_for("U_NOBODY").await.expect("stat"), 0);
}

#[tokio::test]
async fn registration_appears_on_the_leaderboard_with_zero() {
    let (engine, _) = engine().await;

    engine.register_user("U_NEW").await.expect("register");

    let top = engine.leaderboard(10).await.expect("leaderboard");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].user_id, "U_NEW");
    assert_eq!(top[0].completed_tasks, 0);
}
