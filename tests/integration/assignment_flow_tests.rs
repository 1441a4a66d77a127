//! Integration tests for the request/accept/decline flow.
//!
//! Validates:
//! - At most one assignment per user under repeated requests
//! - Empty catalog reports `NoTasksAvailable` and writes nothing
//! - Decline frees the slot with exactly one assignment at any instant
//! - Stale offer controls report `NotCurrent`

use std::sync::Arc;

use taskcaster::engine::{
    AcceptOutcome, AssignmentEngine, DeclineOutcome, RequestOutcome,
};
use taskcaster::models::task::Task;
use taskcaster::persistence::{db, ledger_repo::LedgerRepo};

async fn engine() -> (AssignmentEngine, LedgerRepo) {
    let pool = Arc::new(db::connect_memory().await.expect("db"));
    (
        AssignmentEngine::new(Arc::clone(&pool), 10),
        LedgerRepo::new(pool),
    )
}

async fn seed(engine: &AssignmentEngine, texts: &[&str]) {
    for text in texts {
        engine.add_task(text).await.expect("seed task");
    }
}

fn offered(outcome: RequestOutcome) -> Task {
    match outcome {
        RequestOutcome::Offered(task) => task,
        other => panic!("expected an offer, got {other:?}"),
    }
}

#[tokio::test]
async fn second_request_reports_already_assigned() {
    let (engine, ledger) = engine().await;
    seed(&engine, &["a", "b", "c"]).await;

    let task = offered(engine.request_task("U1").await.expect("request"));

    for _ in 0..3 {
        let outcome = engine.request_task("U1").await.expect("request");
        assert_eq!(outcome, RequestOutcome::AlreadyAssigned);
    }

    // The original assignment is still the only one on record.
    let active = ledger.active("U1").await.expect("query").expect("present");
    assert_eq!(active.task_id, task.id);
}

#[tokio::test]
async fn empty_catalog_reports_no_tasks_and_writes_nothing() {
    let (engine, ledger) = engine().await;

    let outcome = engine.request_task("U1").await.expect("request");
    assert_eq!(outcome, RequestOutcome::NoTasksAvailable);
    assert!(!ledger.has_active("U1").await.expect("query"));
}

#[tokio::test]
async fn decline_frees_the_slot() {
    let (engine, ledger) = engine().await;
    seed(&engine, &["a", "b"]).await;

    let first = offered(engine.request_task("U1").await.expect("request"));
    assert!(ledger.has_active("U1").await.expect("query"));

    let outcome = engine
        .decline_task("U1", first.id)
        .await
        .expect("decline");
    assert_eq!(outcome, DeclineOutcome::Declined);
    assert!(!ledger.has_active("U1").await.expect("query"));

    // The slot is free again: a fresh draw succeeds.
    let second = offered(engine.request_task("U1").await.expect("request"));
    let active = ledger.active("U1").await.expect("query").expect("present");
    assert_eq!(active.task_id, second.id);
}

#[tokio::test]
async fn accept_confirms_without_mutating_the_ledger() {
    let (engine, ledger) = engine().await;
    seed(&engine, &["a"]).await;

    let task = offered(engine.request_task("U1").await.expect("request"));

    let outcome = engine.accept_task("U1", task.id).await.expect("accept");
    assert_eq!(outcome, AcceptOutcome::Confirmed(task.clone()));

    // Accepting leaves the assignment in place, awaiting grading.
    assert!(ledger.has_active("U1").await.expect("query"));

    // Accepting again is equally harmless.
    let again = engine.accept_task("U1", task.id).await.expect("accept");
    assert_eq!(again, AcceptOutcome::Confirmed(task));
}

#[tokio::test]
async fn stale_offer_controls_report_not_current() {
    let (engine, _) = engine().await;
    seed(&engine, &["a"]).await;

    let task = offered(engine.request_task("U1").await.expect("request"));
    engine
        .decline_task("U1", task.id)
        .await
        .expect("decline");

    let accept = engine.accept_task("U1", task.id).await.expect("accept");
    assert_eq!(accept, AcceptOutcome::NotCurrent);

    let decline = engine
        .decline_task("U1", task.id)
        .await
        .expect("decline");
    assert_eq!(decline, DeclineOutcome::NotCurrent);

    // A control for a task the user never held is just as stale.
    let wrong = engine.accept_task("U2", task.id).await.expect("accept");
    assert_eq!(wrong, AcceptOutcome::NotCurrent);
}

#[tokio::test]
async fn lost_insert_race_reports_already_assigned() {
    let (engine, ledger) = engine().await;
    seed(&engine, &["a", "b"]).await;

    // Simulate a concurrent winner: the ledger already holds a row by the
    // time this request reaches its insert.
    assert!(ledger.assign("U1", 1).await.expect("assign"));

    let outcome = engine.request_task("U1").await.expect("request");
    assert_eq!(outcome, RequestOutcome::AlreadyAssigned);
}

#[tokio::test]
async fn users_hold_independent_assignments() {
    let (engine, ledger) = engine().await;
    seed(&engine, &["a", "b", "c"]).await;

    offered(engine.request_task("U1").await.expect("request"));
    offered(engine.request_task("U2").await.expect("request"));

    assert!(ledger.has_active("U1").await.expect("query"));
    assert!(ledger.has_active("U2").await.expect("query"));

    engine.register_user("U1").await.expect("re-register");
    assert!(
        ledger.has_active("U1").await.expect("query"),
        "re-registration must not disturb an active assignment"
    );
}
