//! Unit tests for database connection bootstrap.

use taskcaster::persistence::db;

#[tokio::test]
async fn connect_creates_file_and_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("taskcaster.db");

    let pool = db::connect(&path).await.expect("connect");

    assert!(path.exists(), "database file must be created");

    // Schema is applied: the task table answers queries.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task")
        .fetch_one(&pool)
        .await
        .expect("query");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("taskcaster.db");

    let first = db::connect(&path).await.expect("first connect");
    sqlx::query("INSERT INTO task (text, created_at) VALUES ('x', '2026-01-01T00:00:00Z')")
        .execute(&first)
        .await
        .expect("insert");
    drop(first);

    // Re-running the DDL on an existing database must not clobber data.
    let second = db::connect(&path).await.expect("second connect");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task")
        .fetch_one(&second)
        .await
        .expect("query");
    assert_eq!(count, 1);
}
