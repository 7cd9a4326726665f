use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Fresh in-memory database with migrations applied. One connection only, so
/// every query in a test sees the same memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}
