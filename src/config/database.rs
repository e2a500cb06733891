//! Database connection pool initialization.
//!
//! The connection string is read from `DATABASE_URL`. Embedded migrations
//! under `migrations/` are applied on startup, which is also what creates
//! the unique indexes the store relies on for conflict detection.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

/// Initializes the PostgreSQL pool and applies pending migrations.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset, the database is unreachable, or a
/// migration fails. All three are startup-time operator faults.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    pool
}
