//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction as
//! the need arises and call through to the functions without any other changes.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod payments;
pub mod teams;

const SQLITE_DB_URL: &str = "sqlite://data/rps_store.db";

pub fn db_url() -> String {
    let result = env::var("RPS_DATABASE_URL").unwrap_or_else(|_| {
        info!("RPS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqlxError> {
    sqlx::migrate!("./src/sqlite/migrations").run(pool).await?;
    info!("Migrations complete");
    Ok(())
}

/// Whether the error is a UNIQUE constraint violation (as opposed to a connectivity or engine error).
pub fn is_unique_violation(e: &SqlxError) -> bool {
    matches!(e, SqlxError::Database(de) if de.message().contains("UNIQUE constraint failed"))
}
