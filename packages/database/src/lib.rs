#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `SQLite` report store for situation reports.
//!
//! One `reports` row exists per province. Rows are seeded empty when the
//! store is initialized and afterwards only ever updated in place, reset,
//! or archived; bulk deletion exists for administrative cleanup only.
//!
//! Uses `switchy_database` with the `rusqlite` backend for all database
//! operations.

pub mod db;
pub mod paths;
pub mod queries;

use chrono::{DateTime, SecondsFormat, Utc};

pub use db::open_db;

/// Errors that can occur during report store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// The database could not be opened.
    #[error("Failed to open database: {0}")]
    Open(String),

    /// An I/O operation failed (e.g., creating the database directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Formats a timestamp the way it is stored in the `reports` table.
///
/// Fixed microsecond precision keeps the text lexicographically ordered,
/// which `ORDER BY updated_at` relies on.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if the text is not RFC 3339.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DbError::Conversion {
            message: format!("Invalid timestamp '{text}': {e}"),
        })
}
