//! Database lifecycle: opening the `SQLite` file and creating the schema.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::DbError;

/// Opens (or creates) the report `SQLite` database at the given path and
/// ensures the schema exists.
///
/// Does not seed any rows; see [`crate::queries::seed_provinces`].
///
/// # Errors
///
/// Returns [`DbError`] if the database file cannot be created or the schema
/// DDL fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    log::debug!("Opening report database at {}", path.display());
    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Open(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Creates the `reports` table and its index if they don't already exist.
///
/// # Errors
///
/// Returns [`DbError`] if the DDL fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS reports (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            province_code       TEXT NOT NULL UNIQUE,
            province_name       TEXT NOT NULL,
            situation_overview  TEXT,
            intensity           TEXT,
            coordination_notes  TEXT,
            affected_families   INTEGER NOT NULL DEFAULT 0,
            affected_persons    INTEGER NOT NULL DEFAULT 0,
            damaged_totally     INTEGER NOT NULL DEFAULT 0,
            damaged_partially   INTEGER NOT NULL DEFAULT 0,
            no_casualties       INTEGER NOT NULL DEFAULT 0,
            injured             INTEGER NOT NULL DEFAULT 0,
            wounded             INTEGER NOT NULL DEFAULT 0,
            dead                INTEGER NOT NULL DEFAULT 0,
            tsunami_alert       INTEGER NOT NULL DEFAULT 0,
            tsunami_remarks     TEXT,
            suspension_alert    INTEGER NOT NULL DEFAULT 0,
            suspension_remarks  TEXT,
            gale_warning        INTEGER NOT NULL DEFAULT 0,
            gale_remarks        TEXT,
            power_interruption  INTEGER NOT NULL DEFAULT 0,
            power_remarks       TEXT,
            water_interruption  INTEGER NOT NULL DEFAULT 0,
            water_remarks       TEXT,
            archived_at         TEXT,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_reports_updated
         ON reports (updated_at)",
    )
    .await?;

    Ok(())
}
