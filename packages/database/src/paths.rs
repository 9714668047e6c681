//! Default file locations for the report store.

use std::path::{Path, PathBuf};

/// Default database location, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "data/disaster_reports.db";

/// Returns the default database path.
#[must_use]
pub fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
