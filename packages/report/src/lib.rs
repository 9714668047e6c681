#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report service.
//!
//! Sits between the HTTP layer and the store. Each province has exactly
//! one record which moves between two states:
//!
//! ```text
//! Empty --update--> Populated --update--> Populated
//!   ^                   |
//!   +------reset--------+
//! ```
//!
//! Updates are full-record replacements and are rejected for province
//! codes the store does not already hold; nothing here ever creates a row
//! except [`initialize`].

use chrono::Utc;
use sitrep_database::{DbError, queries};
use sitrep_province_models::ProvinceRegistry;
use sitrep_report_models::{ReportFields, ReportRecord};
use switchy_database::Database;
use thiserror::Error;

/// Errors from report service operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required input was missing. Raised before the store is touched.
    #[error("Missing required field: {field}")]
    Validation {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The province code has no report row.
    #[error("Province not found: {province_code}")]
    ProvinceNotFound {
        /// The unknown province code.
        province_code: String,
    },

    /// No report row has the given id.
    #[error("Report not found: {id}")]
    ReportNotFound {
        /// The unknown row id.
        id: i64,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] DbError),
}

impl ReportError {
    /// Returns `true` for either not-found variant.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProvinceNotFound { .. } | Self::ReportNotFound { .. }
        )
    }
}

/// Seeds one empty record per registry province.
///
/// Existing records are kept. Returns the number of records created.
///
/// # Errors
///
/// Returns [`ReportError::Store`] if seeding fails.
pub async fn initialize(
    db: &dyn Database,
    registry: &ProvinceRegistry,
) -> Result<u64, ReportError> {
    let created = queries::seed_provinces(db, &registry.provinces(), Utc::now()).await?;
    if created > 0 {
        log::info!("Seeded {created} empty province report(s)");
    }
    Ok(created)
}

/// Replaces every field of a province's report.
///
/// The fields are normalized first (casualty and alert invariants, blank
/// text). Returns the number of records affected, which is 1 on success.
///
/// # Errors
///
/// * [`ReportError::Validation`] if the province code is blank
/// * [`ReportError::ProvinceNotFound`] if the store holds no record for it
/// * [`ReportError::Store`] if the store fails
pub async fn update(
    db: &dyn Database,
    province_code: &str,
    fields: ReportFields,
) -> Result<u64, ReportError> {
    let province_code = province_code.trim();
    if province_code.is_empty() {
        return Err(ReportError::Validation { field: "province" });
    }

    if !queries::province_exists(db, province_code).await? {
        return Err(ReportError::ProvinceNotFound {
            province_code: province_code.to_string(),
        });
    }

    let fields = fields.normalized();
    let affected = queries::update_report(db, province_code, &fields, Utc::now()).await?;

    // The row can vanish between the existence check and the update if an
    // administrator deletes it concurrently.
    if affected == 0 {
        return Err(ReportError::ProvinceNotFound {
            province_code: province_code.to_string(),
        });
    }

    log::info!("Updated report for province {province_code}");
    Ok(affected)
}

/// Returns a province's record, or `None` if the store has no row for it.
///
/// # Errors
///
/// Returns [`ReportError::Store`] if the store fails.
pub async fn get_by_province(
    db: &dyn Database,
    province_code: &str,
) -> Result<Option<ReportRecord>, ReportError> {
    Ok(queries::get_report_by_province(db, province_code.trim()).await?)
}

/// Returns every record, most recently updated first.
///
/// # Errors
///
/// Returns [`ReportError::Store`] if the store fails.
pub async fn get_all(db: &dyn Database) -> Result<Vec<ReportRecord>, ReportError> {
    Ok(queries::get_all_reports(db).await?)
}

/// Permanently removes one record.
///
/// # Errors
///
/// * [`ReportError::ReportNotFound`] if no record has this id
/// * [`ReportError::Store`] if the store fails
pub async fn delete_one(db: &dyn Database, id: i64) -> Result<(), ReportError> {
    if !queries::delete_report(db, id).await? {
        return Err(ReportError::ReportNotFound { id });
    }
    log::warn!("Deleted report {id}");
    Ok(())
}

/// Permanently removes every record. Returns the number removed.
///
/// # Errors
///
/// Returns [`ReportError::Store`] if the store fails.
pub async fn delete_all(db: &dyn Database) -> Result<u64, ReportError> {
    let deleted = queries::delete_all_reports(db).await?;
    log::warn!("Deleted all reports ({deleted} removed)");
    Ok(deleted)
}

/// Returns every record to the Empty state, keeping the rows.
///
/// Returns the number of records reset.
///
/// # Errors
///
/// Returns [`ReportError::Store`] if the store fails.
pub async fn reset_all(db: &dyn Database) -> Result<u64, ReportError> {
    let reset = queries::reset_all_reports(db, Utc::now()).await?;
    log::info!("Reset {reset} report(s) to defaults");
    Ok(reset)
}

/// Marks every record as archived without altering its data.
///
/// Returns the number of records archived.
///
/// # Errors
///
/// Returns [`ReportError::Store`] if the store fails.
pub async fn archive_all(db: &dyn Database) -> Result<u64, ReportError> {
    let archived = queries::archive_all_reports(db, Utc::now()).await?;
    log::info!("Archived {archived} report(s)");
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use sitrep_database::open_db;
    use sitrep_province_models::Province;
    use sitrep_report_models::{AlertKind, Casualties};

    use super::*;

    async fn seeded_db() -> (Box<dyn Database>, PathBuf) {
        let path =
            std::env::temp_dir().join(format!("sitrep_report_test_{}.db", uuid::Uuid::new_v4()));
        let db = open_db(&path).await.unwrap();
        let registry = ProvinceRegistry::from_provinces([
            Province::new("1600", "Agusan del Norte"),
            Province::new("1601", "Agusan del Sur"),
        ]);
        assert_eq!(initialize(db.as_ref(), &registry).await.unwrap(), 2);
        (db, path)
    }

    #[tokio::test]
    async fn seeded_provinces_are_found_empty() {
        let (db, path) = seeded_db().await;

        for code in ["1600", "1601"] {
            let record = get_by_province(db.as_ref(), code).await.unwrap();
            let record = record.expect("seeded province should have a record");
            assert!(record.is_empty());
        }
        assert!(get_by_province(db.as_ref(), "1602").await.unwrap().is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn unknown_province_is_rejected_and_store_unchanged() {
        let (db, path) = seeded_db().await;
        let before = get_all(db.as_ref()).await.unwrap();

        let err = update(
            db.as_ref(),
            "9999",
            ReportFields {
                affected_families: 5,
                ..ReportFields::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReportError::ProvinceNotFound { ref province_code } if province_code == "9999"));
        assert!(err.is_not_found());

        let after = get_all(db.as_ref()).await.unwrap();
        assert_eq!(before, after);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn blank_province_is_a_validation_error() {
        let (db, path) = seeded_db().await;

        let err = update(db.as_ref(), "  ", ReportFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Validation { field: "province" }));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn update_is_idempotent() {
        let (db, path) = seeded_db().await;
        let fields = ReportFields {
            situation_overview: Some("Minor cracks on Butuan bridge".to_string()),
            affected_families: 2,
            affected_persons: 9,
            ..ReportFields::default()
        };

        update(db.as_ref(), "1600", fields.clone()).await.unwrap();
        let first = get_by_province(db.as_ref(), "1600").await.unwrap().unwrap();
        update(db.as_ref(), "1600", fields).await.unwrap();
        let second = get_by_province(db.as_ref(), "1600").await.unwrap().unwrap();

        assert_eq!(first.fields, second.fields);
        assert_eq!(first.id, second.id);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn invariants_hold_on_persisted_record() {
        let (db, path) = seeded_db().await;
        let mut fields = ReportFields {
            casualties: Casualties {
                no_casualties: true,
                injured: 3,
                wounded: 2,
                dead: 1,
            },
            ..ReportFields::default()
        };
        fields
            .alerts
            .set(AlertKind::Tsunami, false, Some("stale remark".to_string()));

        assert_eq!(update(db.as_ref(), "1601", fields).await.unwrap(), 1);

        let record = get_by_province(db.as_ref(), "1601").await.unwrap().unwrap();
        assert_eq!(record.fields.casualties.injured, 0);
        assert_eq!(record.fields.casualties.wounded, 0);
        assert_eq!(record.fields.casualties.dead, 0);
        assert_eq!(record.fields.alerts.tsunami_remarks, None);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn reset_returns_every_record_to_empty() {
        let (db, path) = seeded_db().await;
        update(
            db.as_ref(),
            "1600",
            ReportFields {
                damaged_totally: 7,
                ..ReportFields::default()
            },
        )
        .await
        .unwrap();

        let before = get_all(db.as_ref()).await.unwrap().len();
        assert_eq!(reset_all(db.as_ref()).await.unwrap(), 2);

        let records = get_all(db.as_ref()).await.unwrap();
        assert_eq!(records.len(), before);
        assert!(records.iter().all(ReportRecord::is_empty));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (db, path) = seeded_db().await;

        let err = delete_one(db.as_ref(), 424_242).await.unwrap_err();
        assert!(matches!(err, ReportError::ReportNotFound { id: 424_242 }));
        assert_eq!(delete_all(db.as_ref()).await.unwrap(), 2);

        let _ = std::fs::remove_file(&path);
    }
}
