//! Report store queries.
//!
//! Every data column is listed once in [`DATA_COLUMNS`]; the update and
//! reset statements are generated from it so the full-record replace and
//! the reset can never drift apart from the schema.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use moosicbox_json_utils::database::ToValue as _;
use sitrep_province_models::Province;
use sitrep_report_models::{Alerts, Casualties, Intensity, ReportFields, ReportRecord};
use switchy_database::{Database, DatabaseValue, Row};

use crate::{DbError, format_timestamp, parse_timestamp};

/// Storage class of a data column, which decides its reset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    /// Nullable free text, reset to `NULL`.
    Text,
    /// Non-negative count or boolean flag, reset to `0`.
    Integer,
}

/// Data columns in the order [`field_values`] produces them.
const DATA_COLUMNS: &[(&str, ColumnKind)] = &[
    ("situation_overview", ColumnKind::Text),
    ("intensity", ColumnKind::Text),
    ("coordination_notes", ColumnKind::Text),
    ("affected_families", ColumnKind::Integer),
    ("affected_persons", ColumnKind::Integer),
    ("damaged_totally", ColumnKind::Integer),
    ("damaged_partially", ColumnKind::Integer),
    ("no_casualties", ColumnKind::Integer),
    ("injured", ColumnKind::Integer),
    ("wounded", ColumnKind::Integer),
    ("dead", ColumnKind::Integer),
    ("tsunami_alert", ColumnKind::Integer),
    ("tsunami_remarks", ColumnKind::Text),
    ("suspension_alert", ColumnKind::Integer),
    ("suspension_remarks", ColumnKind::Text),
    ("gale_warning", ColumnKind::Integer),
    ("gale_remarks", ColumnKind::Text),
    ("power_interruption", ColumnKind::Integer),
    ("power_remarks", ColumnKind::Text),
    ("water_interruption", ColumnKind::Integer),
    ("water_remarks", ColumnKind::Text),
];

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Inserts one empty report row per province.
///
/// Existing rows are left untouched, so this is safe to call on every
/// startup. Returns the number of rows created.
///
/// # Errors
///
/// Returns [`DbError`] if any insert fails.
pub async fn seed_provinces(
    db: &dyn Database,
    provinces: &[Province],
    now: DateTime<Utc>,
) -> Result<u64, DbError> {
    let now = format_timestamp(now);
    let mut inserted = 0u64;

    for province in provinces {
        inserted += db
            .exec_raw_params(
                "INSERT INTO reports (province_code, province_name, created_at, updated_at)
                 VALUES ($1, $2, $3, $3)
                 ON CONFLICT (province_code) DO NOTHING",
                &[
                    DatabaseValue::String(province.code.clone()),
                    DatabaseValue::String(province.name.clone()),
                    DatabaseValue::String(now.clone()),
                ],
            )
            .await?;
    }

    Ok(inserted)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Replaces every data field of a province's row.
///
/// Clears `archived_at` and refreshes `updated_at`. Never inserts: an
/// unknown province code affects zero rows. Returns the number of rows
/// affected (0 or 1).
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn update_report(
    db: &dyn Database,
    province_code: &str,
    fields: &ReportFields,
    now: DateTime<Utc>,
) -> Result<u64, DbError> {
    let mut sql = String::from("UPDATE reports SET ");
    for (i, (column, _)) in DATA_COLUMNS.iter().enumerate() {
        write!(sql, "{column} = ${}, ", i + 1).unwrap();
    }
    let n = DATA_COLUMNS.len();
    write!(
        sql,
        "archived_at = NULL, updated_at = ${} WHERE province_code = ${}",
        n + 1,
        n + 2
    )
    .unwrap();

    let mut params = field_values(fields);
    debug_assert_eq!(params.len(), n);
    params.push(DatabaseValue::String(format_timestamp(now)));
    params.push(DatabaseValue::String(province_code.to_string()));

    Ok(db.exec_raw_params(&sql, &params).await?)
}

/// Resets every data field of every row to its default.
///
/// Province binding and row identity are preserved, `archived_at` is
/// cleared and `updated_at` refreshed. Returns the number of rows reset.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn reset_all_reports(db: &dyn Database, now: DateTime<Utc>) -> Result<u64, DbError> {
    let mut sql = String::from("UPDATE reports SET ");
    for (column, kind) in DATA_COLUMNS {
        let value = match kind {
            ColumnKind::Text => "NULL",
            ColumnKind::Integer => "0",
        };
        write!(sql, "{column} = {value}, ").unwrap();
    }
    sql.push_str("archived_at = NULL, updated_at = $1");

    Ok(db
        .exec_raw_params(&sql, &[DatabaseValue::String(format_timestamp(now))])
        .await?)
}

/// Stamps every row's `archived_at`. Report data is left untouched.
///
/// Returns the number of rows archived.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn archive_all_reports(db: &dyn Database, now: DateTime<Utc>) -> Result<u64, DbError> {
    Ok(db
        .exec_raw_params(
            "UPDATE reports SET archived_at = $1",
            &[DatabaseValue::String(format_timestamp(now))],
        )
        .await?)
}

/// Deletes a single row by id. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn delete_report(db: &dyn Database, id: i64) -> Result<bool, DbError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM reports WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    Ok(deleted > 0)
}

/// Deletes every row. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn delete_all_reports(db: &dyn Database) -> Result<u64, DbError> {
    Ok(db.exec_raw_params("DELETE FROM reports", &[]).await?)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns the report row for a province, if one exists.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be decoded.
pub async fn get_report_by_province(
    db: &dyn Database,
    province_code: &str,
) -> Result<Option<ReportRecord>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM reports WHERE province_code = $1",
            &[DatabaseValue::String(province_code.to_string())],
        )
        .await?;

    rows.first().map(record_from_row).transpose()
}

/// Returns every report row, most recently updated first.
///
/// Rows updated at the same instant are ordered by province code.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be decoded.
pub async fn get_all_reports(db: &dyn Database) -> Result<Vec<ReportRecord>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM reports ORDER BY updated_at DESC, province_code ASC",
            &[],
        )
        .await?;

    rows.iter().map(record_from_row).collect()
}

/// Returns `true` if a row exists for the province code.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn province_exists(db: &dyn Database, province_code: &str) -> Result<bool, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) as cnt FROM reports WHERE province_code = $1",
            &[DatabaseValue::String(province_code.to_string())],
        )
        .await?;

    let count = read_cnt(&rows)?;

    Ok(count > 0)
}

/// Returns the total number of report rows.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn count_reports(db: &dyn Database) -> Result<u64, DbError> {
    let rows = db
        .query_raw_params("SELECT COUNT(*) as cnt FROM reports", &[])
        .await?;

    let count = read_cnt(&rows)?;

    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

fn field_values(fields: &ReportFields) -> Vec<DatabaseValue> {
    let alerts = &fields.alerts;
    vec![
        text(fields.situation_overview.as_deref()),
        text(fields.intensity.as_ref().map(Intensity::numeral)),
        text(fields.coordination_notes.as_deref()),
        count(fields.affected_families),
        count(fields.affected_persons),
        count(fields.damaged_totally),
        count(fields.damaged_partially),
        flag(fields.casualties.no_casualties),
        count(fields.casualties.injured),
        count(fields.casualties.wounded),
        count(fields.casualties.dead),
        flag(alerts.tsunami_alert),
        text(alerts.tsunami_remarks.as_deref()),
        flag(alerts.suspension_alert),
        text(alerts.suspension_remarks.as_deref()),
        flag(alerts.gale_warning),
        text(alerts.gale_remarks.as_deref()),
        flag(alerts.power_interruption),
        text(alerts.power_remarks.as_deref()),
        flag(alerts.water_interruption),
        text(alerts.water_remarks.as_deref()),
    ]
}

fn text(value: Option<&str>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |v| DatabaseValue::String(v.to_string()))
}

fn count(value: u32) -> DatabaseValue {
    DatabaseValue::Int64(i64::from(value))
}

fn flag(value: bool) -> DatabaseValue {
    DatabaseValue::Int64(i64::from(value))
}

fn record_from_row(row: &Row) -> Result<ReportRecord, DbError> {
    let intensity = match read_text(row, "intensity")? {
        Some(label) => Some(
            Intensity::parse_label(&label).ok_or_else(|| DbError::Conversion {
                message: format!("Unknown intensity '{label}'"),
            })?,
        ),
        None => None,
    };

    let fields = ReportFields {
        situation_overview: read_text(row, "situation_overview")?,
        intensity,
        coordination_notes: read_text(row, "coordination_notes")?,
        affected_families: read_count(row, "affected_families")?,
        affected_persons: read_count(row, "affected_persons")?,
        damaged_totally: read_count(row, "damaged_totally")?,
        damaged_partially: read_count(row, "damaged_partially")?,
        casualties: Casualties {
            no_casualties: read_flag(row, "no_casualties")?,
            injured: read_count(row, "injured")?,
            wounded: read_count(row, "wounded")?,
            dead: read_count(row, "dead")?,
        },
        alerts: Alerts {
            tsunami_alert: read_flag(row, "tsunami_alert")?,
            tsunami_remarks: read_text(row, "tsunami_remarks")?,
            suspension_alert: read_flag(row, "suspension_alert")?,
            suspension_remarks: read_text(row, "suspension_remarks")?,
            gale_warning: read_flag(row, "gale_warning")?,
            gale_remarks: read_text(row, "gale_remarks")?,
            power_interruption: read_flag(row, "power_interruption")?,
            power_remarks: read_text(row, "power_remarks")?,
            water_interruption: read_flag(row, "water_interruption")?,
            water_remarks: read_text(row, "water_remarks")?,
        },
    };

    let id: i64 = row.to_value("id").map_err(|e| conversion("id", &e))?;
    let code: String = row
        .to_value("province_code")
        .map_err(|e| conversion("province_code", &e))?;
    let name: String = row
        .to_value("province_name")
        .map_err(|e| conversion("province_name", &e))?;
    let created_at: String = row
        .to_value("created_at")
        .map_err(|e| conversion("created_at", &e))?;
    let updated_at: String = row
        .to_value("updated_at")
        .map_err(|e| conversion("updated_at", &e))?;
    let archived_at = read_text(row, "archived_at")?
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    Ok(ReportRecord {
        id,
        province: Province::new(code, name),
        fields,
        archived_at,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn read_text(row: &Row, column: &str) -> Result<Option<String>, DbError> {
    let value: Option<String> = row.to_value(column).map_err(|e| conversion(column, &e))?;
    Ok(value)
}

fn read_count(row: &Row, column: &str) -> Result<u32, DbError> {
    let value: i64 = row.to_value(column).map_err(|e| conversion(column, &e))?;
    u32::try_from(value).map_err(|_| DbError::Conversion {
        message: format!("Column {column} out of range: {value}"),
    })
}

fn read_flag(row: &Row, column: &str) -> Result<bool, DbError> {
    let value: i64 = row.to_value(column).map_err(|e| conversion(column, &e))?;
    Ok(value != 0)
}

/// Reads the `cnt` column of a `COUNT(*)` result. No rows counts as zero.
fn read_cnt(rows: &[Row]) -> Result<i64, DbError> {
    rows.first().map_or(Ok(0), |row| {
        row.to_value("cnt").map_err(|e| conversion("cnt", &e))
    })
}

fn conversion(column: &str, e: &impl std::fmt::Display) -> DbError {
    DbError::Conversion {
        message: format!("Failed to read column {column}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Duration;
    use sitrep_report_models::AlertKind;

    use super::*;
    use crate::open_db;

    async fn test_db() -> (Box<dyn Database>, PathBuf) {
        let path = std::env::temp_dir().join(format!("sitrep_db_test_{}.db", uuid::Uuid::new_v4()));
        let db = open_db(&path).await.unwrap();
        let provinces = [
            Province::new("1600", "Agusan del Norte"),
            Province::new("1601", "Agusan del Sur"),
        ];
        seed_provinces(db.as_ref(), &provinces, Utc::now()).await.unwrap();
        (db, path)
    }

    fn sample_fields() -> ReportFields {
        let mut fields = ReportFields {
            situation_overview: Some("Landslides along the national highway".to_string()),
            intensity: Some(Intensity::VI),
            coordination_notes: Some("PDRRMO coordinating with MDRRMOs".to_string()),
            affected_families: 3,
            affected_persons: 11,
            damaged_totally: 1,
            damaged_partially: 4,
            casualties: Casualties {
                no_casualties: false,
                injured: 2,
                wounded: 1,
                dead: 0,
            },
            ..ReportFields::default()
        };
        fields
            .alerts
            .set(AlertKind::Power, true, Some("Outage in Cabadbaran".to_string()));
        fields
    }

    #[test]
    fn column_list_matches_field_values() {
        assert_eq!(
            field_values(&ReportFields::default()).len(),
            DATA_COLUMNS.len()
        );
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let (db, path) = test_db().await;

        let again = seed_provinces(
            db.as_ref(),
            &[Province::new("1600", "Agusan del Norte")],
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(again, 0);
        assert_eq!(count_reports(db.as_ref()).await.unwrap(), 2);

        let record = get_report_by_province(db.as_ref(), "1600")
            .await
            .unwrap()
            .unwrap();
        assert!(record.is_empty());
        assert_eq!(record.province.name, "Agusan del Norte");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let (db, path) = test_db().await;

        let affected = update_report(db.as_ref(), "1600", &sample_fields(), Utc::now())
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let record = get_report_by_province(db.as_ref(), "1600")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.fields, sample_fields());

        // A second full update with a sparse form clears what it omits.
        let sparse = ReportFields {
            affected_families: 1,
            ..ReportFields::default()
        };
        update_report(db.as_ref(), "1600", &sparse, Utc::now())
            .await
            .unwrap();
        let record = get_report_by_province(db.as_ref(), "1600")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.fields, sparse);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn update_unknown_province_affects_nothing() {
        let (db, path) = test_db().await;

        let affected = update_report(db.as_ref(), "9999", &sample_fields(), Utc::now())
            .await
            .unwrap();
        assert_eq!(affected, 0);
        assert_eq!(count_reports(db.as_ref()).await.unwrap(), 2);
        assert!(!province_exists(db.as_ref(), "9999").await.unwrap());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn get_all_orders_by_most_recent_update() {
        let (db, path) = test_db().await;
        let later = Utc::now() + Duration::seconds(5);

        update_report(db.as_ref(), "1601", &sample_fields(), later)
            .await
            .unwrap();

        let records = get_all_reports(db.as_ref()).await.unwrap();
        let codes: Vec<&str> = records.iter().map(|r| r.province.code.as_str()).collect();
        assert_eq!(codes, vec!["1601", "1600"]);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn reset_keeps_rows_and_clears_data() {
        let (db, path) = test_db().await;

        update_report(db.as_ref(), "1600", &sample_fields(), Utc::now())
            .await
            .unwrap();
        archive_all_reports(db.as_ref(), Utc::now()).await.unwrap();

        let reset = reset_all_reports(db.as_ref(), Utc::now()).await.unwrap();
        assert_eq!(reset, 2);

        let records = get_all_reports(db.as_ref()).await.unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.is_empty(), "{} not reset", record.province.code);
            assert_eq!(record.archived_at, None);
        }

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn archive_stamps_without_touching_data() {
        let (db, path) = test_db().await;

        update_report(db.as_ref(), "1600", &sample_fields(), Utc::now())
            .await
            .unwrap();
        let archived = archive_all_reports(db.as_ref(), Utc::now()).await.unwrap();
        assert_eq!(archived, 2);

        let record = get_report_by_province(db.as_ref(), "1600")
            .await
            .unwrap()
            .unwrap();
        assert!(record.archived_at.is_some());
        assert_eq!(record.fields, sample_fields());

        update_report(db.as_ref(), "1600", &sample_fields(), Utc::now())
            .await
            .unwrap();
        let record = get_report_by_province(db.as_ref(), "1600")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.archived_at, None);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn unreadable_count_is_an_error() {
        let (db, path) = test_db().await;

        let rows = db
            .query_raw_params("SELECT 'many' AS cnt", &[])
            .await
            .unwrap();
        assert!(matches!(read_cnt(&rows), Err(DbError::Conversion { .. })));
        assert_eq!(read_cnt(&[]).unwrap(), 0);

        assert!(province_exists(db.as_ref(), "1600").await.unwrap());
        assert!(!province_exists(db.as_ref(), "9999").await.unwrap());
        assert_eq!(count_reports(db.as_ref()).await.unwrap(), 2);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn delete_one_and_all() {
        let (db, path) = test_db().await;

        let record = get_report_by_province(db.as_ref(), "1601")
            .await
            .unwrap()
            .unwrap();
        assert!(delete_report(db.as_ref(), record.id).await.unwrap());
        assert!(!delete_report(db.as_ref(), record.id).await.unwrap());
        assert_eq!(count_reports(db.as_ref()).await.unwrap(), 1);

        assert_eq!(delete_all_reports(db.as_ref()).await.unwrap(), 1);
        assert_eq!(count_reports(db.as_ref()).await.unwrap(), 0);

        let _ = std::fs::remove_file(&path);
    }
}
