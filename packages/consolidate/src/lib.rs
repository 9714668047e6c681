#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Consolidation of province reports.
//!
//! All province records are first reduced by [`consolidate`] into one
//! normalized [`ProvinceSummary`] per province, sorted by province name.
//! Two stateless renderers then format that sequence:
//!
//! - [`render_dashboard`]: an HTML fragment for the consolidator view
//! - [`render_briefing`]: the plain-text briefing sent up the chain
//!
//! Both are pure functions of their input.

pub mod briefing;
pub mod dashboard;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sitrep_province_models::Province;
use sitrep_report_models::{ReportFields, ReportRecord};

pub use briefing::{BriefingTemplate, render_briefing};
pub use dashboard::render_dashboard;

/// Text rendered by both views when there are no records.
pub const NO_DATA: &str = "No data available";

/// One province's report, normalized for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceSummary {
    /// The reporting province.
    pub province: Province,
    /// Normalized report fields.
    #[serde(flatten)]
    pub fields: ReportFields,
    /// When the province last updated its report.
    pub updated_at: DateTime<Utc>,
}

impl ProvinceSummary {
    /// Formats the affected population line, e.g. `3 families or 1 person`.
    #[must_use]
    pub fn affected_population(&self) -> String {
        let families = self.fields.affected_families;
        let persons = self.fields.affected_persons;
        format!(
            "{families} {} or {persons} {}",
            pluralize(families, "family", "families"),
            pluralize(persons, "person", "persons"),
        )
    }

    /// Formats the damaged houses line.
    #[must_use]
    pub fn damaged_houses(&self) -> String {
        format!(
            "{} totally damaged, {} partially damaged",
            self.fields.damaged_totally, self.fields.damaged_partially
        )
    }
}

/// Groups records by province and normalizes them.
///
/// Only the first record encountered for a province name is kept; with one
/// row per province this is every record. The result is sorted by
/// province name, ascending.
#[must_use]
pub fn consolidate(records: &[ReportRecord]) -> Vec<ProvinceSummary> {
    let mut by_name: BTreeMap<&str, &ReportRecord> = BTreeMap::new();
    for record in records {
        by_name.entry(record.province.name.as_str()).or_insert(record);
    }

    by_name
        .into_values()
        .map(|record| ProvinceSummary {
            province: record.province.clone(),
            fields: record.fields.clone().normalized(),
            updated_at: record.updated_at,
        })
        .collect()
}

/// Picks the singular form for exactly one, the plural otherwise.
#[must_use]
pub const fn pluralize<'a>(count: u32, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}
