#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Situation report record types.
//!
//! A province's report is always submitted and stored as a complete form:
//! every update replaces every field. [`ReportFields::normalize`] enforces
//! the field-level invariants before anything reaches the store:
//!
//! - the no-casualties flag forces the casualty counts to zero
//! - an inactive alert never keeps a remark
//! - blank free text is stored as `None`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sitrep_province_models::Province;
use strum_macros::{AsRefStr, EnumString};

/// Earthquake intensity on the PHIVOLCS Earthquake Intensity Scale (PEIS).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Intensity {
    /// Scarcely perceptible
    I = 1,
    /// Slightly felt
    II = 2,
    /// Weak
    III = 3,
    /// Moderately strong
    IV = 4,
    /// Strong
    V = 5,
    /// Very strong
    VI = 6,
    /// Destructive
    VII = 7,
    /// Very destructive
    VIII = 8,
    /// Devastating
    IX = 9,
    /// Completely devastating
    X = 10,
}

impl Intensity {
    /// Returns the numeric level (1-10).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns the roman numeral for this level, the same text used on the
    /// wire and in the store.
    #[must_use]
    pub fn numeral(&self) -> &str {
        self.as_ref()
    }

    /// Returns the PEIS description of this level.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::I => "Scarcely Perceptible",
            Self::II => "Slightly Felt",
            Self::III => "Weak",
            Self::IV => "Moderately Strong",
            Self::V => "Strong",
            Self::VI => "Very Strong",
            Self::VII => "Destructive",
            Self::VIII => "Very Destructive",
            Self::IX => "Devastating",
            Self::X => "Completely Devastating",
        }
    }

    /// Parses either the bare numeral (`"V"`) or the display form
    /// (`"Intensity V - Strong"`).
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let label = label.strip_prefix("Intensity ").unwrap_or(label);
        let numeral = label.split_whitespace().next()?;
        numeral.parse().ok()
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Intensity {} - {}", self.numeral(), self.description())
    }
}

/// The five advisories a province reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    Tsunami,
    Suspension,
    Gale,
    Power,
    Water,
}

impl AlertKind {
    /// Returns all variants in briefing order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Tsunami,
            Self::Suspension,
            Self::Gale,
            Self::Power,
            Self::Water,
        ]
    }

    /// Human-readable label used in rendered reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tsunami => "Tsunami Alert",
            Self::Suspension => "Work and Class Suspension",
            Self::Gale => "Gale Warning",
            Self::Power => "Power Interruption",
            Self::Water => "Water Interruption",
        }
    }

    /// Phrase shown in the briefing when the alert has no remark.
    #[must_use]
    pub fn none_phrase(self) -> String {
        format!("No {}", self.label())
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Casualty counts for a province.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Casualties {
    /// When set, the three counts are forced to zero.
    #[serde(default, deserialize_with = "null_as_default")]
    pub no_casualties: bool,
    /// Number of injured persons.
    #[serde(default, deserialize_with = "null_as_default")]
    pub injured: u32,
    /// Number of wounded persons.
    #[serde(default, deserialize_with = "null_as_default")]
    pub wounded: u32,
    /// Number of dead.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dead: u32,
}

impl Casualties {
    /// Zeroes the counts when the no-casualties flag is set.
    pub fn normalize(&mut self) {
        if self.no_casualties {
            self.injured = 0;
            self.wounded = 0;
            self.dead = 0;
        }
    }

    /// Returns `true` if there is nothing to report (flag set or every
    /// count zero).
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.no_casualties || (self.injured == 0 && self.wounded == 0 && self.dead == 0)
    }
}

/// Alert flags and their remarks.
///
/// Flat on the wire to match the report form: `tsunamiAlert` /
/// `tsunamiRemarks`, `suspensionAlert` / `suspensionRemarks`, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alerts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tsunami_alert: bool,
    #[serde(default)]
    pub tsunami_remarks: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suspension_alert: bool,
    #[serde(default)]
    pub suspension_remarks: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gale_warning: bool,
    #[serde(default)]
    pub gale_remarks: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub power_interruption: bool,
    #[serde(default)]
    pub power_remarks: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub water_interruption: bool,
    #[serde(default)]
    pub water_remarks: Option<String>,
}

impl Alerts {
    /// Returns whether the given alert is raised.
    #[must_use]
    pub const fn is_active(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::Tsunami => self.tsunami_alert,
            AlertKind::Suspension => self.suspension_alert,
            AlertKind::Gale => self.gale_warning,
            AlertKind::Power => self.power_interruption,
            AlertKind::Water => self.water_interruption,
        }
    }

    /// Returns the remark for the given alert, if any.
    #[must_use]
    pub fn remarks(&self, kind: AlertKind) -> Option<&str> {
        match kind {
            AlertKind::Tsunami => self.tsunami_remarks.as_deref(),
            AlertKind::Suspension => self.suspension_remarks.as_deref(),
            AlertKind::Gale => self.gale_remarks.as_deref(),
            AlertKind::Power => self.power_remarks.as_deref(),
            AlertKind::Water => self.water_remarks.as_deref(),
        }
    }

    /// Sets an alert's flag and remark.
    pub fn set(&mut self, kind: AlertKind, active: bool, remarks: Option<String>) {
        let (flag, slot) = self.slot_mut(kind);
        *flag = active;
        *slot = remarks;
    }

    /// Clears the remark of every inactive alert and blanks empty remarks.
    pub fn normalize(&mut self) {
        for kind in AlertKind::all() {
            let (flag, remarks) = self.slot_mut(*kind);
            if *flag {
                *remarks = clean_text(remarks.take());
            } else {
                *remarks = None;
            }
        }
    }

    /// Returns `true` if any alert is raised.
    #[must_use]
    pub fn any_active(&self) -> bool {
        AlertKind::all().iter().any(|k| self.is_active(*k))
    }

    fn slot_mut(&mut self, kind: AlertKind) -> (&mut bool, &mut Option<String>) {
        match kind {
            AlertKind::Tsunami => (&mut self.tsunami_alert, &mut self.tsunami_remarks),
            AlertKind::Suspension => (&mut self.suspension_alert, &mut self.suspension_remarks),
            AlertKind::Gale => (&mut self.gale_warning, &mut self.gale_remarks),
            AlertKind::Power => (&mut self.power_interruption, &mut self.power_remarks),
            AlertKind::Water => (&mut self.water_interruption, &mut self.water_remarks),
        }
    }
}

/// Every tracked field of a province's situation report.
///
/// This is the complete form as submitted by a field office. Absent or
/// `null` counts and flags deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFields {
    /// Free-text situation narrative.
    #[serde(default)]
    pub situation_overview: Option<String>,
    /// Reported earthquake intensity.
    #[serde(default, deserialize_with = "intensity_label")]
    pub intensity: Option<Intensity>,
    /// Free-text coordination notes.
    #[serde(default)]
    pub coordination_notes: Option<String>,
    /// Number of affected families.
    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_families: u32,
    /// Number of affected persons.
    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_persons: u32,
    /// Totally damaged houses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub damaged_totally: u32,
    /// Partially damaged houses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub damaged_partially: u32,
    #[serde(flatten)]
    pub casualties: Casualties,
    #[serde(flatten)]
    pub alerts: Alerts,
}

impl ReportFields {
    /// Applies the field invariants in place.
    pub fn normalize(&mut self) {
        self.situation_overview = clean_text(self.situation_overview.take());
        self.coordination_notes = clean_text(self.coordination_notes.take());
        self.casualties.normalize();
        self.alerts.normalize();
    }

    /// Consumes and returns the normalized fields.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Returns `true` if every field is at its default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A stored report: one row per province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    /// Row identifier.
    pub id: i64,
    /// The province this record belongs to.
    pub province: Province,
    #[serde(flatten)]
    pub fields: ReportFields,
    /// When the record was last archived. Cleared by update and reset.
    pub archived_at: Option<DateTime<Utc>>,
    /// When the row was seeded.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated or reset.
    pub updated_at: DateTime<Utc>,
}

impl ReportRecord {
    /// Returns `true` if the province has not reported yet (or was reset).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Trims free text, mapping blank strings to `None`.
#[must_use]
pub fn clean_text(text: Option<String>) -> Option<String> {
    text.and_then(|t| {
        let trimmed = t.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == t.len() {
            Some(t)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn intensity_label<'de, D>(deserializer: D) -> Result<Option<Intensity>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(label) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if label.trim().is_empty() {
        return Ok(None);
    }
    Intensity::parse_label(&label)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown intensity: {label}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_casualties_zeroes_counts() {
        let mut fields = ReportFields {
            casualties: Casualties {
                no_casualties: true,
                injured: 4,
                wounded: 2,
                dead: 1,
            },
            ..ReportFields::default()
        };
        fields.normalize();
        assert_eq!(
            fields.casualties,
            Casualties {
                no_casualties: true,
                injured: 0,
                wounded: 0,
                dead: 0,
            }
        );
    }

    #[test]
    fn casualty_counts_kept_without_flag() {
        let mut casualties = Casualties {
            no_casualties: false,
            injured: 3,
            wounded: 0,
            dead: 1,
        };
        casualties.normalize();
        assert_eq!(casualties.injured, 3);
        assert_eq!(casualties.dead, 1);
        assert!(!casualties.is_none());
    }

    #[test]
    fn inactive_alert_drops_remark() {
        let mut alerts = Alerts::default();
        alerts.set(AlertKind::Gale, false, Some("Signal no. 2".to_string()));
        alerts.set(AlertKind::Power, true, Some("  Grid down in Butuan ".to_string()));
        alerts.set(AlertKind::Water, true, Some("   ".to_string()));
        alerts.normalize();

        assert_eq!(alerts.remarks(AlertKind::Gale), None);
        assert!(!alerts.is_active(AlertKind::Gale));
        assert_eq!(alerts.remarks(AlertKind::Power), Some("Grid down in Butuan"));
        assert!(alerts.is_active(AlertKind::Water));
        assert_eq!(alerts.remarks(AlertKind::Water), None);
    }

    #[test]
    fn absent_and_null_counts_default_to_zero() {
        let fields: ReportFields = serde_json::from_str(
            r#"{
                "situationOverview": "Tremors felt",
                "affectedFamilies": null,
                "injured": null,
                "tsunamiAlert": null
            }"#,
        )
        .unwrap();

        assert_eq!(fields.affected_families, 0);
        assert_eq!(fields.affected_persons, 0);
        assert_eq!(fields.casualties.injured, 0);
        assert!(!fields.alerts.tsunami_alert);
        assert_eq!(fields.situation_overview.as_deref(), Some("Tremors felt"));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let result = serde_json::from_str::<ReportFields>(r#"{"dead": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn flat_wire_format() {
        let fields: ReportFields = serde_json::from_str(
            r#"{
                "intensity": "vii",
                "affectedFamilies": 3,
                "affectedPersons": 12,
                "noCasualties": false,
                "wounded": 2,
                "tsunamiAlert": true,
                "tsunamiRemarks": "Evacuate coastal barangays"
            }"#,
        )
        .unwrap();

        assert_eq!(fields.intensity, Some(Intensity::VII));
        assert_eq!(fields.casualties.wounded, 2);
        assert_eq!(
            fields.alerts.remarks(AlertKind::Tsunami),
            Some("Evacuate coastal barangays")
        );

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["intensity"], "VII");
        assert_eq!(json["affectedPersons"], 12);
        assert_eq!(json["tsunamiAlert"], true);
        assert_eq!(json["galeRemarks"], serde_json::Value::Null);
    }

    #[test]
    fn blank_intensity_is_none() {
        let fields: ReportFields = serde_json::from_str(r#"{"intensity": ""}"#).unwrap();
        assert_eq!(fields.intensity, None);
        assert!(serde_json::from_str::<ReportFields>(r#"{"intensity": "XI"}"#).is_err());
    }

    #[test]
    fn intensity_labels() {
        assert_eq!(Intensity::V.to_string(), "Intensity V - Strong");
        assert_eq!(Intensity::parse_label("Intensity V - Strong"), Some(Intensity::V));
        assert_eq!(Intensity::parse_label("ix"), Some(Intensity::IX));
        assert_eq!(Intensity::parse_label(""), None);
        for level in 1..=10u8 {
            let found = [
                Intensity::I,
                Intensity::II,
                Intensity::III,
                Intensity::IV,
                Intensity::V,
                Intensity::VI,
                Intensity::VII,
                Intensity::VIII,
                Intensity::IX,
                Intensity::X,
            ]
            .into_iter()
            .find(|i| i.value() == level)
            .unwrap();
            assert_eq!(Intensity::parse_label(found.numeral()), Some(found));
        }
    }

    #[test]
    fn numeral_matches_wire_form() {
        assert_eq!(Intensity::VIII.numeral(), "VIII");
        assert_eq!(
            serde_json::to_string(&Intensity::IV).unwrap(),
            format!("\"{}\"", Intensity::IV.numeral())
        );
        assert_eq!("ix".parse::<Intensity>().unwrap().numeral(), "IX");
    }

    #[test]
    fn blank_text_is_none() {
        let fields = ReportFields {
            situation_overview: Some("   ".to_string()),
            coordination_notes: Some(" MDRRMO on standby ".to_string()),
            ..ReportFields::default()
        }
        .normalized();
        assert_eq!(fields.situation_overview, None);
        assert_eq!(fields.coordination_notes.as_deref(), Some("MDRRMO on standby"));
        assert!(!fields.is_empty());
        assert!(ReportFields::default().is_empty());
    }
}
