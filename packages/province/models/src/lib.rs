#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Province and municipality reference data.
//!
//! The set of reporting provinces is fixed for a deployment and never
//! created or destroyed at runtime. The default registry is embedded from
//! `provinces.toml` at compile time; custom registries (e.g. a reduced
//! province set for a drill) can be built with
//! [`ProvinceRegistry::from_provinces`].

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Number of provinces in the embedded registry. Enforced by a test.
#[cfg(test)]
const EXPECTED_PROVINCE_COUNT: usize = 5;

/// Embedded TOML registry of the CARAGA provinces.
const PROVINCES_TOML: &str = include_str!("../provinces.toml");

static CARAGA: LazyLock<ProvinceRegistry> = LazyLock::new(|| {
    toml::de::from_str(PROVINCES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded province registry: {e}"))
});

/// A reporting province, identified by its regionally assigned code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Province {
    /// Stable province code (e.g. `"1600"`).
    pub code: String,
    /// Display name (e.g. `"Agusan del Norte"`).
    pub name: String,
}

impl Province {
    /// Creates a new province reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A city or municipality (local government unit) within a province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    /// Municipality code, prefixed by the owning province's code.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// A province together with its municipalities, as defined in the
/// registry TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceDefinition {
    /// Province code.
    pub code: String,
    /// Province display name.
    pub name: String,
    /// Cities and municipalities of this province.
    #[serde(default)]
    pub municipalities: Vec<Municipality>,
}

impl ProvinceDefinition {
    /// Returns the lightweight [`Province`] reference for this definition.
    #[must_use]
    pub fn province(&self) -> Province {
        Province::new(&self.code, &self.name)
    }
}

/// Lookup table of the provinces known to a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceRegistry {
    provinces: Vec<ProvinceDefinition>,
}

impl ProvinceRegistry {
    /// Returns the embedded CARAGA region registry.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. Since it is a
    /// compile-time constant, a parse failure indicates a development
    /// error and is caught by tests.
    #[must_use]
    pub fn caraga() -> &'static Self {
        &CARAGA
    }

    /// Builds a registry from a plain province list (no municipalities).
    #[must_use]
    pub fn from_provinces(provinces: impl IntoIterator<Item = Province>) -> Self {
        Self {
            provinces: provinces
                .into_iter()
                .map(|p| ProvinceDefinition {
                    code: p.code,
                    name: p.name,
                    municipalities: Vec::new(),
                })
                .collect(),
        }
    }

    /// Returns all provinces in registry order.
    #[must_use]
    pub fn provinces(&self) -> Vec<Province> {
        self.provinces
            .iter()
            .map(ProvinceDefinition::province)
            .collect()
    }

    /// Returns the full province definitions.
    #[must_use]
    pub fn definitions(&self) -> &[ProvinceDefinition] {
        &self.provinces
    }

    /// Looks up a province by code.
    #[must_use]
    pub fn province(&self, code: &str) -> Option<Province> {
        self.definition(code).map(ProvinceDefinition::province)
    }

    /// Returns the display name for a province code.
    #[must_use]
    pub fn province_name(&self, code: &str) -> Option<&str> {
        self.definition(code).map(|d| d.name.as_str())
    }

    /// Returns `true` if the code belongs to a known province.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.definition(code).is_some()
    }

    /// Returns the municipalities of a province.
    ///
    /// Unknown province codes yield an empty slice.
    #[must_use]
    pub fn municipalities(&self, province_code: &str) -> &[Municipality] {
        self.definition(province_code)
            .map(|d| d.municipalities.as_slice())
            .unwrap_or_default()
    }

    /// Returns the display name of a municipality within a province.
    #[must_use]
    pub fn municipality_name(&self, province_code: &str, municipality_code: &str) -> Option<&str> {
        self.municipalities(province_code)
            .iter()
            .find(|m| m.code == municipality_code)
            .map(|m| m.name.as_str())
    }

    /// Number of provinces in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    /// Returns `true` if the registry has no provinces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    fn definition(&self, code: &str) -> Option<&ProvinceDefinition> {
        self.provinces.iter().find(|d| d.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_provinces() {
        let registry = ProvinceRegistry::caraga();
        assert_eq!(
            registry.len(),
            EXPECTED_PROVINCE_COUNT,
            "Expected {EXPECTED_PROVINCE_COUNT} provinces, found {}. \
             Update EXPECTED_PROVINCE_COUNT after editing provinces.toml.",
            registry.len()
        );
    }

    #[test]
    fn province_codes_are_unique() {
        let mut seen = BTreeSet::new();
        for province in ProvinceRegistry::caraga().provinces() {
            assert!(
                seen.insert(province.code.clone()),
                "Duplicate province code: {}",
                province.code
            );
        }
    }

    #[test]
    fn municipality_codes_are_prefixed_by_province() {
        for def in ProvinceRegistry::caraga().definitions() {
            assert!(!def.municipalities.is_empty(), "{} has no LGUs", def.name);
            for lgu in &def.municipalities {
                assert!(
                    lgu.code.starts_with(&def.code),
                    "{} ({}) is listed under {} ({})",
                    lgu.name,
                    lgu.code,
                    def.name,
                    def.code
                );
            }
        }
    }

    #[test]
    fn lookups() {
        let registry = ProvinceRegistry::caraga();
        assert_eq!(registry.province_name("1600"), Some("Agusan del Norte"));
        assert_eq!(registry.province_name("1685"), Some("Dinagat Islands"));
        assert_eq!(registry.province_name("9999"), None);
        assert!(registry.municipalities("9999").is_empty());
        assert_eq!(
            registry.municipality_name("1601", "160102"),
            Some("Bayugan City")
        );
        assert_eq!(registry.municipality_name("1600", "160102"), None);
    }

    #[test]
    fn custom_registry() {
        let registry = ProvinceRegistry::from_provinces([
            Province::new("1600", "Agusan del Norte"),
            Province::new("1601", "Agusan del Sur"),
        ]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("1601"));
        assert!(!registry.contains("1602"));
        assert!(registry.municipalities("1600").is_empty());
    }
}
