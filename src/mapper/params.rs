//! Catalog parameter name → canonical attribute mapping
//!
//! The map itself is configuration: a default is embedded in the binary and a
//! replacement can be loaded from YAML. Each entry names the raw parameter
//! spellings it accepts, the attribute it produces, and how to read the value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::core::embedded::embedded_str;
use crate::core::units::{extract_length_mm, extract_numeric_value, extract_plain_number};
use crate::entities::PartCategory;
use crate::mapper::transform::ValueTransform;
use crate::yaml::{parse_yaml_file, parse_yaml_str, YamlError};

/// How a raw value is turned into a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitFamily {
    Capacitance,
    Resistance,
    Inductance,
    Voltage,
    Current,
    Power,
    Frequency,
    Time,
    Charge,
    /// Leading number, unscaled (°C)
    Temperature,
    /// Millimetres; never SI-prefix scaled
    Length,
    /// Leading number, unscaled (percentages, counts, levels)
    Plain,
    /// No numeric value
    #[default]
    Text,
}

impl UnitFamily {
    /// Numeric value of `raw` in this family's base unit
    pub fn extract(&self, raw: &str) -> Option<f64> {
        match self {
            UnitFamily::Text => None,
            UnitFamily::Length => extract_length_mm(raw),
            UnitFamily::Temperature | UnitFamily::Plain => extract_plain_number(raw),
            UnitFamily::Capacitance
            | UnitFamily::Resistance
            | UnitFamily::Inductance
            | UnitFamily::Voltage
            | UnitFamily::Current
            | UnitFamily::Power
            | UnitFamily::Frequency
            | UnitFamily::Time
            | UnitFamily::Charge => extract_numeric_value(raw),
        }
    }
}

/// One raw-parameter → attribute entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamMapping {
    /// Raw parameter names this entry accepts (case-insensitive)
    pub names: Vec<String>,

    pub attribute_id: String,

    pub attribute_name: String,

    #[serde(default)]
    pub unit: UnitFamily,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<ValueTransform>,

    /// Restrict to parts whose subcategory contains one of these
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<String>,
}

impl ParamMapping {
    fn accepts(&self, raw_name: &str, subcategory: &str) -> bool {
        let name_matches = self.names.iter().any(|n| n.eq_ignore_ascii_case(raw_name.trim()));
        if !name_matches {
            return false;
        }
        if self.subcategories.is_empty() {
            return true;
        }
        let sub = subcategory.to_lowercase();
        self.subcategories
            .iter()
            .any(|s| sub.contains(&s.to_lowercase()))
    }
}

/// Per-category parameter mappings plus a shared list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamMap {
    /// Applied to every category after the category's own entries
    #[serde(default)]
    pub common: Vec<ParamMapping>,

    #[serde(default)]
    pub categories: HashMap<PartCategory, Vec<ParamMapping>>,
}

impl ParamMap {
    /// The map compiled into the binary
    pub fn embedded() -> Result<Self, YamlError> {
        let source = embedded_str("param_map.yaml").unwrap_or_default();
        parse_yaml_str(&source, "param_map.yaml")
    }

    /// Load a replacement map from disk
    pub fn load(path: &Path) -> Result<Self, YamlError> {
        parse_yaml_file(path)
    }

    /// Entries that apply to a category, category-specific first
    pub fn entries_for(&self, category: PartCategory) -> impl Iterator<Item = &ParamMapping> {
        self.categories
            .get(&category)
            .into_iter()
            .flatten()
            .chain(self.common.iter())
    }

    /// Find the entry for a raw parameter; also returns its 1-based position
    pub fn lookup(
        &self,
        category: PartCategory,
        subcategory: &str,
        raw_name: &str,
    ) -> Option<(u32, &ParamMapping)> {
        self.entries_for(category)
            .enumerate()
            .find(|(_, m)| m.accepts(raw_name, subcategory))
            .map(|(i, m)| (i as u32 + 1, m))
    }

    /// Unit family of a canonical attribute, for values entered by hand
    pub fn unit_for(&self, category: PartCategory, attribute_id: &str) -> Option<UnitFamily> {
        self.entries_for(category)
            .find(|m| m.attribute_id == attribute_id)
            .map(|m| m.unit)
    }

    /// Number of entries that apply to a category
    pub fn len_for(&self, category: PartCategory) -> u32 {
        self.entries_for(category).count() as u32
    }
}

/// Identifier for a parameter the map does not know
pub fn slugify(raw_name: &str) -> String {
    let mut slug = String::with_capacity(raw_name.len());
    let mut last_underscore = true;
    for c in raw_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_underscore = false;
        } else if !last_underscore {
            slug.push('_');
            last_underscore = true;
        }
    }
    slug.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_map_parses() {
        let map = ParamMap::embedded().unwrap();
        assert!(!map.common.is_empty());
        assert!(map.categories.contains_key(&PartCategory::Capacitors));
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let map = ParamMap::embedded().unwrap();
        let (_, entry) = map
            .lookup(PartCategory::Capacitors, "MLCC", "capacitance")
            .unwrap();
        assert_eq!(entry.attribute_id, "capacitance");
        assert_eq!(entry.unit, UnitFamily::Capacitance);
    }

    #[test]
    fn test_subcategory_restriction() {
        let map = ParamMap::embedded().unwrap();
        let (_, aluminum) = map
            .lookup(PartCategory::Capacitors, "Aluminum Electrolytic", "Size / Dimension")
            .unwrap();
        assert_eq!(aluminum.attribute_id, "diameter");
        let (_, mlcc) = map
            .lookup(PartCategory::Capacitors, "MLCC", "Size / Dimension")
            .unwrap();
        assert_eq!(mlcc.attribute_id, "size");
    }

    #[test]
    fn test_common_entries_apply_everywhere() {
        let map = ParamMap::embedded().unwrap();
        for category in PartCategory::all() {
            assert!(map.lookup(*category, "", "Packaging").is_some());
        }
    }

    #[test]
    fn test_unit_for() {
        let map = ParamMap::embedded().unwrap();
        assert_eq!(
            map.unit_for(PartCategory::Capacitors, "voltage_rated"),
            Some(UnitFamily::Voltage)
        );
        assert_eq!(map.unit_for(PartCategory::Capacitors, "no_such_attribute"), None);
    }

    #[test]
    fn test_unit_family_extract() {
        assert_eq!(UnitFamily::Text.extract("10V"), None);
        assert_eq!(UnitFamily::Temperature.extract("125°C"), Some(125.0));
        assert_eq!(UnitFamily::Length.extract("0.035\" (0.90mm)"), Some(0.90));
        assert_eq!(UnitFamily::Voltage.extract("50V"), Some(50.0));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Voltage - Rated"), "voltage_rated");
        assert_eq!(slugify("Height - Seated (Max)"), "height_seated_max");
        assert_eq!(slugify("  Q @ Freq "), "q_freq");
    }
}
