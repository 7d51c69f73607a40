//! Part entity - canonical component identity plus its parametric attributes
//!
//! A `PartAttributes` value is the unit of comparison for the matching engine.
//! It is built fresh from every catalog fetch and never mutated in place;
//! helpers that "add" a parameter return a new value.

use serde::{Deserialize, Serialize};

/// Manufacturer placeholder used whenever the catalog record lacks one
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// Top-level component category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartCategory {
    Capacitors,
    Resistors,
    Inductors,
    Diodes,
    Transistors,
    Connectors,
    Protection,
    #[default]
    #[serde(rename = "ICs")]
    Ics,
}

impl PartCategory {
    /// All categories in display order
    pub fn all() -> &'static [PartCategory] {
        &[
            PartCategory::Capacitors,
            PartCategory::Resistors,
            PartCategory::Inductors,
            PartCategory::Diodes,
            PartCategory::Transistors,
            PartCategory::Connectors,
            PartCategory::Protection,
            PartCategory::Ics,
        ]
    }
}

impl std::fmt::Display for PartCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartCategory::Capacitors => write!(f, "Capacitors"),
            PartCategory::Resistors => write!(f, "Resistors"),
            PartCategory::Inductors => write!(f, "Inductors"),
            PartCategory::Diodes => write!(f, "Diodes"),
            PartCategory::Transistors => write!(f, "Transistors"),
            PartCategory::Connectors => write!(f, "Connectors"),
            PartCategory::Protection => write!(f, "Protection"),
            PartCategory::Ics => write!(f, "ICs"),
        }
    }
}

impl std::str::FromStr for PartCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "capacitors" => Ok(PartCategory::Capacitors),
            "resistors" => Ok(PartCategory::Resistors),
            "inductors" => Ok(PartCategory::Inductors),
            "diodes" => Ok(PartCategory::Diodes),
            "transistors" => Ok(PartCategory::Transistors),
            "connectors" => Ok(PartCategory::Connectors),
            "protection" => Ok(PartCategory::Protection),
            "ics" => Ok(PartCategory::Ics),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Lifecycle status of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartStatus {
    #[default]
    Active,
    Obsolete,
    Discontinued,
    #[serde(rename = "NRND")]
    Nrnd,
    LastTimeBuy,
}

impl PartStatus {
    /// True when the part can still be designed in
    pub fn is_active(&self) -> bool {
        matches!(self, PartStatus::Active)
    }
}

impl std::fmt::Display for PartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartStatus::Active => write!(f, "Active"),
            PartStatus::Obsolete => write!(f, "Obsolete"),
            PartStatus::Discontinued => write!(f, "Discontinued"),
            PartStatus::Nrnd => write!(f, "NRND"),
            PartStatus::LastTimeBuy => write!(f, "Last Time Buy"),
        }
    }
}

/// Identity and descriptive facts about a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Manufacturer part number (deduplication key)
    pub mpn: String,

    /// Manufacturer name ("Unknown" when the catalog omits it)
    pub manufacturer: String,

    /// Short free-text description
    #[serde(default)]
    pub description: String,

    /// Longer free-text description, when the catalog has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,

    /// Top-level category
    #[serde(default)]
    pub category: PartCategory,

    /// Finer family label (e.g. "MLCC")
    #[serde(default)]
    pub subcategory: String,

    /// Lifecycle status
    #[serde(default)]
    pub status: PartStatus,

    /// Catalog vendor's own part number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_part_number: Option<String>,

    /// Unit price in the catalog currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// Stock on hand at the vendor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasheet_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Manufacturer series name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

impl Default for Part {
    fn default() -> Self {
        Self {
            mpn: String::new(),
            manufacturer: UNKNOWN_MANUFACTURER.to_string(),
            description: String::new(),
            detailed_description: None,
            category: PartCategory::default(),
            subcategory: String::new(),
            status: PartStatus::default(),
            vendor_part_number: None,
            unit_price: None,
            quantity_available: None,
            product_url: None,
            datasheet_url: None,
            image_url: None,
            series: None,
        }
    }
}

impl Part {
    /// Create a part with identity fields set and everything else defaulted
    pub fn new(
        mpn: impl Into<String>,
        manufacturer: impl Into<String>,
        category: PartCategory,
        subcategory: impl Into<String>,
    ) -> Self {
        Self {
            mpn: mpn.into(),
            manufacturer: manufacturer.into(),
            category,
            subcategory: subcategory.into(),
            ..Default::default()
        }
    }

    /// Set the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Description and detailed description joined, for keyword searches
    pub fn full_text(&self) -> String {
        match &self.detailed_description {
            Some(detail) if !detail.is_empty() => format!("{} {}", self.description, detail),
            _ => self.description.clone(),
        }
    }
}

/// Lightweight view of a part for list displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSummary {
    pub mpn: String,
    pub manufacturer: String,
    pub description: String,
    pub category: PartCategory,
    pub subcategory: String,
    pub status: PartStatus,
}

impl From<&Part> for PartSummary {
    fn from(part: &Part) -> Self {
        Self {
            mpn: part.mpn.clone(),
            manufacturer: part.manufacturer.clone(),
            description: part.description.clone(),
            category: part.category,
            subcategory: part.subcategory.clone(),
            status: part.status,
        }
    }
}

/// One named engineering value of a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricAttribute {
    /// Stable key (e.g. "capacitance")
    pub attribute_id: String,

    /// Display name
    pub attribute_name: String,

    /// Value as written in the catalog
    pub value: String,

    /// Value in SI base units; absent when the raw value is not numeric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,

    #[serde(default)]
    pub sort_order: u32,
}

impl ParametricAttribute {
    /// Create a text-only attribute
    pub fn text(
        attribute_id: impl Into<String>,
        attribute_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            attribute_name: attribute_name.into(),
            value: value.into(),
            numeric_value: None,
            sort_order: 0,
        }
    }

    /// Create an attribute with a parsed numeric value
    pub fn numeric(
        attribute_id: impl Into<String>,
        attribute_name: impl Into<String>,
        value: impl Into<String>,
        numeric_value: f64,
    ) -> Self {
        Self {
            numeric_value: Some(numeric_value),
            ..Self::text(attribute_id, attribute_name, value)
        }
    }
}

/// A part plus its ordered parametric attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartAttributes {
    pub part: Part,

    /// Ordered attributes; identifiers are unique within one part
    #[serde(default)]
    pub parameters: Vec<ParametricAttribute>,
}

impl PartAttributes {
    pub fn new(part: Part, parameters: Vec<ParametricAttribute>) -> Self {
        Self { part, parameters }
    }

    /// Look up an attribute by identifier
    pub fn get(&self, attribute_id: &str) -> Option<&ParametricAttribute> {
        self.parameters
            .iter()
            .find(|p| p.attribute_id == attribute_id)
    }

    /// Whether an attribute with this identifier exists
    pub fn has(&self, attribute_id: &str) -> bool {
        self.get(attribute_id).is_some()
    }

    /// Return a copy with `attribute` set, replacing any existing value with the same id
    pub fn with_parameter(&self, mut attribute: ParametricAttribute) -> Self {
        let mut parameters = self.parameters.clone();
        match parameters
            .iter_mut()
            .find(|p| p.attribute_id == attribute.attribute_id)
        {
            Some(existing) => {
                attribute.sort_order = existing.sort_order;
                *existing = attribute;
            }
            None => {
                if attribute.sort_order == 0 {
                    attribute.sort_order = parameters
                        .iter()
                        .map(|p| p.sort_order)
                        .max()
                        .unwrap_or(0)
                        + 1;
                }
                parameters.push(attribute);
            }
        }
        Self {
            part: self.part.clone(),
            parameters,
        }
    }

    pub fn summary(&self) -> PartSummary {
        PartSummary::from(&self.part)
    }
}
