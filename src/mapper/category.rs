//! Catalog category → canonical category and subcategory
//!
//! Patterns are substring matches over category names, checked in order.
//! Specific patterns sit above generic ones: "Bridge Rectifiers" must be
//! seen before "Rectifier", "TVS" before "Diode", "PTC Resettable" before
//! "Fuse" and "Thermistor".

use tracing::debug;

use crate::entities::PartCategory;
use crate::mapper::record::CatalogCategory;

/// Ordered keyword table: (pattern, category, subcategory)
const CATEGORY_PATTERNS: &[(&str, PartCategory, &str)] = &[
    ("Bridge Rectifiers", PartCategory::Diodes, "Bridge Rectifiers"),
    ("Ceramic Capacitors", PartCategory::Capacitors, "MLCC"),
    ("Aluminum - Polymer", PartCategory::Capacitors, "Aluminum Polymer"),
    ("Aluminum Electrolytic", PartCategory::Capacitors, "Aluminum Electrolytic"),
    ("Tantalum - Polymer", PartCategory::Capacitors, "Tantalum Polymer"),
    ("Tantalum", PartCategory::Capacitors, "Tantalum"),
    ("Film Capacitors", PartCategory::Capacitors, "Film"),
    ("Capacitor", PartCategory::Capacitors, "Capacitors"),
    ("PTC Resettable", PartCategory::Protection, "PTC Resettable Fuses"),
    ("Thermistors - PTC", PartCategory::Resistors, "PTC Thermistor"),
    ("PTC Thermistor", PartCategory::Resistors, "PTC Thermistor"),
    ("Thermistor", PartCategory::Resistors, "NTC Thermistor"),
    ("Chip Resistor", PartCategory::Resistors, "Chip Resistor"),
    ("Through Hole Resistors", PartCategory::Resistors, "Through Hole Resistor"),
    ("Resistor Networks", PartCategory::Resistors, "Resistor Network"),
    ("Resistor", PartCategory::Resistors, "Resistors"),
    ("Ferrite Beads", PartCategory::Inductors, "Ferrite Beads"),
    ("Fixed Inductors", PartCategory::Inductors, "Fixed Inductors"),
    ("Inductor", PartCategory::Inductors, "Inductors"),
    ("TVS", PartCategory::Protection, "TVS Diodes"),
    ("Varistor", PartCategory::Protection, "Varistors"),
    ("Fuse", PartCategory::Protection, "Fuses"),
    ("Zener", PartCategory::Diodes, "Zener Diodes"),
    ("Schottky", PartCategory::Diodes, "Schottky Diodes"),
    ("Rectifier", PartCategory::Diodes, "Rectifiers"),
    ("Diode", PartCategory::Diodes, "Diodes"),
    ("JFET", PartCategory::Transistors, "JFETs"),
    ("MOSFET", PartCategory::Transistors, "MOSFETs"),
    ("Bipolar", PartCategory::Transistors, "BJTs"),
    ("IGBT", PartCategory::Transistors, "IGBTs"),
    ("Transistor", PartCategory::Transistors, "Transistors"),
    ("Connector", PartCategory::Connectors, "Connectors"),
    ("Headers", PartCategory::Connectors, "Headers"),
    ("Terminal Blocks", PartCategory::Connectors, "Terminal Blocks"),
    ("LDO", PartCategory::Ics, "LDO Regulators"),
    ("Switching Regulator", PartCategory::Ics, "Switching Regulators"),
    ("Voltage Reference", PartCategory::Ics, "Voltage References"),
];

/// Map a single category name through the keyword table
pub fn match_category_name(name: &str) -> Option<(PartCategory, &'static str)> {
    let lower = name.to_lowercase();
    CATEGORY_PATTERNS
        .iter()
        .find(|(pattern, _, _)| lower.contains(&pattern.to_lowercase()))
        .map(|(_, category, subcategory)| (*category, *subcategory))
}

/// Resolve a (possibly nested) catalog category
///
/// The deepest category is tried first, then its ancestors. With no match
/// the part lands in ICs with the deepest name as its subcategory.
pub fn resolve_category(category: Option<&CatalogCategory>) -> (PartCategory, String) {
    let path = category.map(CatalogCategory::path).unwrap_or_default();

    for name in path.iter().rev() {
        if let Some((category, subcategory)) = match_category_name(name) {
            return (category, subcategory.to_string());
        }
    }

    let fallback = path.last().map(|s| s.to_string()).unwrap_or_default();
    debug!(category = %fallback, "no category pattern matched, defaulting to ICs");
    (PartCategory::Ics, fallback)
}
