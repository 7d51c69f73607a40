//! Family classifier: subcategory → base family → variant family
//!
//! Never fails. A part whose subcategory maps to no family has no family; a
//! family with no matching variant rule stays as it is.

pub mod enrich;
pub mod registry;

use serde::{Deserialize, Serialize};

use crate::entities::{Part, PartAttributes};

pub use enrich::enrich;
pub use registry::{ClassifierRegistry, Condition, VariantRule};

/// Subcategory keyword → base family, checked in order
const BASE_FAMILIES: &[(&str, &str)] = &[
    ("MLCC", "mlcc"),
    ("Aluminum Polymer", "aluminum_polymer"),
    ("Aluminum Electrolytic", "aluminum_electrolytic"),
    ("Chip Resistor", "chip_resistor"),
    ("PTC Thermistor", "ptc_thermistor"),
    ("NTC Thermistor", "ntc_thermistor"),
    ("Ferrite Bead", "ferrite_bead"),
    ("Fixed Inductor", "fixed_inductor"),
    ("Inductors", "fixed_inductor"),
    ("Schottky", "schottky_diode"),
    ("Rectifiers", "rectifier_diode"),
    ("JFET", "jfet"),
    ("MOSFET", "mosfet"),
    ("BJT", "bjt"),
    ("LDO", "ldo"),
];

/// Coarse family for a part's subcategory
pub fn base_family_for(part: &Part) -> Option<&'static str> {
    let subcategory = part.subcategory.to_lowercase();
    BASE_FAMILIES
        .iter()
        .find(|(keyword, _)| subcategory.contains(&keyword.to_lowercase()))
        .map(|(_, family)| *family)
}

/// Outcome of classifying one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub mpn: String,
    pub base_family: Option<String>,
    pub family: Option<String>,
    /// Attributes after family-specific enrichment
    pub attributes: PartAttributes,
}

/// Base-family lookup plus a variant registry
#[derive(Debug, Clone)]
pub struct FamilyClassifier {
    registry: ClassifierRegistry,
}

impl Default for FamilyClassifier {
    fn default() -> Self {
        Self::new(ClassifierRegistry::builtin())
    }
}

impl FamilyClassifier {
    pub fn new(registry: ClassifierRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ClassifierRegistry {
        &self.registry
    }

    /// Refine an explicit family id; unknown ids come back unchanged
    pub fn refine(&self, family_id: &str, attrs: &PartAttributes) -> String {
        self.registry.classify(family_id, attrs)
    }

    /// Base family, then variant refinement
    pub fn resolve_family(&self, attrs: &PartAttributes) -> Option<String> {
        base_family_for(&attrs.part).map(|base| self.refine(base, attrs))
    }

    /// Resolve the family and enrich the attributes for it
    pub fn classify(&self, attrs: &PartAttributes) -> Classification {
        let base_family = base_family_for(&attrs.part);
        let family = base_family.map(|base| self.refine(base, attrs));
        let attributes = match &family {
            Some(family) => enrich(family, attrs),
            None => attrs.clone(),
        };
        Classification {
            mpn: attrs.part.mpn.clone(),
            base_family: base_family.map(str::to_string),
            family,
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ParametricAttribute, PartCategory};

    #[test]
    fn test_base_family_for() {
        let mlcc = Part::new("X", "Y", PartCategory::Capacitors, "MLCC");
        assert_eq!(base_family_for(&mlcc), Some("mlcc"));
        let bjt = Part::new("X", "Y", PartCategory::Transistors, "BJTs");
        assert_eq!(base_family_for(&bjt), Some("bjt"));
        let unknown = Part::new("X", "Y", PartCategory::Ics, "Microcontrollers");
        assert_eq!(base_family_for(&unknown), None);
    }

    #[test]
    fn test_resolve_family_refines() {
        let classifier = FamilyClassifier::default();
        let part = Part::new("BAT54", "Nexperia", PartCategory::Diodes, "Rectifiers")
            .with_description("DIODE SCHOTTKY 30V 200MA SOT23");
        let attrs = PartAttributes::new(part, vec![]);
        assert_eq!(classifier.resolve_family(&attrs).as_deref(), Some("schottky_diode"));
    }

    #[test]
    fn test_classify_enriches_for_resolved_family() {
        let classifier = FamilyClassifier::default();
        let part = Part::new("1N4007", "onsemi", PartCategory::Diodes, "Rectifiers")
            .with_description("DIODE GEN PURP 1KV 1A DO41");
        let attrs = PartAttributes::new(
            part,
            vec![ParametricAttribute::numeric("trr", "Reverse Recovery Time", "2 µs", 2e-6)],
        );
        let result = classifier.classify(&attrs);
        assert_eq!(result.base_family.as_deref(), Some("rectifier_diode"));
        assert_eq!(result.family.as_deref(), Some("rectifier_diode"));
        assert_eq!(
            result.attributes.get("recovery_category").unwrap().value,
            "Standard"
        );
    }

    #[test]
    fn test_classify_without_family() {
        let classifier = FamilyClassifier::default();
        let attrs = PartAttributes::new(Part::default(), vec![]);
        let result = classifier.classify(&attrs);
        assert_eq!(result.family, None);
        assert_eq!(result.attributes, attrs);
    }
}
