//! Scoped variant rules
//!
//! Each rule belongs to exactly one base family and is only consulted for
//! parts currently in that family, so a keyword that means something for one
//! family can never pull a part out of an unrelated one.

use std::collections::HashMap;
use tracing::debug;

use crate::entities::PartAttributes;

/// Predicate over a part's attributes and text
#[derive(Debug, Clone)]
pub enum Condition {
    /// Numeric value present and strictly below the limit
    AttributeBelow { attribute_id: String, limit: f64 },
    /// Numeric value present and at least the limit
    AttributeAtLeast { attribute_id: String, limit: f64 },
    /// Attribute text contains the needle (case-insensitive)
    AttributeContains { attribute_id: String, needle: String },
    AttributePresent(String),
    /// Description or detailed description contains the phrase
    DescriptionContains(String),
    /// Description contains the word on word boundaries
    DescriptionWord(String),
    SubcategoryContains(String),
    /// Manufacturer part number starts with one of the base numbers
    ///
    /// A base ending in a digit never runs on into a longer number, so
    /// `2SK30` matches `2SK30ATM` but not `2SK3018`.
    MpnPrefix(Vec<String>),
    Any(Vec<Condition>),
    All(Vec<Condition>),
}

impl Condition {
    pub fn below(attribute_id: &str, limit: f64) -> Self {
        Condition::AttributeBelow {
            attribute_id: attribute_id.to_string(),
            limit,
        }
    }

    pub fn at_least(attribute_id: &str, limit: f64) -> Self {
        Condition::AttributeAtLeast {
            attribute_id: attribute_id.to_string(),
            limit,
        }
    }

    pub fn attribute_contains(attribute_id: &str, needle: &str) -> Self {
        Condition::AttributeContains {
            attribute_id: attribute_id.to_string(),
            needle: needle.to_string(),
        }
    }

    pub fn present(attribute_id: &str) -> Self {
        Condition::AttributePresent(attribute_id.to_string())
    }

    pub fn phrase(text: &str) -> Self {
        Condition::DescriptionContains(text.to_string())
    }

    pub fn word(text: &str) -> Self {
        Condition::DescriptionWord(text.to_string())
    }

    pub fn subcategory(text: &str) -> Self {
        Condition::SubcategoryContains(text.to_string())
    }

    pub fn mpn_prefix(prefixes: &[&str]) -> Self {
        Condition::MpnPrefix(prefixes.iter().map(|p| p.to_string()).collect())
    }

    /// Whether the part satisfies this condition
    pub fn matches(&self, attrs: &PartAttributes) -> bool {
        match self {
            Condition::AttributeBelow {
                attribute_id,
                limit,
            } => numeric(attrs, attribute_id).is_some_and(|v| v < *limit),
            Condition::AttributeAtLeast {
                attribute_id,
                limit,
            } => numeric(attrs, attribute_id).is_some_and(|v| v >= *limit),
            Condition::AttributeContains {
                attribute_id,
                needle,
            } => attrs
                .get(attribute_id)
                .is_some_and(|a| a.value.to_lowercase().contains(&needle.to_lowercase())),
            Condition::AttributePresent(attribute_id) => attrs.has(attribute_id),
            Condition::DescriptionContains(phrase) => attrs
                .part
                .full_text()
                .to_lowercase()
                .contains(&phrase.to_lowercase()),
            Condition::DescriptionWord(word) => contains_word(&attrs.part.full_text(), word),
            Condition::SubcategoryContains(text) => attrs
                .part
                .subcategory
                .to_lowercase()
                .contains(&text.to_lowercase()),
            Condition::MpnPrefix(prefixes) => {
                let mpn = attrs.part.mpn.to_uppercase();
                prefixes
                    .iter()
                    .any(|p| starts_with_base(&mpn, &p.to_uppercase()))
            }
            Condition::Any(conditions) => conditions.iter().any(|c| c.matches(attrs)),
            Condition::All(conditions) => conditions.iter().all(|c| c.matches(attrs)),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive whole-word search
fn contains_word(text: &str, word: &str) -> bool {
    let text = text.to_lowercase();
    let word = word.to_lowercase();
    if word.is_empty() {
        return false;
    }
    text.match_indices(&word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn starts_with_base(mpn: &str, base: &str) -> bool {
    match mpn.strip_prefix(base) {
        Some(rest) => {
            !(base.ends_with(|c: char| c.is_ascii_digit())
                && rest.starts_with(|c: char| c.is_ascii_digit()))
        }
        None => false,
    }
}

fn numeric(attrs: &PartAttributes, attribute_id: &str) -> Option<f64> {
    attrs.get(attribute_id).and_then(|a| a.numeric_value)
}

/// Narrow a base family to `family_id` when the condition holds
#[derive(Debug, Clone)]
pub struct VariantRule {
    /// Shown in logs
    pub name: String,
    pub family_id: String,
    pub condition: Condition,
}

impl VariantRule {
    pub fn new(name: impl Into<String>, family_id: impl Into<String>, condition: Condition) -> Self {
        Self {
            name: name.into(),
            family_id: family_id.into(),
            condition,
        }
    }
}

/// Variant rules grouped by the base family they refine
#[derive(Debug, Clone, Default)]
pub struct ClassifierRegistry {
    rules: HashMap<String, Vec<VariantRule>>,
}

impl ClassifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to a base family's list; earlier rules win
    pub fn register(&mut self, base_family: impl Into<String>, rule: VariantRule) {
        self.rules.entry(base_family.into()).or_default().push(rule);
    }

    /// Rules registered for a base family, in priority order
    pub fn variants_of(&self, base_family: &str) -> &[VariantRule] {
        self.rules.get(base_family).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Base families with at least one rule, sorted
    pub fn base_families(&self) -> Vec<&str> {
        let mut bases: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        bases.sort();
        bases
    }

    /// Refine `base_family`; unchanged when no rule matches
    pub fn classify(&self, base_family: &str, attrs: &PartAttributes) -> String {
        match self
            .variants_of(base_family)
            .iter()
            .find(|rule| rule.condition.matches(attrs))
        {
            Some(rule) => {
                debug!(
                    mpn = %attrs.part.mpn,
                    base = base_family,
                    rule = %rule.name,
                    family = %rule.family_id,
                    "variant rule matched"
                );
                rule.family_id.clone()
            }
            None => base_family.to_string(),
        }
    }

    /// Rules shipped with the tool
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register(
            "chip_resistor",
            VariantRule::new(
                "low-ohm resistor with sensing keyword",
                "current_sense_resistor",
                Condition::All(vec![
                    Condition::below("resistance", 1.0),
                    Condition::Any(vec![
                        Condition::phrase("current sense"),
                        Condition::phrase("current sensing"),
                        Condition::word("shunt"),
                        Condition::word("kelvin"),
                        Condition::phrase("4-terminal"),
                    ]),
                ]),
            ),
        );

        registry.register(
            "rectifier_diode",
            VariantRule::new(
                "schottky technology",
                "schottky_diode",
                Condition::Any(vec![
                    Condition::word("schottky"),
                    Condition::attribute_contains("technology", "schottky"),
                    Condition::subcategory("schottky"),
                ]),
            ),
        );
        registry.register(
            "rectifier_diode",
            VariantRule::new(
                "fast or ultrafast recovery",
                "fast_recovery_diode",
                Condition::Any(vec![
                    Condition::attribute_contains("recovery_category", "fast"),
                    Condition::below("trr", 500e-9),
                    Condition::phrase("fast recovery"),
                    Condition::word("ultrafast"),
                ]),
            ),
        );

        registry.register(
            "mosfet",
            VariantRule::new(
                "junction FET",
                "jfet",
                Condition::Any(vec![
                    Condition::mpn_prefix(JFET_MPN_PREFIXES),
                    Condition::word("jfet"),
                    Condition::attribute_contains("fet_type", "jfet"),
                    Condition::subcategory("jfet"),
                ]),
            ),
        );

        registry.register(
            "aluminum_electrolytic",
            VariantRule::new(
                "conductive polymer electrolyte",
                "aluminum_polymer",
                Condition::Any(vec![Condition::subcategory("polymer"), Condition::word("polymer")]),
            ),
        );

        registry.register(
            "fixed_inductor",
            VariantRule::new(
                "ferrite bead",
                "ferrite_bead",
                Condition::Any(vec![
                    Condition::subcategory("ferrite bead"),
                    Condition::phrase("ferrite bead"),
                    Condition::present("impedance"),
                ]),
            ),
        );

        registry.register(
            "ntc_thermistor",
            VariantRule::new(
                "positive temperature coefficient",
                "ptc_thermistor",
                Condition::Any(vec![Condition::subcategory("ptc"), Condition::word("ptc")]),
            ),
        );

        registry.register(
            "bjt",
            VariantRule::new(
                "pre-biased transistor",
                "digital_transistor",
                Condition::Any(vec![
                    Condition::present("r1"),
                    Condition::phrase("pre-biased"),
                    Condition::phrase("prebiased"),
                    Condition::word("digital"),
                ]),
            ),
        );

        registry
    }
}

/// JFETs are often filed under the MOSFET category; their part numbers are not
const JFET_MPN_PREFIXES: &[&str] = &[
    "MMBFJ", "PMBFJ", "MMBF4391", "MMBF4392", "MMBF4393", "MMBF4416", "MMBF5457", "MMBF5484",
    "BF245", "BF256", "BF545", "BF862", "2N3819", "2N4391", "2N4392", "2N4393", "2N5457",
    "2N5458", "2N5484", "2N5485", "2SK30", "2SK117", "2SK170", "2SK208", "2SK880", "2SK932",
    "LSK170", "LSK189", "J111", "J112", "J113", "J201", "J202", "J310",
];
