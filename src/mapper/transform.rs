//! Attribute-specific value post-processors
//!
//! Applied after generic unit extraction for the handful of parameters whose
//! catalog text needs interpretation rather than parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::units::{extract_length_mm, extract_plain_number};

static AEC_QUALIFICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)AEC-?Q\d{3}").expect("AEC regex"));

/// Post-processor selected by a parameter mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTransform {
    /// "Yes" when the text names an AEC-Q qualification, otherwise "No"
    AutomotiveFlag,
    /// Diameter from compound strings; the metric parenthetical wins
    MetricDiameter,
    /// Leading number, no SI scaling (thermistor B-value)
    Passthrough,
    /// Standard / Fast / Ultrafast from a speed rating or trr
    RecoveryCategory,
}

/// Coarse reverse-recovery speed class of a rectifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryCategory {
    Standard,
    Fast,
    Ultrafast,
}

impl RecoveryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryCategory::Standard => "Standard",
            RecoveryCategory::Fast => "Fast",
            RecoveryCategory::Ultrafast => "Ultrafast",
        }
    }

    /// Class from a measured reverse-recovery time in seconds
    pub fn from_trr(seconds: f64) -> Self {
        if seconds < 100e-9 {
            RecoveryCategory::Ultrafast
        } else if seconds < 500e-9 {
            RecoveryCategory::Fast
        } else {
            RecoveryCategory::Standard
        }
    }

    /// Class from free text such as "Fast Recovery =< 500ns, > 200mA (Io)"
    pub fn from_text(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if ["ultrafast", "ultra fast", "ultra-fast", "hyperfast", "hyper fast"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Some(RecoveryCategory::Ultrafast)
        } else if lower.contains("fast") {
            Some(RecoveryCategory::Fast)
        } else if lower.contains("standard") || lower.contains("general purpose") {
            Some(RecoveryCategory::Standard)
        } else {
            None
        }
    }
}

impl std::fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// "Yes"/"No" automotive qualification flag
pub fn automotive_flag(text: &str) -> &'static str {
    if AEC_QUALIFICATION.is_match(text) {
        "Yes"
    } else {
        "No"
    }
}

/// Apply a transform to a raw value
///
/// Returns the display value and numeric value, or `None` when the transform
/// cannot derive anything (the attribute is then left absent).
pub fn apply_transform(transform: ValueTransform, raw: &str) -> Option<(String, Option<f64>)> {
    match transform {
        ValueTransform::AutomotiveFlag => Some((automotive_flag(raw).to_string(), None)),
        ValueTransform::MetricDiameter => {
            let mm = extract_length_mm(raw);
            let value = mm
                .map(|v| format!("{:.2}mm", v))
                .unwrap_or_else(|| raw.trim().to_string());
            Some((value, mm))
        }
        ValueTransform::Passthrough => Some((raw.trim().to_string(), extract_plain_number(raw))),
        ValueTransform::RecoveryCategory => {
            RecoveryCategory::from_text(raw).map(|c| (c.as_str().to_string(), None))
        }
    }
}
