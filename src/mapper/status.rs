//! Lifecycle status normalization

use crate::entities::PartStatus;

/// Known spellings, compared lowercase after trimming
const STATUS_SYNONYMS: &[(&str, PartStatus)] = &[
    ("active", PartStatus::Active),
    ("in production", PartStatus::Active),
    ("obsolete", PartStatus::Obsolete),
    ("discontinued", PartStatus::Discontinued),
    ("not recommended for new designs", PartStatus::Nrnd),
    ("not for new designs", PartStatus::Nrnd),
    ("nrnd", PartStatus::Nrnd),
    ("last time buy", PartStatus::LastTimeBuy),
    ("ltb", PartStatus::LastTimeBuy),
];

/// Map a raw lifecycle string to a `PartStatus`
///
/// Exact synonyms first, then phrase containment for vendor variants such
/// as "Discontinued at Supplier". Anything unrecognized is Active.
pub fn normalize_status(raw: Option<&str>) -> PartStatus {
    let Some(raw) = raw else {
        return PartStatus::Active;
    };
    let lower = raw.trim().to_lowercase();

    if let Some((_, status)) = STATUS_SYNONYMS.iter().find(|(name, _)| *name == lower) {
        return *status;
    }

    if lower.contains("not recommended") || lower.contains("not for new") {
        PartStatus::Nrnd
    } else if lower.contains("last time") {
        PartStatus::LastTimeBuy
    } else if lower.contains("discontinued") {
        PartStatus::Discontinued
    } else if lower.contains("obsolete") {
        PartStatus::Obsolete
    } else {
        PartStatus::Active
    }
}
