//! Backfill attributes that can be inferred from other data

use tracing::debug;

use crate::entities::{ParametricAttribute, PartAttributes};
use crate::mapper::RecoveryCategory;

pub const RECOVERY_CATEGORY: &str = "recovery_category";

/// Family-specific enrichment; other families get an unchanged copy
pub fn enrich(family_id: &str, attrs: &PartAttributes) -> PartAttributes {
    match family_id {
        "rectifier_diode" | "fast_recovery_diode" => enrich_recovery_category(attrs),
        _ => attrs.clone(),
    }
}

/// Recovery category from measured trr, else description keywords
///
/// Leaves the attribute absent when neither source says anything.
pub fn enrich_recovery_category(attrs: &PartAttributes) -> PartAttributes {
    if attrs.has(RECOVERY_CATEGORY) {
        return attrs.clone();
    }

    let from_trr = attrs
        .get("trr")
        .and_then(|a| a.numeric_value)
        .map(RecoveryCategory::from_trr);
    let category = from_trr.or_else(|| RecoveryCategory::from_text(&attrs.part.full_text()));

    match category {
        Some(category) => {
            debug!(mpn = %attrs.part.mpn, category = %category, "derived recovery category");
            attrs.with_parameter(ParametricAttribute::text(
                RECOVERY_CATEGORY,
                "Recovery Speed",
                category.as_str(),
            ))
        }
        None => attrs.clone(),
    }
}
