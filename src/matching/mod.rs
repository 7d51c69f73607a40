//! Matching engine: evaluate, rank and find gaps
//!
//! Pure functions over borrowed tables and parts. Nothing is cached and
//! nothing is mutated, so every call can run concurrently with any other.

pub mod evaluate;
pub mod score;

use tracing::debug;

use crate::entities::{
    EvaluationResult, LogicTable, MissingAttribute, PartAttributes, Recommendation,
};

pub use evaluate::{evaluate_rule, hierarchy_position, OUTPUT_VOLTAGE};
pub use score::{aggregate, earned_fraction};

/// Evaluate every rule of `table` for one candidate
pub fn evaluate(
    table: &LogicTable,
    source: &PartAttributes,
    candidate: &PartAttributes,
) -> EvaluationResult {
    let results = table
        .ordered_rules()
        .into_iter()
        .map(|rule| evaluate_rule(rule, source, candidate))
        .collect();
    let result = aggregate(results);

    debug!(
        family = %table.family_id,
        source = %source.part.mpn,
        candidate = %candidate.part.mpn,
        percentage = result.match_percentage,
        passed = result.passed,
        "candidate evaluated"
    );
    result
}

fn same_part(a: &PartAttributes, b: &PartAttributes) -> bool {
    a.part.mpn.trim().eq_ignore_ascii_case(b.part.mpn.trim())
}

/// Rank candidates: passing first, then by match percentage
///
/// The source itself is skipped. Ties keep the input order.
pub fn find_replacements(
    table: &LogicTable,
    source: &PartAttributes,
    candidates: &[PartAttributes],
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = candidates
        .iter()
        .filter(|candidate| !same_part(source, candidate))
        .map(|candidate| {
            let result = evaluate(table, source, candidate);
            Recommendation {
                part: candidate.part.clone(),
                match_percentage: result.match_percentage,
                passed: result.passed,
                match_details: result.results,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.passed
            .cmp(&a.passed)
            .then(b.match_percentage.cmp(&a.match_percentage))
    });
    recommendations
}

/// Rules whose attribute the part lacks, heaviest first
///
/// Review-only and operational rules are left out; they never block.
pub fn detect_missing_attributes(
    table: &LogicTable,
    attrs: &PartAttributes,
) -> Vec<MissingAttribute> {
    let mut missing: Vec<MissingAttribute> = table
        .ordered_rules()
        .into_iter()
        .filter(|rule| rule.logic_type.needs_value() && !attrs.has(&rule.attribute_id))
        .map(|rule| MissingAttribute {
            attribute_id: rule.attribute_id.clone(),
            attribute_name: rule.attribute_name.clone(),
            weight: rule.weight,
            logic_type: rule.logic_type,
        })
        .collect();
    missing.sort_by(|a, b| b.weight.cmp(&a.weight));
    missing
}
