//! Aggregate scoring

use crate::entities::{EvaluationResult, MatchStatus, RuleEvaluation, RuleResult};

/// Share of a rule's weight an outcome earns
pub fn earned_fraction(evaluation: &RuleEvaluation) -> f64 {
    match (evaluation.result, evaluation.match_status) {
        (RuleResult::Pass | RuleResult::Upgrade, _) => 1.0,
        (RuleResult::Info, MatchStatus::Exact) => 1.0,
        (RuleResult::Info, _) => 0.8,
        (RuleResult::Review, _) => 0.5,
        (RuleResult::Fail, _) => 0.0,
    }
}

/// Fold per-rule outcomes into a percentage, a pass flag and review flags
pub fn aggregate(results: Vec<RuleEvaluation>) -> EvaluationResult {
    let total: u64 = results.iter().map(|r| u64::from(r.weight)).sum();
    let earned: f64 = results
        .iter()
        .map(|r| f64::from(r.weight) * earned_fraction(r))
        .sum();

    let match_percentage = if total == 0 {
        0
    } else {
        (100.0 * earned / total as f64).round() as u32
    };

    let passed = !results.iter().any(RuleEvaluation::is_hard_fail);
    let review_flags = results
        .iter()
        .filter(|r| r.result == RuleResult::Review)
        .map(|r| r.attribute_id.clone())
        .collect();

    EvaluationResult {
        results,
        match_percentage,
        passed,
        review_flags,
    }
}
