//! Per-rule evaluation, one function per logic type

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use crate::core::units::{approx_eq, extract_numeric_value, parse_interval};
use crate::entities::{
    LogicType, MatchStatus, MatchingRule, ParametricAttribute, PartAttributes, RuleEvaluation,
    RuleResult, ThresholdDirection,
};

/// Attribute the regulator divider check reads the output voltage from
pub const OUTPUT_VOLTAGE: &str = "output_voltage";

/// Reference voltages this close count as the same part
const VREF_MATCH_PERCENT: f64 = 1.0;

/// Implied output voltage allowed to drift this far before review
const VREF_OUTPUT_PERCENT: f64 = 2.0;

/// Bracketed or parenthetical qualifier, e.g. the `(NP0)` in `C0G (NP0)`
static QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[\(\[][^\)\]]*[\)\]]").expect("qualifier regex"));

#[derive(Debug, Clone, PartialEq)]
struct Verdict {
    result: RuleResult,
    status: MatchStatus,
    note: Option<String>,
}

impl Verdict {
    fn new(result: RuleResult, status: MatchStatus) -> Self {
        Self {
            result,
            status,
            note: None,
        }
    }

    fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    fn exact() -> Self {
        Self::new(RuleResult::Pass, MatchStatus::Exact)
    }

    fn fail(status: MatchStatus) -> Self {
        Self::new(RuleResult::Fail, status)
    }

    fn no_source() -> Self {
        Self::new(RuleResult::Pass, MatchStatus::Compatible)
            .with_note("No source value; nothing to violate")
    }

    fn missing_candidate() -> Self {
        Self::fail(MatchStatus::Different).with_note("Candidate value missing")
    }

    /// Missing candidate for rules that only fail when told to
    fn missing_candidate_soft(rule: &MatchingRule) -> Self {
        if rule.block_on_missing {
            Self::fail(MatchStatus::Different).with_note("Candidate value missing (required)")
        } else {
            Self::new(RuleResult::Review, MatchStatus::Different)
                .with_note("Candidate value missing; verify against the datasheet")
        }
    }

    /// Fallback when values cannot be parsed: equal text passes, else review
    fn text_or_review(source: &str, candidate: &str) -> Self {
        if same_text(source, candidate) {
            Self::exact()
        } else {
            Self::new(RuleResult::Review, MatchStatus::Different)
                .with_note("Values could not be compared numerically")
        }
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Numeric value, parsing the text when the mapper left none
fn number(attribute: &ParametricAttribute) -> Option<f64> {
    attribute
        .numeric_value
        .or_else(|| extract_numeric_value(&attribute.value))
}

/// Evaluate one rule against a source and candidate
pub fn evaluate_rule(
    rule: &MatchingRule,
    source: &PartAttributes,
    candidate: &PartAttributes,
) -> RuleEvaluation {
    let src = source.get(&rule.attribute_id);
    let cand = candidate.get(&rule.attribute_id);

    let verdict = match rule.logic_type {
        LogicType::Identity => identity(rule, src, cand),
        LogicType::IdentityRange => identity_range(src, cand),
        LogicType::IdentityUpgrade => identity_upgrade(rule, src, cand),
        LogicType::IdentityFlag => identity_flag(src, cand),
        LogicType::Threshold | LogicType::Fit => threshold(rule, src, cand),
        LogicType::ApplicationReview => application_review(rule),
        LogicType::Operational => operational(src, cand),
        LogicType::VrefCheck => vref_check(rule, source, candidate),
    };

    trace!(
        attribute = %rule.attribute_id,
        logic = %rule.logic_type,
        result = %verdict.result,
        status = %verdict.status,
        "rule evaluated"
    );

    RuleEvaluation {
        attribute_id: rule.attribute_id.clone(),
        attribute_name: rule.attribute_name.clone(),
        logic_type: rule.logic_type,
        weight: rule.weight,
        source_value: src.map(|a| a.value.clone()),
        candidate_value: cand.map(|a| a.value.clone()),
        result: verdict.result,
        match_status: verdict.status,
        note: verdict.note,
    }
}

fn identity(
    rule: &MatchingRule,
    src: Option<&ParametricAttribute>,
    cand: Option<&ParametricAttribute>,
) -> Verdict {
    let Some(src) = src else {
        return Verdict::no_source();
    };
    let Some(cand) = cand else {
        return Verdict::missing_candidate();
    };

    match (src.numeric_value, cand.numeric_value) {
        (Some(s), Some(c)) if approx_eq(s, c) => Verdict::exact(),
        (Some(s), Some(c)) => match rule.tolerance_percent {
            Some(tolerance) if s != 0.0 && (c - s).abs() / s.abs() <= tolerance / 100.0 => {
                let deviation = (c - s) / s.abs() * 100.0;
                Verdict::new(RuleResult::Pass, MatchStatus::Compatible).with_note(format!(
                    "Within ±{}% tolerance ({:+.2}%)",
                    tolerance, deviation
                ))
            }
            _ => Verdict::fail(MatchStatus::Different),
        },
        _ if same_text(&src.value, &cand.value) => Verdict::exact(),
        _ => Verdict::fail(MatchStatus::Different),
    }
}

fn identity_range(src: Option<&ParametricAttribute>, cand: Option<&ParametricAttribute>) -> Verdict {
    let Some(src) = src else {
        return Verdict::no_source();
    };
    let Some(cand) = cand else {
        return Verdict::missing_candidate();
    };

    let (Some((s_low, s_high)), Some((c_low, c_high))) =
        (parse_interval(&src.value), parse_interval(&cand.value))
    else {
        return Verdict::text_or_review(&src.value, &cand.value);
    };

    if approx_eq(s_low, c_low) && approx_eq(s_high, c_high) {
        return Verdict::exact();
    }

    let overlaps = if approx_eq(c_low, c_high) {
        c_low >= s_low && c_low <= s_high
    } else {
        c_low <= s_high && c_high >= s_low
    };

    if overlaps {
        Verdict::new(RuleResult::Pass, MatchStatus::Compatible).with_note("Ranges overlap")
    } else {
        Verdict::fail(MatchStatus::Different).with_note("Candidate range outside source range")
    }
}

/// Drop bracketed qualifiers: `C0G (NP0)` → `C0G`
fn strip_qualifiers(value: &str) -> String {
    QUALIFIER.replace_all(value, "").trim().to_string()
}

/// Position of a value in a best→worst hierarchy
///
/// Whole-token matching only, so "Shielded" never matches inside
/// "Semi-Shielded". Qualifiers in brackets are ignored on both sides and
/// comma or slash separated alternatives are tried in turn.
pub fn hierarchy_position(value: &str, hierarchy: &[String]) -> Option<usize> {
    let value = value.trim();
    if let Some(index) = hierarchy.iter().position(|h| h.trim().eq_ignore_ascii_case(value)) {
        return Some(index);
    }

    let stripped = strip_qualifiers(value);
    let tokens: Vec<&str> = stripped
        .split([',', '/', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    hierarchy.iter().position(|entry| {
        let entry = strip_qualifiers(entry);
        tokens.iter().any(|t| t.eq_ignore_ascii_case(&entry))
    })
}

fn identity_upgrade(
    rule: &MatchingRule,
    src: Option<&ParametricAttribute>,
    cand: Option<&ParametricAttribute>,
) -> Verdict {
    let Some(src) = src else {
        return Verdict::no_source();
    };
    let Some(cand) = cand else {
        return Verdict::missing_candidate();
    };

    let hierarchy = &rule.upgrade_hierarchy;
    match (
        hierarchy_position(&src.value, hierarchy),
        hierarchy_position(&cand.value, hierarchy),
    ) {
        (Some(s), Some(c)) if c == s => Verdict::exact(),
        (Some(s), Some(c)) if c < s => Verdict::new(RuleResult::Upgrade, MatchStatus::Better)
            .with_note(format!("{} is an upgrade over {}", hierarchy[c], hierarchy[s])),
        (Some(s), Some(c)) => Verdict::fail(MatchStatus::Worse)
            .with_note(format!("{} is a downgrade from {}", hierarchy[c], hierarchy[s])),
        (None, None) if src.value.trim() == cand.value.trim() => Verdict::exact(),
        (None, None) => Verdict::fail(MatchStatus::Different),
        _ => Verdict::text_or_review(&src.value, &cand.value),
    }
}

/// "Yes"/"Required" and friends
fn is_truthy(attribute: Option<&ParametricAttribute>) -> bool {
    attribute.is_some_and(|a| {
        matches!(
            a.value.trim().to_lowercase().as_str(),
            "yes" | "y" | "true" | "required"
        )
    })
}

fn identity_flag(src: Option<&ParametricAttribute>, cand: Option<&ParametricAttribute>) -> Verdict {
    match (is_truthy(src), is_truthy(cand)) {
        (true, false) => Verdict::fail(MatchStatus::Worse).with_note("Candidate lacks this capability"),
        (false, true) => Verdict::new(RuleResult::Pass, MatchStatus::Better),
        _ => Verdict::exact(),
    }
}

fn threshold(
    rule: &MatchingRule,
    src: Option<&ParametricAttribute>,
    cand: Option<&ParametricAttribute>,
) -> Verdict {
    let Some(src) = src else {
        return Verdict::no_source();
    };
    let Some(cand) = cand else {
        return Verdict::missing_candidate_soft(rule);
    };

    let direction = rule.direction();
    if direction == ThresholdDirection::RangeSuperset {
        return range_superset(src, cand);
    }

    let (Some(s), Some(c)) = (number(src), number(cand)) else {
        return Verdict::text_or_review(&src.value, &cand.value);
    };

    if approx_eq(s, c) {
        return Verdict::exact();
    }

    let better = match direction {
        ThresholdDirection::Lte => c < s,
        _ => c > s,
    };
    if better {
        Verdict::new(RuleResult::Pass, MatchStatus::Better)
    } else {
        let note = match (rule.logic_type, direction) {
            (LogicType::Fit, _) => "Candidate is larger than the original",
            (_, ThresholdDirection::Lte) => "Candidate exceeds the original",
            _ => "Candidate falls short of the original",
        };
        Verdict::fail(MatchStatus::Worse).with_note(note)
    }
}

fn range_superset(src: &ParametricAttribute, cand: &ParametricAttribute) -> Verdict {
    let (Some((s_low, s_high)), Some((c_low, c_high))) =
        (parse_interval(&src.value), parse_interval(&cand.value))
    else {
        return Verdict::text_or_review(&src.value, &cand.value);
    };

    if approx_eq(s_low, c_low) && approx_eq(s_high, c_high) {
        Verdict::exact()
    } else if c_low <= s_low && c_high >= s_high {
        Verdict::new(RuleResult::Pass, MatchStatus::Better).with_note("Candidate range is wider")
    } else {
        Verdict::fail(MatchStatus::Worse).with_note("Candidate range does not cover the original")
    }
}

fn application_review(rule: &MatchingRule) -> Verdict {
    let note = if rule.engineering_reason.is_empty() {
        "Engineering review required".to_string()
    } else {
        rule.engineering_reason.clone()
    };
    Verdict::new(RuleResult::Review, MatchStatus::Compatible).with_note(note)
}

fn operational(src: Option<&ParametricAttribute>, cand: Option<&ParametricAttribute>) -> Verdict {
    let same = match (src, cand) {
        (Some(s), Some(c)) => same_text(&s.value, &c.value),
        (None, None) => true,
        _ => false,
    };
    let status = if same {
        MatchStatus::Exact
    } else {
        MatchStatus::Compatible
    };
    Verdict::new(RuleResult::Info, status)
}

/// Feedback reference check for adjustable regulators
///
/// A different reference voltage changes the output set by the existing
/// divider. The implied output is `Vref_cand × (Vout / Vref_src)`.
fn vref_check(rule: &MatchingRule, source: &PartAttributes, candidate: &PartAttributes) -> Verdict {
    let Some(src) = source.get(&rule.attribute_id) else {
        return Verdict::no_source();
    };
    let Some(cand) = candidate.get(&rule.attribute_id) else {
        return Verdict::missing_candidate_soft(rule);
    };

    let (Some(vref_src), Some(vref_cand)) = (number(src), number(cand)) else {
        return Verdict::text_or_review(&src.value, &cand.value);
    };

    if approx_eq(vref_src, vref_cand) {
        return Verdict::exact();
    }
    if vref_src != 0.0 && (vref_cand - vref_src).abs() / vref_src.abs() * 100.0 <= VREF_MATCH_PERCENT
    {
        return Verdict::new(RuleResult::Pass, MatchStatus::Better)
            .with_note(format!("Reference within ±{}%", VREF_MATCH_PERCENT));
    }

    let Some(vout) = source.get(OUTPUT_VOLTAGE).and_then(number) else {
        return Verdict::new(RuleResult::Review, MatchStatus::Different).with_note(
            "Reference voltage differs and the source output voltage is unknown; check the divider",
        );
    };
    if vref_src <= 0.0 || vout <= 0.0 {
        return Verdict::new(RuleResult::Review, MatchStatus::Different)
            .with_note("Reference or output voltage not positive; check the divider");
    }

    let ratio = vout / vref_src - 1.0;
    let implied = vref_cand * (ratio + 1.0);
    let deviation = (implied - vout).abs() / vout * 100.0;

    if deviation <= VREF_OUTPUT_PERCENT {
        Verdict::new(RuleResult::Pass, MatchStatus::Compatible).with_note(format!(
            "Implied output {:.3}V is within tolerance of {:.3}V ({:.2}%)",
            implied, vout, deviation
        ))
    } else {
        Verdict::new(RuleResult::Review, MatchStatus::Different).with_note(format!(
            "Implied output {:.3}V deviates {:.1}% from {:.3}V; recompute Rbot/Rtop for Vref {}V",
            implied, deviation, vout, vref_cand
        ))
    }
}
