//! Evaluation results produced by the matching engine
//!
//! Created per call and handed to the caller; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::entities::logic_table::LogicType;
use crate::entities::part::Part;

/// Verdict of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleResult {
    Pass,
    Fail,
    Review,
    Upgrade,
    Info,
}

impl std::fmt::Display for RuleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleResult::Pass => write!(f, "pass"),
            RuleResult::Fail => write!(f, "fail"),
            RuleResult::Review => write!(f, "review"),
            RuleResult::Upgrade => write!(f, "upgrade"),
            RuleResult::Info => write!(f, "info"),
        }
    }
}

/// Finer-grained relation between candidate and source values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Exact,
    Better,
    Worse,
    Compatible,
    Different,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Exact => write!(f, "exact"),
            MatchStatus::Better => write!(f, "better"),
            MatchStatus::Worse => write!(f, "worse"),
            MatchStatus::Compatible => write!(f, "compatible"),
            MatchStatus::Different => write!(f, "different"),
        }
    }
}

/// Outcome of one rule against one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub attribute_id: String,
    pub attribute_name: String,
    pub logic_type: LogicType,
    pub weight: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_value: Option<String>,

    pub result: RuleResult,
    pub match_status: MatchStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RuleEvaluation {
    /// A hard fail forces the candidate's overall verdict to fail
    pub fn is_hard_fail(&self) -> bool {
        self.result == RuleResult::Fail
    }
}

/// Aggregate outcome of a table against one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Per-rule outcomes in rule order
    pub results: Vec<RuleEvaluation>,

    /// 0-100
    pub match_percentage: u32,

    /// False when any rule failed outright
    pub passed: bool,

    /// Attributes whose rule asked for human review
    #[serde(default)]
    pub review_flags: Vec<String>,
}

/// A ranked replacement candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub part: Part,
    pub match_percentage: u32,
    pub passed: bool,
    pub match_details: Vec<RuleEvaluation>,
}

/// A rule whose attribute the part does not carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingAttribute {
    pub attribute_id: String,
    pub attribute_name: String,
    pub weight: u32,
    pub logic_type: LogicType,
}
