//! Entity types - parts, rule tables and evaluation results

pub mod evaluation;
pub mod logic_table;
pub mod part;

pub use evaluation::{
    EvaluationResult, MatchStatus, MissingAttribute, Recommendation, RuleEvaluation, RuleResult,
};
pub use logic_table::{LogicTable, LogicType, MatchingRule, ThresholdDirection};
pub use part::{
    ParametricAttribute, Part, PartAttributes, PartCategory, PartStatus, PartSummary,
    UNKNOWN_MANUFACTURER,
};
