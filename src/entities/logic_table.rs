//! Logic table entity - the weighted rule set for one component family
//!
//! Tables are authored once (by hand or derived from another table) and are
//! read-only from then on. Every evaluation borrows them.

use serde::{Deserialize, Serialize};

/// How a rule compares source and candidate values
///
/// This is a closed set; the matching engine handles every variant explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicType {
    /// Values must match (optionally within a tolerance percentage)
    Identity,
    /// Intervals must overlap
    IdentityRange,
    /// Position in a best-to-worst hierarchy must be equal or better
    IdentityUpgrade,
    /// Yes/No flag; candidate may add but never drop the capability
    IdentityFlag,
    /// Numeric comparison in a configured direction
    Threshold,
    /// Physical dimension must not exceed the original
    Fit,
    /// Always flagged for an engineer to look at
    ApplicationReview,
    /// Logistics/packaging; informational only
    Operational,
    /// Regulator feedback reference voltage with divider recompute
    VrefCheck,
}

impl LogicType {
    pub fn all() -> &'static [LogicType] {
        &[
            LogicType::Identity,
            LogicType::IdentityRange,
            LogicType::IdentityUpgrade,
            LogicType::IdentityFlag,
            LogicType::Threshold,
            LogicType::Fit,
            LogicType::ApplicationReview,
            LogicType::Operational,
            LogicType::VrefCheck,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicType::Identity => "identity",
            LogicType::IdentityRange => "identity_range",
            LogicType::IdentityUpgrade => "identity_upgrade",
            LogicType::IdentityFlag => "identity_flag",
            LogicType::Threshold => "threshold",
            LogicType::Fit => "fit",
            LogicType::ApplicationReview => "application_review",
            LogicType::Operational => "operational",
            LogicType::VrefCheck => "vref_check",
        }
    }

    /// Whether a missing value for this rule is worth asking the user about
    pub fn needs_value(&self) -> bool {
        !matches!(self, LogicType::ApplicationReview | LogicType::Operational)
    }
}

impl std::fmt::Display for LogicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogicType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicType::all()
            .iter()
            .find(|t| t.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown logic type: {}", s))
    }
}

/// Direction for `threshold` rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    /// Candidate must be greater than or equal to the source
    #[default]
    Gte,
    /// Candidate must be less than or equal to the source
    Lte,
    /// Candidate interval must contain the source interval
    RangeSuperset,
}

impl std::fmt::Display for ThresholdDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdDirection::Gte => write!(f, "gte"),
            ThresholdDirection::Lte => write!(f, "lte"),
            ThresholdDirection::RangeSuperset => write!(f, "range_superset"),
        }
    }
}

/// One row of engineering policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingRule {
    /// Attribute this rule checks (unique within a table)
    pub attribute_id: String,

    /// Display name
    pub attribute_name: String,

    pub logic_type: LogicType,

    /// Relative importance within the table
    pub weight: u32,

    /// Why the rule exists; shown as the note for review outcomes
    #[serde(default)]
    pub engineering_reason: String,

    #[serde(default)]
    pub sort_order: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_direction: Option<ThresholdDirection>,

    /// Best to worst
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upgrade_hierarchy: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_percent: Option<f64>,

    /// A missing candidate value fails instead of going to review
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub block_on_missing: bool,
}

impl MatchingRule {
    /// Create a rule with no logic-specific parameters
    pub fn new(
        attribute_id: impl Into<String>,
        attribute_name: impl Into<String>,
        logic_type: LogicType,
        weight: u32,
    ) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            attribute_name: attribute_name.into(),
            logic_type,
            weight,
            engineering_reason: String::new(),
            sort_order: 0,
            threshold_direction: None,
            upgrade_hierarchy: Vec::new(),
            tolerance_percent: None,
            block_on_missing: false,
        }
    }

    pub fn with_direction(mut self, direction: ThresholdDirection) -> Self {
        self.threshold_direction = Some(direction);
        self
    }

    pub fn with_hierarchy<S: Into<String>>(mut self, hierarchy: impl IntoIterator<Item = S>) -> Self {
        self.upgrade_hierarchy = hierarchy.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tolerance(mut self, percent: f64) -> Self {
        self.tolerance_percent = Some(percent);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.engineering_reason = reason.into();
        self
    }

    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn blocking(mut self) -> Self {
        self.block_on_missing = true;
        self
    }

    /// Effective direction; `fit` is always `lte`
    pub fn direction(&self) -> ThresholdDirection {
        match self.logic_type {
            LogicType::Fit => ThresholdDirection::Lte,
            _ => self.threshold_direction.unwrap_or_default(),
        }
    }
}

/// The rule set for one component family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicTable {
    /// Family identifier (lookup key)
    pub family_id: String,

    /// Display name
    pub family_name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Ordered rules; attribute identifiers are unique
    #[serde(default)]
    pub rules: Vec<MatchingRule>,
}

impl LogicTable {
    pub fn new(family_id: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            family_id: family_id.into(),
            family_name: family_name.into(),
            category: String::new(),
            description: String::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: MatchingRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rule for an attribute, if the table has one
    pub fn rule(&self, attribute_id: &str) -> Option<&MatchingRule> {
        self.rules.iter().find(|r| r.attribute_id == attribute_id)
    }

    /// Sum of all rule weights
    pub fn total_weight(&self) -> u64 {
        self.rules.iter().map(|r| u64::from(r.weight)).sum()
    }

    /// Rules in evaluation order (sort order, ties keep table order)
    pub fn ordered_rules(&self) -> Vec<&MatchingRule> {
        let mut rules: Vec<&MatchingRule> = self.rules.iter().collect();
        rules.sort_by_key(|r| r.sort_order);
        rules
    }

    /// Highest sort order in use (0 for an empty table)
    pub fn max_sort_order(&self) -> u32 {
        self.rules.iter().map(|r| r.sort_order).max().unwrap_or(0)
    }
}
