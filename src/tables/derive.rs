//! Derive one logic table from another
//!
//! `derive` is a pure copy-with-patch. The base is only read; the result owns
//! fresh copies of every rule it keeps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{LogicTable, LogicType, MatchingRule, ThresholdDirection};

/// Partial rule; every named field replaces the base rule's value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOverride {
    pub attribute_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_type: Option<LogicType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineering_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_direction: Option<ThresholdDirection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_hierarchy: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_on_missing: Option<bool>,
}

impl RuleOverride {
    pub fn new(attribute_id: impl Into<String>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            ..Default::default()
        }
    }

    /// Merge onto a copy of `rule`
    pub fn apply(&self, rule: &MatchingRule) -> MatchingRule {
        let mut merged = rule.clone();
        if let Some(name) = &self.attribute_name {
            merged.attribute_name = name.clone();
        }
        if let Some(logic_type) = self.logic_type {
            merged.logic_type = logic_type;
        }
        if let Some(weight) = self.weight {
            merged.weight = weight;
        }
        if let Some(reason) = &self.engineering_reason {
            merged.engineering_reason = reason.clone();
        }
        if let Some(sort_order) = self.sort_order {
            merged.sort_order = sort_order;
        }
        if let Some(direction) = self.threshold_direction {
            merged.threshold_direction = Some(direction);
        }
        if let Some(hierarchy) = &self.upgrade_hierarchy {
            merged.upgrade_hierarchy = hierarchy.clone();
        }
        if let Some(tolerance) = self.tolerance_percent {
            merged.tolerance_percent = Some(tolerance);
        }
        if let Some(block) = self.block_on_missing {
            merged.block_on_missing = block;
        }
        merged
    }
}

/// New family metadata plus remove / override / add lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDelta {
    /// Inherited from the base when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<String>,

    /// Inherited from the base when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Inherited from the base when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Inherited from the base when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,

    #[serde(default, rename = "override", skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<RuleOverride>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<MatchingRule>,
}

impl TableDelta {
    pub fn new(family_id: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            family_id: Some(family_id.into()),
            family_name: Some(family_name.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.overrides.is_empty() && self.add.is_empty()
    }
}

/// A derivation file: the base family id and the delta to apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDerivation {
    pub base: String,

    #[serde(flatten)]
    pub delta: TableDelta,
}

impl TableDerivation {
    /// Family id of the derived table; the base id when the delta names none
    pub fn family_id(&self) -> &str {
        self.delta.family_id.as_deref().unwrap_or(&self.base)
    }
}

/// Build a new table from `base` and `delta`
///
/// Operations run in a fixed order: remove, then override, then add. An
/// override naming an attribute that is not in the table (including one
/// removed by the same delta) does nothing.
pub fn derive(base: &LogicTable, delta: &TableDelta) -> LogicTable {
    let family_id = delta.family_id.as_deref().unwrap_or(&base.family_id);
    let mut table = LogicTable {
        family_id: family_id.to_string(),
        family_name: delta
            .family_name
            .clone()
            .unwrap_or_else(|| base.family_name.clone()),
        category: delta
            .category
            .clone()
            .unwrap_or_else(|| base.category.clone()),
        description: delta
            .description
            .clone()
            .unwrap_or_else(|| base.description.clone()),
        rules: Vec::with_capacity(base.rules.len() + delta.add.len()),
    };

    for rule in &base.rules {
        if delta.remove.iter().any(|id| *id == rule.attribute_id) {
            continue;
        }
        table.rules.push(rule.clone());
    }
    for id in &delta.remove {
        if base.rule(id).is_none() {
            debug!(family = %family_id, attribute = %id, "remove target not in base");
        }
    }

    for patch in &delta.overrides {
        match table
            .rules
            .iter_mut()
            .find(|r| r.attribute_id == patch.attribute_id)
        {
            Some(rule) => *rule = patch.apply(rule),
            None => {
                debug!(family = %family_id, attribute = %patch.attribute_id, "override target not present")
            }
        }
    }

    let mut next_sort_order = table.max_sort_order();
    for rule in &delta.add {
        let mut added = rule.clone();
        if added.sort_order == 0 {
            next_sort_order += 1;
            added.sort_order = next_sort_order;
        } else {
            next_sort_order = next_sort_order.max(added.sort_order);
        }
        table.rules.push(added);
    }

    table
}
