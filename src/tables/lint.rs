//! Structural checks for logic tables

use miette::Diagnostic;
use std::collections::HashSet;
use thiserror::Error;

use crate::entities::{LogicTable, LogicType};

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum TableIssue {
    #[error("{family_id}: table has no rules")]
    #[diagnostic(
        code(xref::table::empty),
        severity(Warning),
        help("Every candidate scores 0% against an empty table")
    )]
    Empty { family_id: String },

    #[error("{family_id}: attribute '{attribute_id}' has more than one rule")]
    #[diagnostic(
        code(xref::table::duplicate_attribute),
        help("Attribute ids must be unique within a table; merge the rules or remove one")
    )]
    DuplicateAttribute {
        family_id: String,
        attribute_id: String,
    },

    #[error("{family_id}: rule '{attribute_id}' has zero weight")]
    #[diagnostic(
        code(xref::table::zero_weight),
        severity(Warning),
        help("A zero-weight rule can still hard-fail but never adds to the score")
    )]
    ZeroWeight {
        family_id: String,
        attribute_id: String,
    },

    #[error("{family_id}: identity_upgrade rule '{attribute_id}' has no upgrade_hierarchy")]
    #[diagnostic(
        code(xref::table::empty_hierarchy),
        help("List the values best to worst, e.g. upgrade_hierarchy: [C0G, X7R, X5R]")
    )]
    EmptyHierarchy {
        family_id: String,
        attribute_id: String,
    },

    #[error("{family_id}: threshold rule '{attribute_id}' has no threshold_direction")]
    #[diagnostic(
        code(xref::table::missing_direction),
        severity(Warning),
        help("The direction defaults to gte; set gte, lte or range_superset explicitly")
    )]
    MissingDirection {
        family_id: String,
        attribute_id: String,
    },

    #[error("{family_id}: rule '{attribute_id}' has negative tolerance_percent {value}")]
    #[diagnostic(code(xref::table::negative_tolerance))]
    NegativeTolerance {
        family_id: String,
        attribute_id: String,
        value: f64,
    },

    #[error("{family_id}: vref_check rule '{attribute_id}' but no output_voltage rule")]
    #[diagnostic(
        code(xref::table::vref_without_output),
        severity(Warning),
        help("The divider recompute needs the output voltage; add an output_voltage rule")
    )]
    VrefWithoutOutput {
        family_id: String,
        attribute_id: String,
    },
}

impl TableIssue {
    /// Warnings leave the table usable; errors do not
    pub fn is_error(&self) -> bool {
        !matches!(
            self.severity(),
            Some(miette::Severity::Warning) | Some(miette::Severity::Advice)
        )
    }
}

/// Check a table for structural problems
pub fn lint(table: &LogicTable) -> Vec<TableIssue> {
    let family_id = || table.family_id.clone();
    let mut issues = Vec::new();

    if table.rules.is_empty() {
        issues.push(TableIssue::Empty {
            family_id: family_id(),
        });
    }

    let mut seen = HashSet::new();
    for rule in &table.rules {
        let attribute_id = || rule.attribute_id.clone();

        if !seen.insert(rule.attribute_id.as_str()) {
            issues.push(TableIssue::DuplicateAttribute {
                family_id: family_id(),
                attribute_id: attribute_id(),
            });
        }
        if rule.weight == 0 {
            issues.push(TableIssue::ZeroWeight {
                family_id: family_id(),
                attribute_id: attribute_id(),
            });
        }
        if let Some(value) = rule.tolerance_percent.filter(|t| *t < 0.0) {
            issues.push(TableIssue::NegativeTolerance {
                family_id: family_id(),
                attribute_id: attribute_id(),
                value,
            });
        }

        match rule.logic_type {
            LogicType::IdentityUpgrade if rule.upgrade_hierarchy.is_empty() => {
                issues.push(TableIssue::EmptyHierarchy {
                    family_id: family_id(),
                    attribute_id: attribute_id(),
                })
            }
            LogicType::Threshold if rule.threshold_direction.is_none() => {
                issues.push(TableIssue::MissingDirection {
                    family_id: family_id(),
                    attribute_id: attribute_id(),
                })
            }
            LogicType::VrefCheck if table.rule("output_voltage").is_none() => {
                issues.push(TableIssue::VrefWithoutOutput {
                    family_id: family_id(),
                    attribute_id: attribute_id(),
                })
            }
            _ => {}
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MatchingRule;
    use crate::tables::TableCatalog;

    #[test]
    fn test_builtin_tables_are_clean() {
        let catalog = TableCatalog::builtin().unwrap();
        for table in catalog.tables() {
            let issues = lint(table);
            assert!(issues.is_empty(), "{}: {:?}", table.family_id, issues);
        }
    }

    #[test]
    fn test_duplicate_and_zero_weight() {
        let table = LogicTable::new("t", "T")
            .with_rule(MatchingRule::new("a", "A", LogicType::Identity, 1))
            .with_rule(MatchingRule::new("a", "A", LogicType::Identity, 0));
        let issues = lint(&table);
        assert!(issues
            .iter()
            .any(|i| matches!(i, TableIssue::DuplicateAttribute { .. })));
        assert!(issues.iter().any(|i| matches!(i, TableIssue::ZeroWeight { .. })));
    }

    #[test]
    fn test_severity() {
        let table = LogicTable::new("t", "T")
            .with_rule(MatchingRule::new("d", "D", LogicType::IdentityUpgrade, 5))
            .with_rule(MatchingRule::new("v", "V", LogicType::Threshold, 5));
        let issues = lint(&table);
        let hierarchy = issues
            .iter()
            .find(|i| matches!(i, TableIssue::EmptyHierarchy { .. }))
            .unwrap();
        assert!(hierarchy.is_error());
        let direction = issues
            .iter()
            .find(|i| matches!(i, TableIssue::MissingDirection { .. }))
            .unwrap();
        assert!(!direction.is_error());
    }

    #[test]
    fn test_vref_without_output_voltage() {
        let table = LogicTable::new("t", "T")
            .with_rule(MatchingRule::new("vref", "Vref", LogicType::VrefCheck, 5));
        assert!(matches!(
            lint(&table).as_slice(),
            [TableIssue::VrefWithoutOutput { .. }]
        ));
    }

    #[test]
    fn test_empty_table() {
        assert!(matches!(
            lint(&LogicTable::new("t", "T")).as_slice(),
            [TableIssue::Empty { .. }]
        ));
    }
}
