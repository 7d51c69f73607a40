//! YAML error diagnostics for rule tables, derivation files and config

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::entities::LogicType;

/// YAML error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(xref::yaml::invalid))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error, pointing at its reported location
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte offset of a 1-based line/column
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return line_start + within;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

/// Suggestions for the mistakes people make writing rule tables
fn generate_help(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    let unknown_variant = lower.contains("unknown variant");

    if unknown_variant && (lower.contains("logic_type") || lower.contains("identity")) {
        let names: Vec<&str> = LogicType::all().iter().map(|t| t.as_str()).collect();
        return Some(format!("Valid logic types: {}", names.join(", ")));
    }

    if unknown_variant && (lower.contains("gte") || lower.contains("range_superset")) {
        return Some("threshold_direction must be one of: gte, lte, range_superset".to_string());
    }

    if lower.contains("missing field `weight`") {
        return Some("Every rule needs a positive integer weight".to_string());
    }

    if lower.contains("missing field `attribute_id`") {
        return Some("Every rule needs the attribute_id it checks, e.g. attribute_id: capacitance".to_string());
    }

    if lower.contains("invalid type") && lower.contains("sequence") {
        return Some("Lists are written as [a, b, c] or as '- item' lines".to_string());
    }

    if lower.contains("tab character") || lower.contains("\\t") {
        return Some("YAML requires spaces for indentation, not tabs".to_string());
    }

    if lower.contains("duplicate key") {
        return Some("Each key can only appear once per mapping".to_string());
    }

    if lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
    }

    #[test]
    fn test_help_for_logic_type() {
        let help = generate_help(
            "rules[0].logic_type: unknown variant `fuzzy`, expected one of `identity`, `fit`",
        )
        .unwrap();
        assert!(help.contains("identity_upgrade"));
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("missing field `weight`").is_some());
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_serde_error_keeps_message() {
        let source = "family_id: [x\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "t.yaml");
        assert!(!diag.message().is_empty());
    }
}
