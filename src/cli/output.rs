//! Output rendering for every format
//!
//! Structured documents go out as YAML or JSON; row sets as a terminal table,
//! TSV, CSV or Markdown. Tables use `tabled`, CSV uses `csv`.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::entities::RuleResult;

/// Column values wider than this are truncated in terminal tables
const MAX_CELL_WIDTH: usize = 48;

/// A header row plus string rows
#[derive(Debug, Clone, Default)]
pub struct Rows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Rows {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render for a row-oriented format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Tsv => Ok(self.to_tsv()),
            OutputFormat::Csv => self.to_csv(),
            OutputFormat::Md => Ok(self.to_table(true, usize::MAX)),
            _ => Ok(self.to_table(false, MAX_CELL_WIDTH)),
        }
    }

    fn to_table(&self, markdown: bool, width: usize) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(|cell| truncate_str(cell, width)));
        }
        let mut table = builder.build();
        if markdown {
            table.with(Style::markdown());
        } else {
            table.with(Style::rounded());
        }
        table.to_string()
    }

    fn to_tsv(&self) -> String {
        let clean = |cell: &String| cell.replace(['\t', '\n'], " ");
        let mut out = String::new();
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            out.push_str(&row.iter().map(clean).collect::<Vec<_>>().join("\t"));
            out.push('\n');
        }
        out
    }

    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).into_diagnostic()?;
        for row in &self.rows {
            writer.write_record(row).into_diagnostic()?;
        }
        let bytes = writer.into_inner().into_diagnostic()?;
        String::from_utf8(bytes).into_diagnostic()
    }
}

/// Serialize a document as YAML or JSON
pub fn to_document<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).into_diagnostic()?;
            json.push('\n');
            Ok(json)
        }
        _ => serde_yml::to_string(value).into_diagnostic(),
    }
}

/// Print `value` as a document, or `rows` for row-oriented formats
///
/// `auto` picks the table for row sets and YAML otherwise.
pub fn emit<T: Serialize>(value: &T, rows: Option<&Rows>, format: OutputFormat) -> Result<()> {
    let text = match (format, rows) {
        (OutputFormat::Yaml | OutputFormat::Json, _) | (_, None) => to_document(value, format)?,
        (format, Some(rows)) => rows.render(format)?,
    };
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Whether decorations (headings, summaries) should be printed
pub fn decorated(format: OutputFormat, quiet: bool) -> bool {
    format == OutputFormat::Auto && !quiet
}

pub fn styled_result(result: RuleResult) -> String {
    let text = result.to_string();
    match result {
        RuleResult::Pass => style(text).green().to_string(),
        RuleResult::Upgrade => style(text).cyan().to_string(),
        RuleResult::Review => style(text).yellow().to_string(),
        RuleResult::Fail => style(text).red().bold().to_string(),
        RuleResult::Info => style(text).dim().to_string(),
    }
}

pub fn styled_passed(passed: bool) -> String {
    if passed {
        style("PASS").green().bold().to_string()
    } else {
        style("FAIL").red().bold().to_string()
    }
}

/// Match percentage colored by band
pub fn styled_percentage(pct: u32) -> String {
    let text = format!("{}%", pct);
    match pct {
        90.. => style(text).green().to_string(),
        70..=89 => style(text).yellow().to_string(),
        _ => style(text).red().to_string(),
    }
}
