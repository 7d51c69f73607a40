//! `xref table` command - inspect, derive and lint rule tables

use clap::Subcommand;
use console::style;
use miette::{miette, Diagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::or_dash;
use crate::cli::output::{decorated, emit, to_document, Rows};
use crate::cli::{Context, GlobalOpts, OutputFormat};
use crate::entities::{LogicTable, LogicType};
use crate::tables::{derive, lint, TableCatalog, TableFile, TableIssue};

#[derive(Subcommand, Debug)]
pub enum TableCommands {
    /// List available families
    List,

    /// Show the rules of one family
    Show(ShowArgs),

    /// Apply a derivation file and print the resulting table
    Derive(DeriveArgs),

    /// Check tables for structural problems
    Lint(LintArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Family id (e.g. mlcc, chip_resistor)
    pub family: String,
}

#[derive(clap::Args, Debug)]
pub struct DeriveArgs {
    /// Derivation file (`base:` plus remove / override / add)
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct LintArgs {
    /// Only this family (default: all)
    pub family: Option<String>,
}

pub fn run(cmd: TableCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    let catalog = ctx.catalog()?;
    match cmd {
        TableCommands::List => run_list(&ctx, &catalog),
        TableCommands::Show(args) => run_show(&ctx, &catalog, args),
        TableCommands::Derive(args) => run_derive(&ctx, &catalog, args),
        TableCommands::Lint(args) => run_lint(&ctx, &catalog, args),
    }
}

#[derive(Debug, Serialize)]
struct TableListing<'a> {
    family_id: &'a str,
    family_name: &'a str,
    category: &'a str,
    rules: usize,
    total_weight: u64,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<&'a str>,
}

fn run_list(ctx: &Context, catalog: &TableCatalog) -> Result<()> {
    let listings: Vec<TableListing> = catalog
        .tables()
        .map(|table| {
            let source = catalog.source(&table.family_id);
            TableListing {
                family_id: &table.family_id,
                family_name: &table.family_name,
                category: &table.category,
                rules: table.rules.len(),
                total_weight: table.total_weight(),
                source: source.map(|s| s.origin.to_string()).unwrap_or_default(),
                base: source.and_then(|s| s.base.as_deref()),
            }
        })
        .collect();

    let mut rows = Rows::new(["family", "name", "category", "rules", "weight", "base", "source"]);
    for l in &listings {
        rows.push([
            l.family_id.to_string(),
            l.family_name.to_string(),
            l.category.to_string(),
            l.rules.to_string(),
            l.total_weight.to_string(),
            or_dash(l.base),
            l.source.clone(),
        ]);
    }

    emit(&listings, Some(&rows), ctx.format)?;
    if decorated(ctx.format, ctx.quiet) {
        println!("{} table(s)", style(listings.len()).cyan());
    }
    Ok(())
}

/// Logic-specific parameters in one cell
fn rule_parameters(rule: &crate::entities::MatchingRule) -> String {
    let mut parts = Vec::new();
    match rule.logic_type {
        LogicType::Threshold | LogicType::Fit => parts.push(rule.direction().to_string()),
        LogicType::IdentityUpgrade => parts.push(rule.upgrade_hierarchy.join(" > ")),
        _ => {}
    }
    if let Some(tolerance) = rule.tolerance_percent {
        parts.push(format!("±{}%", tolerance));
    }
    if rule.block_on_missing {
        parts.push("blocking".to_string());
    }
    parts.join(", ")
}

fn rule_rows(table: &LogicTable) -> Rows {
    let mut rows = Rows::new(["order", "attribute", "name", "logic", "weight", "parameters"]);
    for rule in table.ordered_rules() {
        rows.push([
            rule.sort_order.to_string(),
            rule.attribute_id.clone(),
            rule.attribute_name.clone(),
            rule.logic_type.to_string(),
            rule.weight.to_string(),
            rule_parameters(rule),
        ]);
    }
    rows
}

fn print_table(ctx: &Context, table: &LogicTable) -> Result<()> {
    // Tables read best as YAML unless rows were asked for
    let format = match ctx.format {
        OutputFormat::Auto if ctx.quiet => OutputFormat::Yaml,
        other => other,
    };
    if format == OutputFormat::Auto {
        println!(
            "{} {}",
            style(&table.family_id).cyan().bold(),
            style(&table.family_name).bold()
        );
        if !table.description.is_empty() {
            println!("  {}", table.description);
        }
    }
    emit(table, Some(&rule_rows(table)), format)
}

fn run_show(ctx: &Context, catalog: &TableCatalog, args: ShowArgs) -> Result<()> {
    let table = catalog.require(&args.family)?;
    print_table(ctx, table)
}

fn run_derive(ctx: &Context, catalog: &TableCatalog, args: DeriveArgs) -> Result<()> {
    let derivation = match TableFile::load(&args.file)? {
        TableFile::Derivation(derivation) => derivation,
        TableFile::Table(table) => {
            return Err(miette!(
                help = "Add a `base:` key naming the family to derive from",
                "{} defines table '{}' outright, not a derivation",
                args.file.display(),
                table.family_id
            ))
        }
    };
    let base = catalog.require(&derivation.base)?;
    let table = derive(base, &derivation.delta);

    match ctx.format {
        OutputFormat::Auto | OutputFormat::Yaml => {
            print!("{}", to_document(&table, OutputFormat::Yaml)?);
            Ok(())
        }
        _ => print_table(ctx, &table),
    }
}

#[derive(Debug, Serialize)]
struct IssueRecord {
    family_id: String,
    code: String,
    severity: &'static str,
    message: String,
}

impl From<(&str, &TableIssue)> for IssueRecord {
    fn from((family_id, issue): (&str, &TableIssue)) -> Self {
        Self {
            family_id: family_id.to_string(),
            code: issue.code().map(|c| c.to_string()).unwrap_or_default(),
            severity: if issue.is_error() { "error" } else { "warning" },
            message: issue.to_string(),
        }
    }
}

fn run_lint(ctx: &Context, catalog: &TableCatalog, args: LintArgs) -> Result<()> {
    let tables: Vec<&LogicTable> = match &args.family {
        Some(family) => vec![catalog.require(family)?],
        None => catalog.tables().collect(),
    };

    let findings: Vec<(&str, TableIssue)> = tables
        .iter()
        .flat_map(|table| {
            lint(table)
                .into_iter()
                .map(move |issue| (table.family_id.as_str(), issue))
        })
        .collect();
    let errors = findings.iter().filter(|(_, i)| i.is_error()).count();

    if ctx.format == OutputFormat::Auto {
        for (_, issue) in &findings {
            eprintln!("{:?}", miette::Report::new(issue.clone()));
        }
        if !ctx.quiet {
            println!(
                "{} table(s) checked: {} error(s), {} warning(s)",
                tables.len(),
                errors,
                findings.len() - errors
            );
        }
    } else {
        let records: Vec<IssueRecord> = findings
            .iter()
            .map(|(family, issue)| IssueRecord::from((*family, issue)))
            .collect();
        let mut rows = Rows::new(["family", "code", "severity", "message"]);
        for r in &records {
            rows.push([
                r.family_id.clone(),
                r.code.clone(),
                r.severity.to_string(),
                r.message.clone(),
            ]);
        }
        emit(&records, Some(&rows), ctx.format)?;
    }

    if errors > 0 {
        return Err(miette!("{} table error(s) found", errors));
    }
    Ok(())
}
