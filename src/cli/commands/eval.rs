//! `xref eval` command - score one candidate against a source part

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::classify::enrich;
use crate::cli::helpers::or_dash;
use crate::cli::output::{decorated, emit, styled_passed, styled_percentage, styled_result, Rows};
use crate::cli::{Context, GlobalOpts, OutputFormat};
use crate::core::loader::load_part;
use crate::entities::{EvaluationResult, RuleEvaluation, RuleResult};
use crate::matching::evaluate;

#[derive(clap::Args, Debug)]
pub struct EvalArgs {
    /// Source part (the one being replaced)
    pub source: PathBuf,

    /// Candidate part
    pub candidate: PathBuf,

    /// Rule table family (default: resolved from the source part)
    #[arg(long)]
    pub family: Option<String>,
}

#[derive(Debug, Serialize)]
struct EvalReport<'a> {
    family: &'a str,
    source: &'a str,
    candidate: &'a str,
    #[serde(flatten)]
    result: &'a EvaluationResult,
}

/// One row per rule outcome
pub fn rule_rows(results: &[RuleEvaluation]) -> Rows {
    let mut rows = Rows::new([
        "attribute", "logic", "weight", "source", "candidate", "result", "status", "note",
    ]);
    for r in results {
        rows.push([
            r.attribute_id.clone(),
            r.logic_type.to_string(),
            r.weight.to_string(),
            or_dash(r.source_value.as_deref()),
            or_dash(r.candidate_value.as_deref()),
            r.result.to_string(),
            r.match_status.to_string(),
            or_dash(r.note.as_deref()),
        ]);
    }
    rows
}

pub fn run(args: EvalArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    let mapper = ctx.mapper()?;
    let classifier = ctx.classifier();
    let catalog = ctx.catalog()?;

    let source = load_part(&args.source, &mapper)?;
    let candidate = load_part(&args.candidate, &mapper)?;
    let family = ctx.family_for(&classifier, args.family.as_deref(), &source)?;
    let table = catalog.require(&family)?;

    let source = enrich(&family, &source);
    let candidate = enrich(&family, &candidate);
    let result = evaluate(table, &source, &candidate);

    let report = EvalReport {
        family: &family,
        source: &source.part.mpn,
        candidate: &candidate.part.mpn,
        result: &result,
    };
    let rows = rule_rows(&result.results);

    if !decorated(ctx.format, ctx.quiet) {
        return emit(&report, Some(&rows), ctx.format);
    }

    println!(
        "{} → {}  ({})",
        style(&source.part.mpn).cyan().bold(),
        style(&candidate.part.mpn).cyan().bold(),
        table.family_name
    );
    emit(&report, Some(&rows), OutputFormat::Auto)?;
    println!(
        "Match: {}  {}",
        styled_percentage(result.match_percentage),
        styled_passed(result.passed)
    );
    for r in result
        .results
        .iter()
        .filter(|r| matches!(r.result, RuleResult::Fail | RuleResult::Review))
    {
        println!(
            "  {} {}: {}",
            styled_result(r.result),
            r.attribute_name,
            r.note.as_deref().unwrap_or("values differ")
        );
    }
    Ok(())
}
