//! `xref rank` command - rank replacement candidates

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::classify::enrich;
use crate::cli::output::{decorated, emit, styled_passed, styled_percentage, Rows};
use crate::cli::{Context, GlobalOpts, OutputFormat};
use crate::core::loader::{load_part, load_parts};
use crate::entities::{PartAttributes, Recommendation, RuleResult};
use crate::matching::find_replacements;

#[derive(clap::Args, Debug)]
pub struct RankArgs {
    /// Source part (the one being replaced)
    pub source: PathBuf,

    /// Candidate files: records, arrays of records or search responses
    #[arg(required = true)]
    pub candidates: Vec<PathBuf>,

    /// Rule table family (default: resolved from the source part)
    #[arg(long)]
    pub family: Option<String>,

    /// Show at most this many recommendations
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Leave out candidates that failed a rule
    #[arg(long)]
    pub passing_only: bool,
}

#[derive(Debug, Serialize)]
struct RankReport<'a> {
    family: &'a str,
    source: &'a str,
    evaluated: usize,
    recommendations: &'a [Recommendation],
}

fn ids_with(rec: &Recommendation, result: RuleResult) -> String {
    rec.match_details
        .iter()
        .filter(|d| d.result == result)
        .map(|d| d.attribute_id.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn recommendation_rows(recs: &[Recommendation]) -> Rows {
    let mut rows = Rows::new([
        "rank", "mpn", "manufacturer", "match", "passed", "failed", "review",
    ]);
    for (i, rec) in recs.iter().enumerate() {
        rows.push([
            (i + 1).to_string(),
            rec.part.mpn.clone(),
            rec.part.manufacturer.clone(),
            format!("{}%", rec.match_percentage),
            rec.passed.to_string(),
            ids_with(rec, RuleResult::Fail),
            ids_with(rec, RuleResult::Review),
        ]);
    }
    rows
}

pub fn run(args: RankArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    let mapper = ctx.mapper()?;
    let classifier = ctx.classifier();
    let catalog = ctx.catalog()?;

    let source = load_part(&args.source, &mapper)?;
    let family = ctx.family_for(&classifier, args.family.as_deref(), &source)?;
    let table = catalog.require(&family)?;

    let mut candidates: Vec<PartAttributes> = Vec::new();
    for path in &args.candidates {
        candidates.extend(
            load_parts(path, &mapper)?
                .iter()
                .map(|part| enrich(&family, part)),
        );
    }
    let source = enrich(&family, &source);

    let mut recommendations = find_replacements(table, &source, &candidates);
    let evaluated = recommendations.len();
    if args.passing_only || !ctx.config.include_failing() {
        recommendations.retain(|r| r.passed);
    }
    if let Some(limit) = args.limit.or(ctx.config.max_results) {
        recommendations.truncate(limit);
    }

    let report = RankReport {
        family: &family,
        source: &source.part.mpn,
        evaluated,
        recommendations: &recommendations,
    };
    let rows = recommendation_rows(&recommendations);

    if !decorated(ctx.format, ctx.quiet) {
        return emit(&report, Some(&rows), ctx.format);
    }

    println!(
        "Replacements for {} ({})",
        style(&source.part.mpn).cyan().bold(),
        table.family_name
    );
    if recommendations.is_empty() {
        println!("{}", style("No candidates to show").dim());
        return Ok(());
    }
    emit(&report, Some(&rows), OutputFormat::Auto)?;
    if let Some(best) = recommendations.first() {
        println!(
            "Best: {} {}  {}",
            style(&best.part.mpn).bold(),
            styled_percentage(best.match_percentage),
            styled_passed(best.passed)
        );
    }
    println!(
        "{} of {} candidate(s) shown",
        recommendations.len(),
        evaluated
    );
    Ok(())
}
