//! `xref search` command - reduce a keyword search response

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::map::{attribute_rows, print_part_header};
use crate::cli::helpers::{input_name, truncate_str};
use crate::cli::output::{decorated, emit, Rows};
use crate::cli::{Context, GlobalOpts, OutputFormat};
use crate::core::loader::load_search_response;
use crate::mapper::{reduce_search, SearchOutcome};

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Keyword search response (`-` for stdin)
    pub input: PathBuf,
}

fn outcome_rows(outcome: &SearchOutcome) -> Rows {
    match outcome {
        SearchOutcome::None => Rows::new(["mpn", "manufacturer", "subcategory", "description"]),
        SearchOutcome::Single { part } => attribute_rows(std::slice::from_ref(part.as_ref())),
        SearchOutcome::Multiple { parts } => {
            let mut rows = Rows::new(["mpn", "manufacturer", "subcategory", "description"]);
            for p in parts {
                rows.push([
                    p.mpn.clone(),
                    p.manufacturer.clone(),
                    p.subcategory.clone(),
                    truncate_str(&p.description, 60),
                ]);
            }
            rows
        }
    }
}

pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    let mapper = ctx.mapper()?;
    let response = load_search_response(&args.input)?;
    let outcome = reduce_search(&mapper, &response);
    let rows = outcome_rows(&outcome);

    if !decorated(ctx.format, ctx.quiet) {
        return emit(&outcome, Some(&rows), ctx.format);
    }

    match &outcome {
        SearchOutcome::None => {
            println!(
                "{} in {}",
                style("No parts found").yellow(),
                input_name(&args.input)
            );
        }
        SearchOutcome::Single { part } => {
            print_part_header(part);
            emit(&outcome, Some(&rows), OutputFormat::Auto)?;
        }
        SearchOutcome::Multiple { parts } => {
            emit(&outcome, Some(&rows), OutputFormat::Auto)?;
            println!("{} part(s) found", style(parts.len()).cyan());
        }
    }
    Ok(())
}
