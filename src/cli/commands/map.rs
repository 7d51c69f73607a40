//! `xref map` command - raw catalog record to canonical part

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{format_number, or_dash};
use crate::cli::output::{decorated, emit, Rows};
use crate::cli::{Context, GlobalOpts, OutputFormat};
use crate::core::loader::load_records;
use crate::entities::PartAttributes;

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// Record file: one record, an array, or a search response (`-` for stdin)
    pub input: PathBuf,
}

/// One row per attribute, part number first
pub fn attribute_rows(parts: &[PartAttributes]) -> Rows {
    let mut rows = Rows::new(["mpn", "attribute_id", "name", "value", "numeric"]);
    for part in parts {
        for attr in &part.parameters {
            rows.push([
                part.part.mpn.clone(),
                attr.attribute_id.clone(),
                attr.attribute_name.clone(),
                attr.value.clone(),
                format_number(attr.numeric_value),
            ]);
        }
    }
    rows
}

pub fn print_part_header(part: &PartAttributes) {
    let p = &part.part;
    println!("{} {}", style(&p.mpn).cyan().bold(), style(&p.manufacturer).dim());
    if !p.description.is_empty() {
        println!("  {}", p.description);
    }
    println!(
        "  {} / {}  [{}]",
        p.category,
        or_dash(Some(&p.subcategory)),
        p.status
    );
}

pub fn run(args: MapArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    let mapper = ctx.mapper()?;
    let parts: Vec<PartAttributes> = load_records(&args.input)?
        .iter()
        .map(|record| mapper.map_attributes(record))
        .collect();

    if decorated(ctx.format, ctx.quiet) {
        for part in &parts {
            print_part_header(part);
            emit(part, Some(&attribute_rows(std::slice::from_ref(part))), OutputFormat::Auto)?;
        }
        return Ok(());
    }

    match parts.as_slice() {
        [single] => emit(single, Some(&attribute_rows(&parts)), ctx.format),
        _ => emit(&parts, Some(&attribute_rows(&parts)), ctx.format),
    }
}
