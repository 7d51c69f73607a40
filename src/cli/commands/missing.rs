//! `xref missing` command - rule attributes a part lacks

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::classify::enrich;
use crate::cli::output::{decorated, emit, to_document, Rows};
use crate::cli::{Context, GlobalOpts, OutputFormat};
use crate::core::loader::load_part;
use crate::core::units::extract_numeric_value;
use crate::entities::{MissingAttribute, ParametricAttribute, PartAttributes};
use crate::mapper::AttributeMapper;
use crate::matching::detect_missing_attributes;

#[derive(clap::Args, Debug)]
pub struct MissingArgs {
    /// Record or mapped-part file (`-` for stdin)
    pub input: PathBuf,

    /// Rule table family (default: resolved from the part)
    #[arg(long)]
    pub family: Option<String>,

    /// Ask for each missing value and print the completed part
    #[arg(long, short = 'p')]
    pub prompt: bool,
}

#[derive(Debug, Serialize)]
struct MissingReport<'a> {
    mpn: &'a str,
    family: &'a str,
    missing: &'a [MissingAttribute],
}

/// Attribute built from a value typed at the prompt
pub fn entered_attribute(
    mapper: &AttributeMapper,
    part: &PartAttributes,
    missing: &MissingAttribute,
    value: &str,
) -> ParametricAttribute {
    let numeric = match mapper
        .params()
        .unit_for(part.part.category, &missing.attribute_id)
    {
        Some(unit) => unit.extract(value),
        None => extract_numeric_value(value),
    };
    let mut attribute =
        ParametricAttribute::text(&missing.attribute_id, &missing.attribute_name, value);
    attribute.numeric_value = numeric;
    attribute
}

fn prompt_values(
    mapper: &AttributeMapper,
    part: PartAttributes,
    missing: &[MissingAttribute],
) -> Result<PartAttributes> {
    let theme = ColorfulTheme::default();
    let mut completed = part;
    for m in missing {
        let value: String = Input::with_theme(&theme)
            .with_prompt(format!("{} ({}, weight {})", m.attribute_name, m.logic_type, m.weight))
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let attribute = entered_attribute(mapper, &completed, m, value);
        completed = completed.with_parameter(attribute);
    }
    Ok(completed)
}

pub fn run(args: MissingArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    let mapper = ctx.mapper()?;
    let classifier = ctx.classifier();
    let catalog = ctx.catalog()?;

    let part = load_part(&args.input, &mapper)?;
    let family = ctx.family_for(&classifier, args.family.as_deref(), &part)?;
    let table = catalog.require(&family)?;
    let part = enrich(&family, &part);
    let missing = detect_missing_attributes(table, &part);

    if args.prompt {
        if missing.is_empty() {
            eprintln!("{}", style("Nothing missing").green());
        }
        let completed = prompt_values(&mapper, part, &missing)?;
        let format = match ctx.format {
            OutputFormat::Json => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        };
        print!("{}", to_document(&completed, format)?);
        return Ok(());
    }

    let report = MissingReport {
        mpn: &part.part.mpn,
        family: &family,
        missing: &missing,
    };
    let mut rows = Rows::new(["attribute_id", "name", "logic", "weight"]);
    for m in &missing {
        rows.push([
            m.attribute_id.clone(),
            m.attribute_name.clone(),
            m.logic_type.to_string(),
            m.weight.to_string(),
        ]);
    }

    if !decorated(ctx.format, ctx.quiet) {
        return emit(&report, Some(&rows), ctx.format);
    }
    if missing.is_empty() {
        println!(
            "{} has every attribute the {} table scores",
            style(&part.part.mpn).cyan(),
            table.family_name
        );
        return Ok(());
    }
    emit(&report, Some(&rows), OutputFormat::Auto)?;
    println!(
        "{} attribute(s) missing, {} of {} weight",
        style(missing.len()).yellow(),
        missing.iter().map(|m| u64::from(m.weight)).sum::<u64>(),
        table.total_weight()
    );
    Ok(())
}
