//! `xref classify` command - resolve part families

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::or_dash;
use crate::cli::output::{emit, Rows};
use crate::cli::{Context, GlobalOpts};
use crate::core::loader::load_parts;

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Record or mapped-part file (`-` for stdin)
    pub input: PathBuf,

    /// Refine this family instead of the one derived from the subcategory
    #[arg(long)]
    pub family: Option<String>,
}

pub fn run(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    let mapper = ctx.mapper()?;
    let classifier = ctx.classifier();

    let classifications: Vec<_> = load_parts(&args.input, &mapper)?
        .iter()
        .map(|part| match &args.family {
            Some(family) => {
                let mut result = classifier.classify(part);
                let refined = classifier.refine(family, part);
                result.attributes = crate::classify::enrich(&refined, part);
                result.base_family = Some(family.clone());
                result.family = Some(refined);
                result
            }
            None => classifier.classify(part),
        })
        .collect();

    let mut rows = Rows::new(["mpn", "subcategory", "base_family", "family"]);
    for c in &classifications {
        rows.push([
            c.mpn.clone(),
            c.attributes.part.subcategory.clone(),
            or_dash(c.base_family.as_deref()),
            or_dash(c.family.as_deref()),
        ]);
    }

    match classifications.as_slice() {
        [single] => emit(single, Some(&rows), ctx.format),
        _ => emit(&classifications, Some(&rows), ctx.format),
    }
}
