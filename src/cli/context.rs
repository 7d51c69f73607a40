//! Per-invocation state shared by commands

use miette::Result;

use crate::classify::FamilyClassifier;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::entities::PartAttributes;
use crate::mapper::{AttributeMapper, ParamMap};
use crate::tables::TableCatalog;

/// Effective configuration plus command-line overrides
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Load the layered config and fold in global flags
    pub fn load(global: &GlobalOpts) -> Self {
        Self::with_config(Config::load(), global)
    }

    pub fn with_config(mut config: Config, global: &GlobalOpts) -> Self {
        config.table_dirs.extend(global.table_dirs.iter().cloned());
        if let Some(path) = &global.param_map {
            config.param_map = Some(path.clone());
        }
        let format = global.format.resolve(config.default_format.as_deref());
        Self {
            config,
            format,
            quiet: global.quiet,
        }
    }

    /// Mapper over the configured parameter map, or the built-in one
    pub fn mapper(&self) -> Result<AttributeMapper> {
        let params = match &self.config.param_map {
            Some(path) => ParamMap::load(path)?,
            None => ParamMap::embedded()?,
        };
        Ok(AttributeMapper::new(params))
    }

    /// Built-in tables plus every configured table directory
    pub fn catalog(&self) -> Result<TableCatalog> {
        Ok(TableCatalog::load(&self.config.table_dirs)?)
    }

    pub fn classifier(&self) -> FamilyClassifier {
        FamilyClassifier::default()
    }

    /// Family for `source`: refined explicit id, else resolved from the part
    pub fn family_for(
        &self,
        classifier: &FamilyClassifier,
        explicit: Option<&str>,
        source: &PartAttributes,
    ) -> Result<String> {
        match explicit {
            Some(family) => Ok(family.to_string()),
            None => classifier.resolve_family(source).ok_or_else(|| {
                miette::miette!(
                    help = "Pass --family to choose a rule table",
                    "Cannot determine a family for {} (subcategory '{}')",
                    source.part.mpn,
                    source.part.subcategory
                )
            }),
        }
    }
}
