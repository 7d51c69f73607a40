//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    classify::ClassifyArgs, completions::CompletionsArgs, config::ConfigCommands, eval::EvalArgs,
    map::MapArgs, missing::MissingArgs, rank::RankArgs, search::SearchArgs, table::TableCommands,
};

#[derive(Parser)]
#[command(name = "xref")]
#[command(author, version, about = "Electronic component cross-reference engine")]
#[command(
    long_about = "Maps vendor catalog records to canonical parts, classifies them into families and ranks replacement candidates against per-family rule tables."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Extra rule table directory (repeatable; searched after configured ones)
    #[arg(long = "tables", global = true, value_name = "DIR")]
    pub table_dirs: Vec<PathBuf>,

    /// Parameter map to use instead of the built-in one
    #[arg(long, global = true, value_name = "FILE")]
    pub param_map: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Map a raw catalog record to a part with canonical attributes
    Map(MapArgs),

    /// Resolve the family of a part and apply family enrichment
    Classify(ClassifyArgs),

    /// Evaluate one candidate against a source part
    Eval(EvalArgs),

    /// Rank replacement candidates for a source part
    Rank(RankArgs),

    /// Reduce a keyword search response to none, one or many parts
    Search(SearchArgs),

    /// List rule attributes a part has no value for
    Missing(MissingArgs),

    /// Rule table management
    #[command(subcommand)]
    Table(TableCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick (tables on a terminal, yaml for single documents)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Parse a configured default format name
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }

    /// Explicit format, else the configured default, else auto
    pub fn resolve(self, configured: Option<&str>) -> Self {
        match self {
            OutputFormat::Auto => configured
                .and_then(Self::from_name)
                .unwrap_or(OutputFormat::Auto),
            explicit => explicit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(OutputFormat::Auto.resolve(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::Auto.resolve(Some("CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::Auto.resolve(Some("bogus")), OutputFormat::Auto);
        assert_eq!(OutputFormat::Tsv.resolve(Some("json")), OutputFormat::Tsv);
        assert_eq!(OutputFormat::Auto.resolve(None), OutputFormat::Auto);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["xref", "table", "list", "--format", "json", "--tables", "t"]);
        assert_eq!(cli.global.format, OutputFormat::Json);
        assert_eq!(cli.global.table_dirs, vec![PathBuf::from("t")]);
    }
}
