//! Logic tables: derivation, the table catalog and structural lint

pub mod catalog;
pub mod derive;
pub mod lint;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::yaml::YamlError;

pub use catalog::{TableCatalog, TableFile, TableOrigin, TableSource};
pub use derive::{derive, RuleOverride, TableDelta, TableDerivation};
pub use lint::{lint, TableIssue};

#[derive(Debug, Error, Diagnostic)]
pub enum TableError {
    #[error("Table '{family_id}' derives from unknown base '{base}'")]
    #[diagnostic(
        code(xref::table::unknown_base),
        help("Run `xref table list` to see the families that can be used as a base")
    )]
    UnknownBase { family_id: String, base: String },

    #[error("No logic table for family '{0}'")]
    #[diagnostic(
        code(xref::table::unknown_family),
        help("Run `xref table list` to see available families, or add a table directory in the config")
    )]
    UnknownFamily(String),

    #[error("Built-in table '{0}' is missing")]
    #[diagnostic(code(xref::table::missing_builtin))]
    MissingBuiltin(String),

    #[error("Failed to read table directory {path}")]
    #[diagnostic(code(xref::table::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),
}
