//! Table catalog: built-in tables plus tables found on disk
//!
//! Base tables are loaded first (built-ins, then each directory in order, a
//! later table replacing an earlier one with the same family id). Derivation
//! files are resolved afterwards, repeatedly, so a derivation may build on
//! another derivation regardless of file order.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::embedded::{embedded_files, embedded_str};
use crate::core::loader::yaml_files;
use crate::entities::LogicTable;
use crate::tables::derive::{derive, TableDerivation};
use crate::tables::TableError;
use crate::yaml::{parse_yaml_str, YamlError};

/// Where a table definition came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableOrigin {
    Builtin,
    File(PathBuf),
}

impl std::fmt::Display for TableOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableOrigin::Builtin => write!(f, "builtin"),
            TableOrigin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Origin of a catalog entry, plus its base when derived
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSource {
    pub origin: TableOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// Contents of one table file
#[derive(Debug, Clone, PartialEq)]
pub enum TableFile {
    Table(LogicTable),
    Derivation(TableDerivation),
}

impl TableFile {
    /// Parse a table or derivation; a top-level `base` key marks a derivation
    pub fn parse(source: &str, filename: &str) -> Result<Self, YamlError> {
        let value: serde_yml::Value = parse_yaml_str(source, filename)?;
        if value.get("base").is_some() {
            Ok(TableFile::Derivation(parse_yaml_str(source, filename)?))
        } else {
            Ok(TableFile::Table(parse_yaml_str(source, filename)?))
        }
    }

    pub fn load(path: &Path) -> Result<Self, YamlError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source, &path.display().to_string())
    }

    pub fn family_id(&self) -> &str {
        match self {
            TableFile::Table(table) => &table.family_id,
            TableFile::Derivation(derivation) => derivation.family_id(),
        }
    }
}

/// Logic tables keyed by family id
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: BTreeMap<String, LogicTable>,
    sources: BTreeMap<String, TableSource>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the tables compiled into the binary
    pub fn builtin() -> Result<Self, TableError> {
        Self::load(&[])
    }

    /// Built-in tables plus every table and derivation file under `dirs`
    pub fn load(dirs: &[PathBuf]) -> Result<Self, TableError> {
        let mut catalog = Self::new();
        let mut pending: Vec<(TableDerivation, TableOrigin)> = Vec::new();

        for name in embedded_files("tables/").into_iter().chain(embedded_files("derived/")) {
            let source =
                embedded_str(&name).ok_or_else(|| TableError::MissingBuiltin(name.clone()))?;
            match TableFile::parse(&source, &name)? {
                TableFile::Table(table) => catalog.insert(table, TableOrigin::Builtin, None),
                TableFile::Derivation(derivation) => {
                    pending.push((derivation, TableOrigin::Builtin))
                }
            }
        }

        for dir in dirs {
            for path in yaml_files(dir).map_err(|source| TableError::Walk {
                path: dir.clone(),
                source,
            })? {
                match TableFile::load(&path) {
                    Ok(TableFile::Table(table)) => {
                        catalog.insert(table, TableOrigin::File(path), None)
                    }
                    Ok(TableFile::Derivation(derivation)) => {
                        pending.push((derivation, TableOrigin::File(path)))
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping table file"),
                }
            }
        }

        catalog.resolve(pending)?;
        Ok(catalog)
    }

    /// Add or replace a table
    pub fn insert(&mut self, table: LogicTable, origin: TableOrigin, base: Option<String>) {
        if let Some(previous) = self.sources.get(&table.family_id) {
            debug!(family = %table.family_id, replaced = %previous.origin, "table replaced");
        }
        self.sources
            .insert(table.family_id.clone(), TableSource { origin, base });
        self.tables.insert(table.family_id.clone(), table);
    }

    /// Derive pending tables until none are left or none can make progress
    pub fn resolve(
        &mut self,
        mut pending: Vec<(TableDerivation, TableOrigin)>,
    ) -> Result<(), TableError> {
        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::new();

            for (derivation, origin) in pending {
                match self.tables.get(&derivation.base) {
                    Some(base) => {
                        let table = derive(base, &derivation.delta);
                        self.insert(table, origin, Some(derivation.base.clone()));
                    }
                    None => waiting.push((derivation, origin)),
                }
            }

            if waiting.len() == before {
                let (derivation, _) = &waiting[0];
                return Err(TableError::UnknownBase {
                    family_id: derivation.family_id().to_string(),
                    base: derivation.base.clone(),
                });
            }
            pending = waiting;
        }
        Ok(())
    }

    pub fn get(&self, family_id: &str) -> Option<&LogicTable> {
        self.tables.get(family_id)
    }

    /// Table for a family, or `UnknownFamily`
    pub fn require(&self, family_id: &str) -> Result<&LogicTable, TableError> {
        self.get(family_id)
            .ok_or_else(|| TableError::UnknownFamily(family_id.to_string()))
    }

    pub fn source(&self, family_id: &str) -> Option<&TableSource> {
        self.sources.get(family_id)
    }

    /// Tables in family-id order
    pub fn tables(&self) -> impl Iterator<Item = &LogicTable> {
        self.tables.values()
    }

    pub fn family_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
