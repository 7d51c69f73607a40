//! Configuration management with layered hierarchy
//!
//! Sources, lowest priority first: built-in defaults, the global user config,
//! the nearest project `.xref/config.yaml`, then environment variables.
//! Scalar settings from a later layer replace earlier ones; `table_dirs`
//! accumulate across layers.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::yaml::{parse_yaml_file, YamlError};

/// Directory holding a project's config file
pub const PROJECT_DIR: &str = ".xref";

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid config file {}", path.display())]
    #[diagnostic(code(xref::config::invalid))]
    Invalid {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: YamlError,
    },

    #[error("{name}={value} is not valid")]
    #[diagnostic(code(xref::config::env), help("{hint}"))]
    InvalidEnv {
        name: &'static str,
        value: String,
        hint: &'static str,
    },
}

/// xref configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra directories of rule tables and derivation files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub table_dirs: Vec<PathBuf>,

    /// Replacement parameter map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_map: Option<PathBuf>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Cap on ranked recommendations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,

    /// List candidates that failed a rule when ranking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_failing: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut config = Self::load_from(Self::global_config_path().as_deref(), &cwd);

        if let Err(e) = config.apply_env(|name| std::env::var_os(name)) {
            warn!("{}", e);
        }
        config
    }

    /// Global then project layers, without the environment
    pub fn load_from(global: Option<&Path>, start: &Path) -> Self {
        let mut config = Config::default();

        let layers = [
            global.map(Path::to_path_buf),
            Self::project_config_path(start),
        ];
        for path in layers.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::read_file(&path) {
                Ok(layer) => config.merge(layer),
                Err(e) => warn!("{}", e),
            }
        }

        config
    }

    /// Read one config file; relative paths resolve against its owner directory
    pub fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = parse_yaml_file(path).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        let base = Self::base_dir(path);
        config.table_dirs = config
            .table_dirs
            .into_iter()
            .map(|dir| base.join(dir))
            .collect();
        config.param_map = config.param_map.map(|p| base.join(p));
        Ok(config)
    }

    /// Project root for `.xref/config.yaml`, else the file's own directory
    fn base_dir(path: &Path) -> PathBuf {
        let parent = path.parent().unwrap_or(Path::new("."));
        match parent.file_name() {
            Some(name) if name == PROJECT_DIR => {
                parent.parent().unwrap_or(parent).to_path_buf()
            }
            _ => parent.to_path_buf(),
        }
    }

    /// Apply `XREF_*` environment variables through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<std::ffi::OsString>,
    {
        if let Some(dirs) = lookup("XREF_TABLE_DIRS") {
            self.table_dirs
                .extend(std::env::split_paths(&dirs).filter(|p| !p.as_os_str().is_empty()));
        }
        if let Some(path) = lookup("XREF_PARAM_MAP") {
            self.param_map = Some(PathBuf::from(path));
        }
        if let Some(format) = lookup("XREF_FORMAT") {
            self.default_format = Some(format.to_string_lossy().into_owned());
        }
        if let Some(value) = lookup("XREF_MAX_RESULTS") {
            let value = value.to_string_lossy().into_owned();
            let parsed = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "XREF_MAX_RESULTS",
                value: value.clone(),
                hint: "Use a positive whole number",
            })?;
            self.max_results = Some(parsed);
        }
        Ok(())
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "xref")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Nearest `.xref/config.yaml` walking up from `start`
    pub fn project_config_path(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_DIR).join(CONFIG_FILE))
            .find(|path| path.is_file())
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.table_dirs.extend(other.table_dirs);
        if other.param_map.is_some() {
            self.param_map = other.param_map;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.max_results.is_some() {
            self.max_results = other.max_results;
        }
        if other.include_failing.is_some() {
            self.include_failing = other.include_failing;
        }
    }

    pub fn include_failing(&self) -> bool {
        self.include_failing.unwrap_or(true)
    }
}
