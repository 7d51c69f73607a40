//! Built-in configuration data compiled into the binary
//!
//! - `param_map.yaml` - catalog parameter name → attribute identifier map
//! - `tables/*.yaml` - base logic tables
//! - `derived/*.yaml` - derivation files (a `base:` plus a delta)

use rust_embed::Embed;

#[derive(Embed)]
#[folder = "data/"]
struct EmbeddedData;

/// Embedded file contents as UTF-8
pub fn embedded_str(path: &str) -> Option<String> {
    let file = EmbeddedData::get(path)?;
    String::from_utf8(file.data.into_owned()).ok()
}

/// Embedded file names under a directory prefix, sorted
pub fn embedded_files(prefix: &str) -> Vec<String> {
    let mut files: Vec<String> = EmbeddedData::iter()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".yaml"))
        .map(|name| name.to_string())
        .collect();
    files.sort();
    files
}
