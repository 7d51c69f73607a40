//! Input loading utilities
//!
//! Rule-table directories are scanned for YAML files; part records come from
//! JSON or YAML files (or stdin) in any of the shapes the catalog produces.

use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::entities::PartAttributes;
use crate::mapper::{AttributeMapper, CatalogProduct, KeywordSearchResponse};

/// Path that means "read standard input"
pub const STDIN: &str = "-";

/// All `.yaml`/`.yml` files under `dir`, sorted by path
///
/// A directory that does not exist yields no files.
pub fn yaml_files(dir: &Path) -> std::result::Result<Vec<PathBuf>, walkdir::Error> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|e| e == "yaml" || e == "yml")
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Read a file, or stdin for `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .into_diagnostic()
            .wrap_err("Failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}

fn is_yaml(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "yaml" || e == "yml")
}

/// Parse a document as JSON, or YAML for `.yaml`/`.yml` paths
fn parse_document(path: &Path) -> Result<Value> {
    let content = read_input(path)?;
    if is_yaml(path) {
        serde_yml::from_str(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid JSON in {}", path.display()))
    }
}

fn is_search_response(value: &Value) -> bool {
    value.get("ExactMatches").is_some() || value.get("Products").is_some()
}

/// Already-mapped parts carry a `part` object
fn is_mapped(value: &Value) -> bool {
    value.get("part").is_some_and(Value::is_object)
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value, path: &Path) -> Result<T> {
    serde_json::from_value(value)
        .into_diagnostic()
        .wrap_err_with(|| format!("Unexpected record shape in {}", path.display()))
}

/// Load a keyword search response
pub fn load_search_response(path: &Path) -> Result<KeywordSearchResponse> {
    let value = parse_document(path)?;
    if !is_search_response(&value) {
        return Err(miette!(
            "{} is not a search response (expected ExactMatches or Products)",
            path.display()
        ));
    }
    from_value(value, path)
}

/// Load raw catalog records
///
/// Accepts a single record, an array of records, or a search response (its
/// exact matches followed by its products).
pub fn load_records(path: &Path) -> Result<Vec<CatalogProduct>> {
    let value = parse_document(path)?;
    records_from_value(value, path)
}

fn records_from_value(value: Value, path: &Path) -> Result<Vec<CatalogProduct>> {
    match value {
        Value::Array(_) => from_value(value, path),
        Value::Object(_) if is_search_response(&value) => {
            let response: KeywordSearchResponse = from_value(value, path)?;
            Ok(response
                .exact_matches
                .into_iter()
                .chain(response.products)
                .collect())
        }
        Value::Object(_) => Ok(vec![from_value(value, path)?]),
        _ => Err(miette!("{} does not contain a record", path.display())),
    }
}

/// Load exactly one raw record
pub fn load_record(path: &Path) -> Result<CatalogProduct> {
    let mut records = load_records(path)?;
    match records.len() {
        1 => Ok(records.remove(0)),
        0 => Err(miette!("{} contains no records", path.display())),
        n => Err(miette!(
            "{} contains {} records; expected one",
            path.display(),
            n
        )),
    }
}

/// Load parts, mapping raw catalog records on the way
///
/// Files previously written by `xref map` (objects with a `part` key) are
/// taken as they are.
pub fn load_parts(path: &Path, mapper: &AttributeMapper) -> Result<Vec<PartAttributes>> {
    let value = parse_document(path)?;

    let mapped = match &value {
        Value::Array(items) => !items.is_empty() && items.iter().all(is_mapped),
        other => is_mapped(other),
    };
    if mapped {
        return match value {
            Value::Array(_) => from_value(value, path),
            _ => Ok(vec![from_value(value, path)?]),
        };
    }

    Ok(records_from_value(value, path)?
        .iter()
        .map(|record| mapper.map_attributes(record))
        .collect())
}

/// Load exactly one part
pub fn load_part(path: &Path, mapper: &AttributeMapper) -> Result<PartAttributes> {
    let mut parts = load_parts(path, mapper)?;
    match parts.len() {
        1 => Ok(parts.remove(0)),
        0 => Err(miette!("{} contains no parts", path.display())),
        n => Err(miette!(
            "{} contains {} parts; expected one",
            path.display(),
            n
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const RECORD: &str = r#"{
        "ManufacturerProductNumber": "GRM188R71H104KA93D",
        "Manufacturer": {"Name": "Murata"},
        "Category": {"Name": "Capacitors", "ChildCategories": [{"Name": "Ceramic Capacitors"}]},
        "Parameters": [{"ParameterText": "Capacitance", "ValueText": "0.1 µF"}]
    }"#;

    #[test]
    fn test_yaml_files_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.yaml"), "").unwrap();
        fs::write(dir.path().join("nested/a.yml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = yaml_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("b.yaml"), PathBuf::from("nested/a.yml")]);
    }

    #[test]
    fn test_yaml_files_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(yaml_files(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_load_records_shapes() {
        let dir = tempdir().unwrap();

        let single = dir.path().join("single.json");
        fs::write(&single, RECORD).unwrap();
        assert_eq!(load_records(&single).unwrap().len(), 1);

        let array = dir.path().join("array.json");
        fs::write(&array, format!("[{RECORD}, {RECORD}]")).unwrap();
        assert_eq!(load_records(&array).unwrap().len(), 2);

        let search = dir.path().join("search.json");
        fs::write(
            &search,
            format!(r#"{{"ExactMatches": [{RECORD}], "Products": [{RECORD}]}}"#),
        )
        .unwrap();
        assert_eq!(load_records(&search).unwrap().len(), 2);
        assert_eq!(load_search_response(&search).unwrap().exact_matches.len(), 1);
        assert!(load_search_response(&single).is_err());
    }

    #[test]
    fn test_load_record_rejects_many() {
        let dir = tempdir().unwrap();
        let array = dir.path().join("array.json");
        fs::write(&array, format!("[{RECORD}, {RECORD}]")).unwrap();
        assert!(load_record(&array).is_err());
    }

    #[test]
    fn test_load_parts_maps_and_passes_through() {
        let dir = tempdir().unwrap();
        let mapper = AttributeMapper::with_defaults().unwrap();

        let raw = dir.path().join("raw.json");
        fs::write(&raw, RECORD).unwrap();
        let part = load_part(&raw, &mapper).unwrap();
        assert_eq!(part.part.mpn, "GRM188R71H104KA93D");
        assert!(part.has("capacitance"));

        let mapped = dir.path().join("mapped.yaml");
        fs::write(&mapped, serde_yml::to_string(&part).unwrap()).unwrap();
        let reloaded = load_part(&mapped, &mapper).unwrap();
        assert_eq!(reloaded, part);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_records(&path).is_err());
    }
}
