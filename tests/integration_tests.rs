//! Integration tests for the xref CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get an xref command isolated from the user's config
fn xref(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xref").unwrap();
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg"))
        .env("HOME", tmp.path())
        .env_remove("XREF_TABLE_DIRS")
        .env_remove("XREF_PARAM_MAP")
        .env_remove("XREF_FORMAT")
        .env_remove("XREF_MAX_RESULTS")
        .env_remove("RUST_LOG");
    cmd
}

/// Raw catalog record for a 0603 MLCC
fn mlcc_record(mpn: &str, manufacturer: &str, voltage: &str, dielectric: &str) -> String {
    format!(
        r#"{{
  "ManufacturerProductNumber": "{mpn}",
  "Manufacturer": {{"Name": "{manufacturer}"}},
  "Description": {{"ProductDescription": "CAP CER 0.1UF {voltage} {dielectric} 0603"}},
  "ProductStatus": {{"Status": "Active"}},
  "Category": {{"Name": "Capacitors", "ChildCategories": [{{"Name": "Ceramic Capacitors"}}]}},
  "Parameters": [
    {{"ParameterText": "Capacitance", "ValueText": "0.1µF"}},
    {{"ParameterText": "Tolerance", "ValueText": "±10%"}},
    {{"ParameterText": "Voltage - Rated", "ValueText": "{voltage}"}},
    {{"ParameterText": "Temperature Coefficient", "ValueText": "{dielectric}"}},
    {{"ParameterText": "Operating Temperature", "ValueText": "-55°C ~ 125°C"}},
    {{"ParameterText": "Package / Case", "ValueText": "0603 (1608 Metric)"}},
    {{"ParameterText": "Packaging", "ValueText": "Tape & Reel (TR)"}}
  ]
}}"#
    )
}

fn write(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Source MLCC plus a candidate file with several alternatives
fn setup_mlcc_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp,
        "source.json",
        &mlcc_record("GRM188R71H104KA93D", "Murata", "50V", "X7R"),
    );
    write(
        &tmp,
        "same.json",
        &mlcc_record("CL10B104KB8NNNC", "Samsung", "50V", "X7R"),
    );
    write(
        &tmp,
        "lowv.json",
        &mlcc_record("C0603C104K3RACTU", "KEMET", "25V", "X7R"),
    );
    let candidates = format!(
        "[{}, {}, {}, {}]",
        mlcc_record("C0603C104K3RACTU", "KEMET", "25V", "X7R"),
        mlcc_record("GRM188R71H104KA93D", "Murata", "50V", "X7R"),
        mlcc_record("CL10B104KB8NNNC", "Samsung", "50V", "X7R"),
        mlcc_record("C1608C0G2A104J", "TDK", "100V", "C0G"),
    );
    write(&tmp, "candidates.json", &candidates);
    tmp
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

// ============================================================================
// Basic CLI
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    xref(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rank"))
        .stdout(predicate::str::contains("table"));
}

#[test]
fn test_version() {
    let tmp = TempDir::new().unwrap();
    xref(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xref"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    xref(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("xref"));
}

// ============================================================================
// Mapping and classification
// ============================================================================

#[test]
fn test_map_yaml() {
    let tmp = setup_mlcc_fixtures();
    xref(&tmp)
        .args(["map", "source.json", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mpn: GRM188R71H104KA93D"))
        .stdout(predicate::str::contains("subcategory: MLCC"))
        .stdout(predicate::str::contains("attribute_id: voltage_rated"));
}

#[test]
fn test_map_tsv_rows() {
    let tmp = setup_mlcc_fixtures();
    let out = stdout_of(xref(&tmp).args(["map", "source.json", "--format", "tsv"]));
    let mut lines = out.lines();
    assert_eq!(
        lines.next().unwrap(),
        "mpn\tattribute_id\tname\tvalue\tnumeric"
    );
    assert!(out.contains("GRM188R71H104KA93D\tvoltage_rated\tVoltage Rating\t50V\t50"));
}

#[test]
fn test_map_from_stdin() {
    let tmp = setup_mlcc_fixtures();
    xref(&tmp)
        .args(["map", "-", "--format", "json"])
        .write_stdin(mlcc_record("X1", "Acme", "16V", "X5R"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mpn\": \"X1\""));
}

#[test]
fn test_map_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    xref(&tmp)
        .args(["map", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_classify_schottky() {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp,
        "diode.json",
        r#"{
  "ManufacturerProductNumber": "BAT54",
  "Manufacturer": {"Name": "Nexperia"},
  "Description": {"ProductDescription": "DIODE SCHOTTKY 30V 200MA SOT23"},
  "Category": {"Name": "Discrete Semiconductor Products",
               "ChildCategories": [{"Name": "Diodes - Rectifiers - Single"}]}
}"#,
    );
    let out = stdout_of(xref(&tmp).args(["classify", "diode.json", "--format", "tsv"]));
    assert!(out.contains("BAT54\tRectifiers\trectifier_diode\tschottky_diode"));
}

// ============================================================================
// Evaluation and ranking
// ============================================================================

#[test]
fn test_eval_identical_part_passes() {
    let tmp = setup_mlcc_fixtures();
    xref(&tmp)
        .args(["eval", "source.json", "same.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"family\": \"mlcc\""))
        .stdout(predicate::str::contains("\"passed\": true"));
}

#[test]
fn test_eval_lower_voltage_fails() {
    let tmp = setup_mlcc_fixtures();
    let out = stdout_of(xref(&tmp).args(["eval", "source.json", "lowv.json", "--format", "json"]));
    assert!(out.contains("\"passed\": false"));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let voltage = value["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["attribute_id"] == "voltage_rated")
        .unwrap();
    assert_eq!(voltage["result"], "fail");
    assert_eq!(voltage["match_status"], "worse");
}

#[test]
fn test_eval_terminal_summary() {
    let tmp = setup_mlcc_fixtures();
    xref(&tmp)
        .args(["eval", "source.json", "lowv.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Match:"))
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_eval_unknown_family() {
    let tmp = setup_mlcc_fixtures();
    xref(&tmp)
        .args(["eval", "source.json", "same.json", "--family", "flux_capacitor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("flux_capacitor"));
}

#[test]
fn test_rank_orders_and_excludes_source() {
    let tmp = setup_mlcc_fixtures();
    let out = stdout_of(xref(&tmp).args([
        "rank",
        "source.json",
        "candidates.json",
        "--format",
        "tsv",
    ]));
    let mpns: Vec<&str> = out
        .lines()
        .skip(1)
        .map(|l| l.split('\t').nth(1).unwrap())
        .collect();
    assert_eq!(mpns.len(), 3);
    assert!(!mpns.contains(&"GRM188R71H104KA93D"));
    assert_eq!(mpns.last(), Some(&"C0603C104K3RACTU"));
    assert!(out.contains("C0603C104K3RACTU\tKEMET"));
}

#[test]
fn test_rank_passing_only_and_limit() {
    let tmp = setup_mlcc_fixtures();
    let out = stdout_of(xref(&tmp).args([
        "rank",
        "source.json",
        "candidates.json",
        "--passing-only",
        "--format",
        "tsv",
    ]));
    assert!(!out.contains("C0603C104K3RACTU"));
    assert_eq!(out.lines().count(), 3);

    let out = stdout_of(xref(&tmp).args([
        "rank",
        "source.json",
        "candidates.json",
        "-n",
        "1",
        "--format",
        "tsv",
    ]));
    assert_eq!(out.lines().count(), 2);
}

#[test]
fn test_rank_json_report() {
    let tmp = setup_mlcc_fixtures();
    let out = stdout_of(xref(&tmp).args([
        "rank",
        "source.json",
        "candidates.json",
        "same.json",
        "--format",
        "json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["family"], "mlcc");
    assert_eq!(value["evaluated"], 4);
    assert_eq!(value["recommendations"][0]["passed"], true);
}

#[test]
fn test_rank_config_max_results() {
    let tmp = setup_mlcc_fixtures();
    write(&tmp, ".xref/config.yaml", "max_results: 2\n");
    let out = stdout_of(xref(&tmp).args([
        "rank",
        "source.json",
        "candidates.json",
        "--format",
        "tsv",
    ]));
    assert_eq!(out.lines().count(), 3);
}

// ============================================================================
// Search and missing attributes
// ============================================================================

#[test]
fn test_search_single_after_dedup() {
    let tmp = TempDir::new().unwrap();
    let record = mlcc_record("GRM188R71H104KA93D", "Murata", "50V", "X7R");
    write(
        &tmp,
        "search.json",
        &format!(r#"{{"ExactMatches": [{record}], "Products": [{record}]}}"#),
    );
    xref(&tmp)
        .args(["search", "search.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"single\""));
}

#[test]
fn test_search_multiple_and_none() {
    let tmp = TempDir::new().unwrap();
    let a = mlcc_record("A1", "Acme", "50V", "X7R");
    let b = mlcc_record("B2", "Acme", "50V", "X7R");
    write(&tmp, "many.json", &format!(r#"{{"Products": [{a}, {b}]}}"#));
    write(&tmp, "empty.json", r#"{"ExactMatches": [], "Products": []}"#);

    xref(&tmp)
        .args(["search", "many.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"multiple\""));
    xref(&tmp)
        .args(["search", "empty.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"none\""));
}

#[test]
fn test_search_rejects_plain_record() {
    let tmp = setup_mlcc_fixtures();
    xref(&tmp)
        .args(["search", "source.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a search response"));
}

#[test]
fn test_missing_attributes() {
    let tmp = setup_mlcc_fixtures();
    let out = stdout_of(xref(&tmp).args(["missing", "source.json", "--format", "tsv"]));
    assert!(out.starts_with("attribute_id\tname\tlogic\tweight"));
    assert!(out.contains("aec_q200"));
    assert!(out.contains("height"));
    assert!(!out.contains("voltage_rated"));
    assert!(!out.contains("esr"));
}

// ============================================================================
// Rule tables
// ============================================================================

#[test]
fn test_table_list_includes_derived() {
    let tmp = TempDir::new().unwrap();
    let out = stdout_of(xref(&tmp).args(["table", "list", "--format", "tsv"]));
    assert!(out.contains("mlcc\t"));
    assert!(out.contains("schottky_diode\t"));
    assert!(out.contains("\trectifier_diode\tbuiltin"));
}

#[test]
fn test_table_show_yaml() {
    let tmp = TempDir::new().unwrap();
    xref(&tmp)
        .args(["table", "show", "mlcc", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("family_id: mlcc"))
        .stdout(predicate::str::contains("logic_type: identity_upgrade"));
}

#[test]
fn test_table_derive_file() {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp,
        "hv_mlcc.yaml",
        r#"base: mlcc
family_id: hv_mlcc
family_name: High Voltage MLCC
remove: [esr]
override:
  - attribute_id: voltage_rated
    weight: 10
add:
  - attribute_id: creepage
    attribute_name: Creepage
    logic_type: fit
    weight: 3
"#,
    );
    let out = stdout_of(xref(&tmp).args(["table", "derive", "hv_mlcc.yaml"]));
    assert!(out.contains("family_id: hv_mlcc"));
    assert!(out.contains("attribute_id: creepage"));
    assert!(!out.contains("attribute_id: esr"));
}

#[test]
fn test_user_table_dir() {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp,
        "tables/hv_mlcc.yaml",
        "base: mlcc\nfamily_id: hv_mlcc\nfamily_name: High Voltage MLCC\n",
    );
    let out = stdout_of(xref(&tmp).args(["table", "list", "--tables", "tables", "--format", "tsv"]));
    assert!(out.contains("hv_mlcc\tHigh Voltage MLCC"));
}

#[test]
fn test_table_lint_builtin_clean() {
    let tmp = TempDir::new().unwrap();
    xref(&tmp)
        .args(["table", "lint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 error(s)"));
}

#[test]
fn test_table_lint_reports_errors() {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp,
        "tables/broken.yaml",
        r#"family_id: broken
family_name: Broken
rules:
  - attribute_id: dielectric
    attribute_name: Dielectric
    logic_type: identity_upgrade
    weight: 5
"#,
    );
    xref(&tmp)
        .args(["table", "lint", "broken", "--tables", "tables", "--format", "tsv"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("xref::table::empty_hierarchy"));
}

#[test]
fn test_unknown_base_is_error() {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp,
        "tables/orphan.yaml",
        "base: unobtainium\nfamily_id: orphan\nfamily_name: Orphan\n",
    );
    xref(&tmp)
        .args(["table", "list", "--tables", "tables"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unobtainium"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_show_project_layer() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, ".xref/config.yaml", "max_results: 7\ninclude_failing: false\n");
    xref(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_results: 7"))
        .stdout(predicate::str::contains("include_failing: false"));
}

#[test]
fn test_config_env_format() {
    let tmp = setup_mlcc_fixtures();
    xref(&tmp)
        .env("XREF_FORMAT", "json")
        .args(["map", "source.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mpn\": \"GRM188R71H104KA93D\""));
}
