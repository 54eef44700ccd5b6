//! End-to-end tests for the hgnc-ingest binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const GENES: &str = r#"{"response": {"docs": [
    {"hgnc_id": "HGNC:5", "symbol": "A1BG", "date_modified": "2020-01-01", "prev_symbol": ["ABG"]},
    {"hgnc_id": "HGNC:7", "symbol": "A2M", "date_modified": "2023-06-30"}
]}}"#;

const GROUPS: &str = r#"[
    {"groupID": 1, "groupName": "Ring finger", "hgncID": "HGNC:7"},
    {"groupID": 2, "groupName": "Immunoglobulin like", "hgncID": "HGNC:5"}
]"#;

fn hgnc_ingest(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hgnc-ingest").unwrap();
    // Keep the run independent of any .env or HGNC_* settings on the host
    cmd.current_dir(dir.path())
        .env_remove("HGNC_PUBLISHER")
        .env_remove("HGNC_GENE_IDS_URL")
        .env_remove("HGNC_GENE_GROUPS_URL")
        .env_remove("HGNC_GROUP_PROPERTY")
        .env_remove("HGNC_CLOSURE_HAS_HEADER")
        .env_remove("HGNC_PRETTY_OUTPUT")
        .env("LOG_OUTPUT", "console");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("genes.json"), GENES).unwrap();
    fs::write(dir.path().join("groups.json"), GROUPS).unwrap();
    fs::write(dir.path().join("closure.csv"), "1,2,1\n").unwrap();
    dir
}

fn read_json(dir: &TempDir, name: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.path().join(name)).unwrap()).unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    let dir = setup();
    hgnc_ingest(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("genes"));
}

#[test]
fn test_generate_writes_both_code_systems() {
    let dir = setup();
    hgnc_ingest(&dir)
        .args([
            "generate",
            "--genes",
            "genes.json",
            "--groups",
            "groups.json",
            "--closure",
            "closure.csv",
            "--genes-out",
            "gene-ids.json",
            "--groups-out",
            "gene-groups.json",
        ])
        .assert()
        .success();

    let gene_ids = read_json(&dir, "gene-ids.json");
    assert_eq!(gene_ids["resourceType"], "CodeSystem");
    assert_eq!(gene_ids["version"], "2023-06-30");
    assert_eq!(gene_ids["count"], 2);
    assert_eq!(gene_ids["concept"][0]["code"], "HGNC:5");
    assert_eq!(gene_ids["concept"][0]["designation"][0]["value"], "ABG");
    assert_eq!(gene_ids["concept"][0]["property"][0]["valueString"], "2");

    let gene_groups = read_json(&dir, "gene-groups.json");
    assert_eq!(gene_groups["url"], "http://www.genenames.org/genegroup");
    assert_eq!(gene_groups["concept"][1]["code"], "2");
    assert_eq!(gene_groups["concept"][1]["property"][0]["valueCode"], "1");
    assert_eq!(gene_groups["concept"][1]["property"][1]["valueBoolean"], false);
}

#[test]
fn test_generate_with_coding_property() {
    let dir = setup();
    hgnc_ingest(&dir)
        .args([
            "generate",
            "--genes",
            "genes.json",
            "--groups",
            "groups.json",
            "--genes-out",
            "gene-ids.json",
            "--groups-out",
            "gene-groups.json",
            "--group-property",
            "coding",
            "--compact",
        ])
        .assert()
        .success();

    let raw = fs::read_to_string(dir.path().join("gene-ids.json")).unwrap();
    assert_eq!(raw.lines().count(), 1);

    let gene_ids: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        gene_ids["concept"][1]["property"][0]["valueCoding"]["display"],
        "Ring finger"
    );
}

#[test]
fn test_genes_subcommand() {
    let dir = setup();
    hgnc_ingest(&dir)
        .args(["genes", "--genes", "genes.json", "--out", "gene-ids.json"])
        .assert()
        .success();

    let gene_ids = read_json(&dir, "gene-ids.json");
    assert_eq!(gene_ids["name"], "HGNCGeneIDs");
    assert!(gene_ids.get("property").is_none());
    assert!(!dir.path().join("gene-groups.json").exists());
}

#[test]
fn test_malformed_input_fails() {
    let dir = setup();
    fs::write(dir.path().join("genes.json"), r#"{"docs": []}"#).unwrap();

    hgnc_ingest(&dir)
        .args(["genes", "--genes", "genes.json", "--out", "gene-ids.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("response"));

    assert!(!dir.path().join("gene-ids.json").exists());
}

#[test]
fn test_missing_input_file_fails() {
    let dir = setup();
    hgnc_ingest(&dir)
        .args(["genes", "--genes", "absent.json", "--out", "gene-ids.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn test_invalid_group_property_is_rejected() {
    let dir = setup();
    hgnc_ingest(&dir)
        .args([
            "generate",
            "--genes",
            "genes.json",
            "--groups",
            "groups.json",
            "--genes-out",
            "gene-ids.json",
            "--groups-out",
            "gene-groups.json",
            "--group-property",
            "reference",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reference"));
}
