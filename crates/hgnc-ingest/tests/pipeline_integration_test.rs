//! Integration tests for the HGNC generation pipeline
//!
//! These tests run the pipeline end to end against small fixture files:
//! - Gene ids only
//! - Gene ids plus gene groups, with and without the closure table
//! - Reproducibility of repeated runs
//! - Failure handling (nothing written on malformed input)

use std::fs;
use std::path::{Path, PathBuf};

use hgnc_ingest::codesystem::{
    CatalogKind, CodeSystem, JsonFileSink, MemorySink, PropertyType, PropertyValue,
};
use hgnc_ingest::hgnc::{
    GeneratorConfig, GeneratorPipeline, GroupPropertyMode, IngestError, PipelineInputs,
};
use serde_json::json;
use tempfile::TempDir;

const GENES: &str = r#"{
    "responseHeader": {"status": 0},
    "response": {
        "numFound": 3,
        "docs": [
            {"hgnc_id": "HGNC:5", "symbol": "A1BG", "date_modified": "2020-01-01", "prev_symbol": ["ABG"]},
            {"hgnc_id": "HGNC:7", "symbol": "A2M", "date_modified": "2023-06-30", "prev_symbol": ["CPAMD5", "FWP007"]},
            {"hgnc_id": "HGNC:37133", "symbol": "A1BG-AS1", "date_modified": "2021-11-02"}
        ]
    }
}"#;

const GROUPS: &str = r#"[
    {"groupID": 1, "groupName": "Ring finger", "hgncID": "HGNC:7"},
    {"groupID": "2", "groupName": "Immunoglobulin like", "hgncID": "HGNC:5"},
    {"groupID": 3, "groupName": "Ig like cell adhesion", "hgncID": "HGNC:5"},
    {"groupID": 3, "groupName": "Ig like cell adhesion", "hgncID": "HGNC:99999"}
]"#;

const CLOSURE: &str = "2,2,0\n3,3,0\n2,3,1\n1,3,2\n";

/// Helper to write fixture files into a fresh temporary directory
fn fixture_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn read_catalog(path: &Path) -> CodeSystem {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn pipeline() -> GeneratorPipeline {
    GeneratorPipeline::new(GeneratorConfig::default())
}

// ============================================================================
// Gene Ids Only
// ============================================================================

#[test]
fn test_single_gene_example() {
    let dir = fixture_dir(&[(
        "genes.json",
        r#"{"response": {"docs": [
            {"hgnc_id": "HGNC:5", "symbol": "A1BG", "date_modified": "2020-01-01", "prev_symbol": ["ABG"]}
        ]}}"#,
    )]);

    let result = pipeline()
        .run(&PipelineInputs::genes_only(path(&dir, "genes.json")))
        .unwrap();

    let catalog = &result.gene_ids;
    assert_eq!(catalog.version, "2020-01-01");
    assert_eq!(catalog.count, 1);

    let concept = catalog.concept("HGNC:5").unwrap();
    assert_eq!(concept.display, "A1BG");
    assert_eq!(concept.synonyms().collect::<Vec<_>>(), vec!["ABG"]);
    assert!(concept.property.is_empty());
    assert!(catalog.property.is_empty());
    assert!(result.gene_groups.is_none());
}

#[test]
fn test_repeated_previous_symbol_yields_one_synonym() {
    let dir = fixture_dir(&[(
        "genes.json",
        r#"{"response": {"docs": [
            {"hgnc_id": "HGNC:5", "symbol": "A1BG", "prev_symbol": ["ABG", "ABG"]}
        ]}}"#,
    )]);

    let result = pipeline()
        .run(&PipelineInputs::genes_only(path(&dir, "genes.json")))
        .unwrap();

    let concept = result.gene_ids.concept("HGNC:5").unwrap();
    assert_eq!(concept.designation.len(), 1);
    assert_eq!(concept.synonyms().collect::<Vec<_>>(), vec!["ABG"]);
}

#[test]
fn test_genes_only_writes_single_catalog() {
    let dir = fixture_dir(&[("genes.json", GENES)]);
    let out = path(&dir, "gene-ids.json");

    let mut sink = JsonFileSink::new().with_gene_ids(&out);
    let result = pipeline()
        .run_into(&PipelineInputs::genes_only(path(&dir, "genes.json")), &mut sink)
        .unwrap();

    assert!(out.exists());
    assert_eq!(result.stats.genes, 3);
    assert_eq!(result.stats.groups, 0);

    let written = read_catalog(&out);
    assert_eq!(written, result.gene_ids);
    assert_eq!(written.url, "http://www.genenames.org/geneId");
    assert_eq!(written.name, "HGNCGeneIDs");
    assert_eq!(written.publisher, "CSIRO");
    assert_eq!(written.version, "2023-06-30");
}

// ============================================================================
// Gene Ids + Gene Groups
// ============================================================================

#[test]
fn test_two_sources_without_hierarchy() {
    let dir = fixture_dir(&[("genes.json", GENES), ("groups.json", GROUPS)]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"));

    let result = pipeline().run(&inputs).unwrap();

    let a1bg = result.gene_ids.concept("HGNC:5").unwrap();
    let groups: Vec<_> = a1bg
        .properties("groupId")
        .filter_map(PropertyValue::as_str)
        .collect();
    assert_eq!(groups, vec!["2", "3"]);

    let definition = result.gene_ids.property_definition("groupId").unwrap();
    assert_eq!(definition.kind, PropertyType::String);

    // A gene without memberships carries no group properties
    assert!(result.gene_ids.concept("HGNC:37133").unwrap().property.is_empty());

    let gene_groups = result.gene_groups.unwrap();
    assert_eq!(gene_groups.count, 3);
    assert_eq!(gene_groups.version, result.gene_ids.version);
    assert_eq!(gene_groups.concept("1").unwrap().display, "Ring finger");
    assert!(gene_groups.property.is_empty());
    assert!(gene_groups.concept("3").unwrap().property.is_empty());

    assert_eq!(result.stats.unknown_genes, 1);
}

#[test]
fn test_three_sources_with_hierarchy() {
    let dir = fixture_dir(&[
        ("genes.json", GENES),
        ("groups.json", GROUPS),
        ("closure.csv", CLOSURE),
    ]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"))
        .with_closure(path(&dir, "closure.csv"));

    let result = pipeline().run(&inputs).unwrap();
    let gene_groups = result.gene_groups.unwrap();

    let child = gene_groups.concept("3").unwrap();
    let parents: Vec<_> = child
        .properties("parent")
        .filter_map(PropertyValue::as_str)
        .collect();
    assert_eq!(parents, vec!["2"]);
    assert_eq!(
        child.properties("root").filter_map(PropertyValue::as_bool).collect::<Vec<_>>(),
        vec![false]
    );

    for root in ["1", "2"] {
        let concept = gene_groups.concept(root).unwrap();
        assert_eq!(concept.properties("parent").count(), 0);
        assert_eq!(
            concept.properties("root").filter_map(PropertyValue::as_bool).collect::<Vec<_>>(),
            vec![true]
        );
    }

    assert_eq!(
        gene_groups.property_definition("parent").unwrap().kind,
        PropertyType::Code
    );
    assert_eq!(
        gene_groups.property_definition("root").unwrap().kind,
        PropertyType::Boolean
    );
    assert_eq!(result.stats.direct_edges, 1);
    assert_eq!(result.stats.dangling_parents, 0);
}

#[test]
fn test_dangling_parent_is_reported() {
    let dir = fixture_dir(&[
        ("genes.json", GENES),
        ("groups.json", GROUPS),
        ("closure.csv", "404,1,1\n"),
    ]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"))
        .with_closure(path(&dir, "closure.csv"));

    let result = pipeline().run(&inputs).unwrap();
    let ring_finger = result.gene_groups.as_ref().unwrap().concept("1").unwrap();

    assert_eq!(ring_finger.properties("parent").count(), 0);
    assert_eq!(
        ring_finger.properties("root").filter_map(PropertyValue::as_bool).collect::<Vec<_>>(),
        vec![false]
    );
    assert_eq!(result.stats.dangling_parents, 1);
}

#[test]
fn test_coding_group_property() {
    let dir = fixture_dir(&[("genes.json", GENES), ("groups.json", GROUPS)]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"));

    let config = GeneratorConfig::default().with_group_property(GroupPropertyMode::Coding);
    let result = GeneratorPipeline::new(config).run(&inputs).unwrap();

    let a2m = result.gene_ids.concept("HGNC:7").unwrap();
    let value = serde_json::to_value(&a2m.property[0]).unwrap();
    assert_eq!(
        value,
        json!({
            "code": "groupId",
            "valueCoding": {
                "system": "http://www.genenames.org/genegroup",
                "code": "1",
                "display": "Ring finger"
            }
        })
    );
    assert_eq!(
        result.gene_ids.property_definition("groupId").unwrap().kind,
        PropertyType::Coding
    );
}

#[test]
fn test_closure_with_header_row() {
    let dir = fixture_dir(&[
        ("genes.json", GENES),
        ("groups.json", GROUPS),
        ("closure.csv", "parent_fam_id,child_fam_id,distance\n2,3,1\n"),
    ]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"))
        .with_closure(path(&dir, "closure.csv"));

    // Without the header flag the header row is a malformed record
    let err = pipeline().run(&inputs).unwrap_err();
    assert!(err.is_record_error());

    let config = GeneratorConfig::default().with_closure_header(true);
    let result = GeneratorPipeline::new(config).run(&inputs).unwrap();
    assert_eq!(result.stats.direct_edges, 1);
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_repeated_runs_are_identical() {
    let dir = fixture_dir(&[
        ("genes.json", GENES),
        ("groups.json", GROUPS),
        ("closure.csv", CLOSURE),
    ]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"))
        .with_closure(path(&dir, "closure.csv"));

    let render = || {
        let mut sink = MemorySink::new();
        pipeline().run_into(&inputs, &mut sink).unwrap();
        (
            serde_json::to_string(sink.get(CatalogKind::GeneIds).unwrap()).unwrap(),
            serde_json::to_string(sink.get(CatalogKind::GeneGroups).unwrap()).unwrap(),
        )
    };

    assert_eq!(render(), render());
}

#[test]
fn test_input_order_does_not_change_output() {
    let shuffled_genes = r#"{"response": {"docs": [
        {"hgnc_id": "HGNC:37133", "symbol": "A1BG-AS1", "date_modified": "2021-11-02"},
        {"hgnc_id": "HGNC:7", "symbol": "A2M", "date_modified": "2023-06-30", "prev_symbol": ["FWP007", "CPAMD5"]},
        {"hgnc_id": "HGNC:5", "symbol": "A1BG", "date_modified": "2020-01-01", "prev_symbol": ["ABG"]}
    ]}}"#;

    let original = fixture_dir(&[("genes.json", GENES)]);
    let shuffled = fixture_dir(&[("genes.json", shuffled_genes)]);

    let first = pipeline()
        .run(&PipelineInputs::genes_only(path(&original, "genes.json")))
        .unwrap();
    let second = pipeline()
        .run(&PipelineInputs::genes_only(path(&shuffled, "genes.json")))
        .unwrap();

    assert_eq!(first.gene_ids, second.gene_ids);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[test]
fn test_structural_error_writes_nothing() {
    let dir = fixture_dir(&[
        ("genes.json", r#"{"responseHeader": {"status": 0}}"#),
        ("groups.json", GROUPS),
    ]);
    let genes_out = path(&dir, "gene-ids.json");
    let groups_out = path(&dir, "gene-groups.json");

    let mut sink = JsonFileSink::new()
        .with_gene_ids(&genes_out)
        .with_gene_groups(&groups_out);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"));

    let err = pipeline().run_into(&inputs, &mut sink).unwrap_err();

    assert!(err.is_structural());
    assert!(!genes_out.exists());
    assert!(!groups_out.exists());
}

#[test]
fn test_malformed_group_entry_aborts() {
    let dir = fixture_dir(&[
        ("genes.json", GENES),
        ("groups.json", r#"[{"groupID": 1, "hgncID": "HGNC:7"}]"#),
    ]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"));

    let err = pipeline().run(&inputs).unwrap_err();
    assert!(matches!(
        err,
        IngestError::MissingField {
            field: "groupName",
            record: 1,
            ..
        }
    ));
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = fixture_dir(&[("genes.json", "{ not json")]);
    let err = pipeline()
        .run(&PipelineInputs::genes_only(path(&dir, "genes.json")))
        .unwrap_err();
    assert!(matches!(err, IngestError::Json(_)));
}

#[test]
fn test_missing_gene_ids_path_writes_nothing() {
    let dir = fixture_dir(&[("genes.json", GENES), ("groups.json", GROUPS)]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"));
    let groups_out = path(&dir, "gene-groups.json");

    let mut sink = JsonFileSink::new().with_gene_groups(&groups_out);
    let err = pipeline().run_into(&inputs, &mut sink).unwrap_err();

    assert!(matches!(err, IngestError::Config(_)));
    assert!(err.to_string().contains("gene ids"));
    assert!(!groups_out.exists());
}

#[test]
fn test_missing_output_path_is_config_error() {
    let dir = fixture_dir(&[("genes.json", GENES), ("groups.json", GROUPS)]);
    let inputs = PipelineInputs::genes_only(path(&dir, "genes.json"))
        .with_groups(path(&dir, "groups.json"));

    let mut sink = JsonFileSink::new().with_gene_ids(path(&dir, "gene-ids.json"));
    let err = pipeline().run_into(&inputs, &mut sink).unwrap_err();
    assert!(matches!(err, IngestError::Config(_)));
}
