//! Manifest loading and lineage extraction against the abcd fixture

use dbthelper_core::{LineageSource, NodeKind};
use dbthelper_dbt::{Manifest, ManifestError, ManifestLineage};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn manifest_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/abcd-project/target/manifest.json")
}

#[test]
fn fixture_manifest_loads() {
    let manifest = Manifest::from_file(&manifest_path()).unwrap();

    assert_eq!(manifest.models().len(), 4);
    assert!(manifest.get_node("test.abcd.not_null_a_id").is_some());
    assert!(manifest.get_source("source.abcd.raw.events").is_some());
    assert_eq!(manifest.find_unique_id("d"), Some("model.abcd.d".to_string()));
}

#[test]
fn lineage_input_skips_tests() {
    let lineage = ManifestLineage::from_file(&manifest_path()).unwrap();
    let input = lineage.lineage_input();

    assert!(!input.contains("test.abcd.not_null_a_id"));
    assert!(input.contains("seed.abcd.countries"));
    assert!(input.contains("source.abcd.raw.events"));

    let d_parents: Vec<&str> = input.parents["model.abcd.d"].iter().map(String::as_str).collect();
    assert_eq!(d_parents, vec!["model.abcd.b", "model.abcd.c"]);
}

#[test]
fn node_kinds_and_display_names() {
    let lineage = ManifestLineage::from_file(&manifest_path()).unwrap();
    let input = lineage.lineage_input();

    assert_eq!(input.nodes["model.abcd.a"].kind, NodeKind::View);
    assert_eq!(input.nodes["model.abcd.c"].kind, NodeKind::Table);
    assert_eq!(input.nodes["model.abcd.d"].kind, NodeKind::Incremental);
    assert_eq!(input.nodes["seed.abcd.countries"].kind, NodeKind::Csv);
    assert_eq!(input.nodes["source.abcd.raw.events"].kind, NodeKind::Source);

    assert_eq!(input.display_name("model.abcd.a"), "abcd.a");
    assert_eq!(input.display_name("model.abcd.d"), "marts.d_final");
    assert_eq!(input.display_name("source.abcd.raw.events"), "raw_data.events");
}

#[test]
fn resolve_model_names() {
    let lineage = ManifestLineage::from_file(&manifest_path()).unwrap();

    assert_eq!(lineage.resolve_model("c"), Some("model.abcd.c".to_string()));
    assert_eq!(lineage.resolve_model("model.abcd.c"), Some("model.abcd.c".to_string()));
    assert_eq!(lineage.resolve_model("not_null_a_id"), None);
    assert_eq!(lineage.resolve_model("non_existent_model"), None);
}

#[test]
fn missing_manifest_reports_io_error() {
    let result = Manifest::from_file(&PathBuf::from("/no/such/manifest.json"));
    assert!(matches!(result, Err(ManifestError::IoError(_, _))));
}
