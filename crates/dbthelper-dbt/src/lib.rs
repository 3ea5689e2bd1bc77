//! dbt artifact parsing
//!
//! This crate handles:
//! - Parsing manifest.json (dbt-generated artifacts)
//! - Turning manifest nodes and sources into a lineage input
//! - Resolving short model names to manifest unique_ids

pub mod manifest;
pub mod lineage;

pub use manifest::{Manifest, ManifestNode, ManifestSource, NodeConfig, DependsOn, ManifestMetadata, ManifestError};
pub use lineage::ManifestLineage;
