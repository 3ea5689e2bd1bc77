//! Lineage source backed by a dbt manifest

use crate::manifest::{Manifest, ManifestError, ManifestNode};
use dbthelper_core::{LineageInput, LineageSource, NodeInfo, NodeKind};
use std::path::Path;
use tracing::debug;

/// Exposes a parsed manifest as a lineage source
///
/// Test nodes are left out entirely: they hang off every model they check
/// and would swamp downstream views.
#[derive(Debug, Clone)]
pub struct ManifestLineage {
    manifest: Manifest,
}

impl ManifestLineage {
    pub fn new(manifest: Manifest) -> Self {
        Self { manifest }
    }

    /// Load and wrap manifest.json
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        Ok(Self::new(Manifest::from_file(path)?))
    }

    fn node_info(node: &ManifestNode) -> NodeInfo {
        let kind = match node.resource_type.as_str() {
            "seed" => NodeKind::Csv,
            "snapshot" => NodeKind::Snapshot,
            _ => node
                .config
                .materialized
                .as_deref()
                .map(NodeKind::from_materialization)
                .unwrap_or_default(),
        };

        NodeInfo::new(kind)
            .with_display_name(format!("{}.{}", node.display_schema(), node.relation_name()))
    }
}

impl LineageSource for ManifestLineage {
    fn lineage_input(&self) -> LineageInput {
        let mut input = LineageInput::new();

        for (unique_id, node) in &self.manifest.nodes {
            if node.is_test() {
                continue;
            }
            input.insert(
                unique_id.clone(),
                Self::node_info(node),
                node.depends_on.nodes.iter().cloned(),
            );
        }

        for (unique_id, source) in &self.manifest.sources {
            input.insert(
                unique_id.clone(),
                NodeInfo::new(NodeKind::Source)
                    .with_display_name(format!("{}.{}", source.schema, source.name)),
                Vec::<String>::new(),
            );
        }

        debug!(nodes = input.nodes.len(), "built lineage input from manifest");

        input
    }

    fn resolve_model(&self, name: &str) -> Option<String> {
        if self.manifest.get_node(name).is_some_and(|node| !node.is_test())
            || self.manifest.get_source(name).is_some()
        {
            return Some(name.to_string());
        }

        self.manifest
            .find_unique_id(name)
            .filter(|unique_id| self.manifest.get_node(unique_id).is_some_and(|n| !n.is_test()))
    }
}
