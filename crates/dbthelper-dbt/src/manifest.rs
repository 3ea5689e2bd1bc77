//! dbt manifest.json parsing
//!
//! Parses dbt-generated manifest.json to extract models, sources, and dependencies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest
    #[serde(default)]
    pub metadata: ManifestMetadata,

    /// Model, test, seed and snapshot nodes
    #[serde(default)]
    pub nodes: HashMap<String, ManifestNode>,

    /// Source definitions
    #[serde(default)]
    pub sources: HashMap<String, ManifestSource>,
}

impl Manifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))?;

        let manifest = Self::from_json(&contents)?;
        debug!(
            path = %path.display(),
            nodes = manifest.nodes.len(),
            sources = manifest.sources.len(),
            "loaded manifest"
        );

        Ok(manifest)
    }

    /// Parse manifest from JSON string
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Get all model nodes (filters out tests, seeds, etc.)
    pub fn models(&self) -> HashMap<String, &ManifestNode> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_model())
            .map(|(id, node)| (id.clone(), node))
            .collect()
    }

    /// Get a specific node by unique_id
    pub fn get_node(&self, unique_id: &str) -> Option<&ManifestNode> {
        self.nodes.get(unique_id)
    }

    /// Get a specific source by unique_id
    pub fn get_source(&self, unique_id: &str) -> Option<&ManifestSource> {
        self.sources.get(unique_id)
    }

    /// Find the unique_id of the node called `name`
    ///
    /// Models take precedence over other resource types, and ties are broken
    /// by unique_id so the answer does not depend on map iteration order.
    pub fn find_unique_id(&self, name: &str) -> Option<String> {
        let mut matches: Vec<(&String, &ManifestNode)> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.name == name)
            .collect();

        matches.sort_by(|(a_id, a), (b_id, b)| {
            b.is_model().cmp(&a.is_model()).then_with(|| a_id.cmp(b_id))
        });

        matches.first().map(|(id, _)| (*id).clone())
    }
}

/// Manifest metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub dbt_schema_version: String,
    #[serde(default)]
    pub dbt_version: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub invocation_id: Option<String>,
}

/// A node in the manifest (model, test, snapshot, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Unique identifier (e.g., "model.my_project.users")
    pub unique_id: String,

    /// Node name (e.g., "users")
    pub name: String,

    /// Resource type (model, test, snapshot, etc.)
    pub resource_type: String,

    /// Package name
    #[serde(default)]
    pub package_name: String,

    /// Original file path
    #[serde(default)]
    pub original_file_path: String,

    /// Schema name
    #[serde(default)]
    pub schema: Option<String>,

    /// Alias (output table name)
    #[serde(default)]
    pub alias: Option<String>,

    /// Node configuration
    #[serde(default)]
    pub config: NodeConfig,

    /// Dependencies
    #[serde(default)]
    pub depends_on: DependsOn,

    /// Fully qualified name
    #[serde(default)]
    pub fqn: Vec<String>,
}

impl ManifestNode {
    pub fn is_model(&self) -> bool {
        self.resource_type == "model"
    }

    pub fn is_test(&self) -> bool {
        self.resource_type == "test"
    }

    /// Schema shown in lineage output
    ///
    /// Taken from the fqn: the middle part of a three-part fqn (the model's
    /// folder), otherwise the first part. Falls back to the database schema
    /// when the fqn is empty.
    pub fn display_schema(&self) -> &str {
        match self.fqn.as_slice() {
            [_, folder, _] => folder.as_str(),
            [first, ..] => first.as_str(),
            [] => self.schema.as_deref().unwrap_or(&self.package_name),
        }
    }

    /// Relation name: alias when set, else the node name
    pub fn relation_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Node configuration (from dbt_project.yml or model config)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Materialization type
    #[serde(default)]
    pub materialized: Option<String>,
}

/// Dependencies structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependsOn {
    /// List of node unique_ids this node depends on
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// A source in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSource {
    /// Unique identifier (e.g., "source.my_project.raw.users")
    pub unique_id: String,

    /// Table name (e.g., "users")
    pub name: String,

    /// Schema name
    pub schema: String,
}

/// Manifest parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse manifest JSON: {0}")]
    ParseError(String),
}
