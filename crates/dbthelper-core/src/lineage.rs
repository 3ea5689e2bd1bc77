//! Lineage domain types shared by every source and the graph engine

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Node key -> direct parents (dependencies only, never transitive)
pub type ParentMapping = BTreeMap<String, BTreeSet<String>>;

/// Node key -> direct children. Nodes without children are absent.
pub type ChildMapping = BTreeMap<String, BTreeSet<String>>;

/// Distance from the focal node -> node keys at that distance, in walk order
pub type LayerMap = BTreeMap<usize, Vec<String>>;

/// Presentation kind of a lineage node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Materialized as a view
    View,

    /// Materialized as a table
    Table,

    /// Incrementally materialized table
    Incremental,

    /// Inlined into downstream models as a CTE
    Ephemeral,

    /// dbt snapshot
    Snapshot,

    /// Dashboard or chart consuming a model
    Chart,

    /// Seed loaded from a CSV file
    Csv,

    /// Declared source table
    Source,

    /// Kind could not be determined
    Undetermined,
}

impl NodeKind {
    /// Map a dbt `config.materialized` value onto a kind
    pub fn from_materialization(materialized: &str) -> Self {
        match materialized.to_lowercase().as_str() {
            "view" => Self::View,
            "table" => Self::Table,
            "incremental" => Self::Incremental,
            "ephemeral" => Self::Ephemeral,
            "snapshot" => Self::Snapshot,
            "seed" => Self::Csv,
            _ => Self::Undetermined,
        }
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Table => "table",
            Self::Incremental => "incremental",
            Self::Ephemeral => "ephemeral",
            Self::Snapshot => "snapshot",
            Self::Chart => "chart",
            Self::Csv => "csv",
            Self::Source => "source",
            Self::Undetermined => "undetermined",
        }
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Undetermined
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-node metadata attached by a lineage source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Presentation kind
    #[serde(default)]
    pub kind: NodeKind,

    /// Human-readable alias, e.g. "schema.table"
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NodeInfo {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Which side of the focal node to inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ancestors: everything the focal node depends on
    Upstream,

    /// Descendants: everything depending on the focal node
    Downstream,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Downstream => "downstream",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
