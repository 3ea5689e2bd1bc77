//! Lineage source abstraction
//!
//! The graph engine only ever sees a [`LineageInput`]. Whether it was built
//! from a dbt manifest or from scanning raw SQL files is the source's concern.

use crate::lineage::{NodeInfo, ParentMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provenance-independent input to the lineage engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageInput {
    /// Node -> direct parents
    pub parents: ParentMapping,

    /// Optional per-node kind and display name
    pub nodes: BTreeMap<String, NodeInfo>,
}

impl LineageInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with its direct parents and metadata
    pub fn insert<I, S>(&mut self, key: impl Into<String>, info: NodeInfo, parents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = key.into();
        self.parents
            .entry(key.clone())
            .or_default()
            .extend(parents.into_iter().map(Into::into));
        self.nodes.insert(key, info);
    }

    /// Whether the key is known, either as a node or as somebody's parent
    pub fn contains(&self, key: &str) -> bool {
        self.parents.contains_key(key)
            || self.nodes.contains_key(key)
            || self.parents.values().any(|parents| parents.contains(key))
    }

    /// Display name for a key, falling back to the key itself
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.nodes
            .get(key)
            .and_then(|info| info.display_name.as_deref())
            .unwrap_or(key)
    }
}

/// Something that can produce a parent mapping plus node metadata
pub trait LineageSource {
    /// Build the lineage input for the whole project
    fn lineage_input(&self) -> LineageInput;

    /// Resolve a user-supplied model name to a node key
    ///
    /// Returns `None` when nothing in the project matches.
    fn resolve_model(&self, name: &str) -> Option<String>;
}
