//! End-to-end lineage queries over a single lineage input

use crate::closure::ClosureMaps;
use crate::focal::{restrict_mapping, select_neighborhood, select_node_set};
use crate::graph::LineageGraph;
use crate::layers::{compute_layers, render_layers};
use dbthelper_core::{Direction, LayerMap, LineageInput, LineageSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Which part of a focal node's lineage to include in a subgraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Ancestors only
    Upstream,

    /// Descendants only
    Downstream,

    /// Ancestors and descendants
    Both,
}

impl From<Direction> for Scope {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Upstream => Self::Upstream,
            Direction::Downstream => Self::Downstream,
        }
    }
}

/// A project's lineage with closures precomputed
#[derive(Debug, Clone)]
pub struct Lineage {
    input: LineageInput,
    closures: ClosureMaps,
}

impl Lineage {
    pub fn new(input: LineageInput) -> Self {
        let closures = ClosureMaps::compute(&input.parents);
        Self { input, closures }
    }

    pub fn from_source<S: LineageSource + ?Sized>(source: &S) -> Self {
        Self::new(source.lineage_input())
    }

    pub fn closures(&self) -> &ClosureMaps {
        &self.closures
    }

    pub fn contains(&self, key: &str) -> bool {
        self.input.contains(key)
    }

    /// Display name for a key, falling back to the key itself
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.input.display_name(key)
    }

    /// Graph restricted to `focal` and the requested side of its lineage
    ///
    /// Without a focal node the whole project is included.
    pub fn subgraph(&self, focal: Option<&str>, scope: Scope) -> LineageGraph {
        let node_set: BTreeSet<String> = match focal {
            None => self
                .input
                .parents
                .iter()
                .flat_map(|(node, parents)| std::iter::once(node).chain(parents))
                .cloned()
                .collect(),
            Some(focal) => {
                let focal_set = BTreeSet::from([focal.to_string()]);
                match scope {
                    Scope::Upstream => {
                        select_node_set(&self.closures, &focal_set, Direction::Upstream)
                    }
                    Scope::Downstream => {
                        select_node_set(&self.closures, &focal_set, Direction::Downstream)
                    }
                    Scope::Both => select_neighborhood(&self.closures, &focal_set),
                }
            }
        };

        let restricted = restrict_mapping(&self.input.parents, &node_set);
        LineageGraph::build(&restricted, &node_set, &self.input.nodes)
    }

    /// Distance layers around `focal`
    ///
    /// Returns an empty map when `focal` is not part of this lineage.
    pub fn layers(&self, focal: &str, direction: Direction) -> LayerMap {
        if !self.contains(focal) {
            debug!(focal, "focal node not found in lineage input");
            return LayerMap::new();
        }

        let graph = self.subgraph(Some(focal), direction.into());
        compute_layers(&graph, focal, direction)
    }

    /// Layers with node keys replaced by display names
    pub fn labeled_layers(&self, layers: &LayerMap) -> LayerMap {
        layers
            .iter()
            .map(|(level, nodes)| {
                let names = nodes
                    .iter()
                    .map(|node| self.display_name(node).to_string())
                    .collect();
                (*level, names)
            })
            .collect()
    }

    /// Console rendering of `layers` using display names
    pub fn render(&self, layers: &LayerMap, direction: Direction, width: usize) -> String {
        render_layers(layers, direction, |node| self.display_name(node).to_string(), width)
    }
}
