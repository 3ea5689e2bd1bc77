//! Transitive ancestor / descendant closures

use crate::graph::build_child_mapping;
use dbthelper_core::{ChildMapping, ParentMapping};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Every node reachable from `start` by repeatedly following `tree`
///
/// `tree` is either a parent mapping (ancestors) or a child mapping
/// (descendants). The visited set is fresh for each call, so cyclic input
/// terminates: a node is expanded at most once, though it may still show up
/// in its own result when a cycle leads back to it.
pub fn traverse(start: &str, tree: &BTreeMap<String, BTreeSet<String>>) -> BTreeSet<String> {
    let mut visited = HashSet::new();
    traverse_from(start, tree, &mut visited)
}

fn traverse_from<'a>(
    node: &str,
    tree: &'a BTreeMap<String, BTreeSet<String>>,
    visited: &mut HashSet<&'a str>,
) -> BTreeSet<String> {
    let Some(direct) = tree.get(node) else {
        return BTreeSet::new();
    };

    let mut reachable = direct.clone();
    for next in direct {
        if visited.insert(next.as_str()) {
            reachable.extend(traverse_from(next, tree, visited));
        }
    }

    reachable
}

/// Full ancestor and descendant closures for every node
#[derive(Debug, Clone, Default)]
pub struct ClosureMaps {
    ancestors: BTreeMap<String, BTreeSet<String>>,
    descendants: BTreeMap<String, BTreeSet<String>>,
}

impl ClosureMaps {
    /// Compute both closures from a parent mapping
    ///
    /// Ancestors are keyed by every parent-mapping key, descendants by every
    /// child-mapping key. Worst case is quadratic in the number of nodes.
    pub fn compute(parents: &ParentMapping) -> Self {
        let children: ChildMapping = build_child_mapping(parents);

        let ancestors = parents
            .keys()
            .map(|node| (node.clone(), traverse(node, parents)))
            .collect();

        let descendants = children
            .keys()
            .map(|node| (node.clone(), traverse(node, &children)))
            .collect();

        debug!(
            nodes = parents.len(),
            with_children = children.len(),
            "computed lineage closures"
        );

        Self {
            ancestors,
            descendants,
        }
    }

    /// All ancestors of `node` (empty when unknown)
    pub fn ancestors(&self, node: &str) -> BTreeSet<String> {
        self.ancestors.get(node).cloned().unwrap_or_default()
    }

    /// All descendants of `node` (empty when unknown)
    pub fn descendants(&self, node: &str) -> BTreeSet<String> {
        self.descendants.get(node).cloned().unwrap_or_default()
    }
}
