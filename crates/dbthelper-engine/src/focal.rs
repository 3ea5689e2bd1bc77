//! Focal subsetting: narrow the project down to one model's lineage

use crate::closure::ClosureMaps;
use dbthelper_core::{Direction, ParentMapping};
use std::collections::BTreeSet;

/// Focal nodes plus their ancestors (upstream) or descendants (downstream)
///
/// Focal nodes are always included, even when unknown to the closures.
pub fn select_node_set(
    closures: &ClosureMaps,
    focal_set: &BTreeSet<String>,
    direction: Direction,
) -> BTreeSet<String> {
    let mut node_set = BTreeSet::new();

    for focal in focal_set {
        match direction {
            Direction::Upstream => node_set.extend(closures.ancestors(focal)),
            Direction::Downstream => node_set.extend(closures.descendants(focal)),
        }
        node_set.insert(focal.clone());
    }

    node_set
}

/// Focal nodes plus both their ancestors and descendants
pub fn select_neighborhood(closures: &ClosureMaps, focal_set: &BTreeSet<String>) -> BTreeSet<String> {
    let mut node_set = select_node_set(closures, focal_set, Direction::Upstream);
    node_set.extend(select_node_set(closures, focal_set, Direction::Downstream));
    node_set
}

/// Keep only keys in `node_set`, and only their parents in `node_set`
pub fn restrict_mapping(full: &ParentMapping, node_set: &BTreeSet<String>) -> ParentMapping {
    full.iter()
        .filter(|(node, _)| node_set.contains(*node))
        .map(|(node, parents)| {
            let kept = parents
                .iter()
                .filter(|parent| node_set.contains(*parent))
                .cloned()
                .collect();
            (node.clone(), kept)
        })
        .collect()
}
