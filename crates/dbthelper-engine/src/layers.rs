//! Distance layers around a focal node and their console rendering

use crate::graph::LineageGraph;
use dbthelper_core::{Direction, LayerMap};
use tracing::{debug, warn};

/// Console width used by the CLI
pub const DEFAULT_WIDTH: usize = 80;

/// Assign nodes to distance layers by walking away from `focal`
///
/// Walks predecessors for upstream and successors for downstream, in key
/// order, depth first. There is no global visited set: a node reachable over
/// several paths is recorded once per path, at that path's distance. A node
/// that is already on the current path (a cycle in the input) is not
/// recorded or expanded again.
///
/// An empty graph yields `{0: [focal]}`.
pub fn compute_layers(graph: &LineageGraph, focal: &str, direction: Direction) -> LayerMap {
    let mut layers = LayerMap::new();

    if graph.is_empty() {
        layers.insert(0, vec![focal.to_string()]);
        return layers;
    }

    let mut stack: Vec<(&str, usize)> = vec![(focal, 0)];
    let mut path: Vec<&str> = Vec::new();

    while let Some((node, level)) = stack.pop() {
        // Entries below `level` are exactly this node's ancestors in the walk
        path.truncate(level);
        if path.contains(&node) {
            warn!(node, focal, "cycle in lineage graph, not expanding again");
            continue;
        }

        layers.entry(level).or_default().push(node.to_string());
        path.push(node);

        let next = match direction {
            Direction::Upstream => graph.predecessors(node),
            Direction::Downstream => graph.successors(node),
        };
        stack.extend(next.into_iter().rev().map(|n| (n, level + 1)));
    }

    debug!(focal, %direction, layers = layers.len(), "computed lineage layers");

    layers
}

/// One centered row per layer
///
/// Upstream layers run nearest first; downstream layers run furthest first,
/// so the focal node always sits next to the nodes it feeds into.
pub fn layer_rows<F>(layers: &LayerMap, direction: Direction, label: F, width: usize) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let ordered: Vec<&Vec<String>> = match direction {
        Direction::Upstream => layers.values().collect(),
        Direction::Downstream => layers.values().rev().collect(),
    };

    ordered
        .into_iter()
        .map(|nodes| {
            let joined = nodes
                .iter()
                .map(|node| label(node.as_str()))
                .collect::<Vec<_>>()
                .join(" | ");
            format!("{:^width$}", joined, width = width)
        })
        .collect()
}

/// Layer rows framed by horizontal rules
pub fn render_layers<F>(layers: &LayerMap, direction: Direction, label: F, width: usize) -> String
where
    F: Fn(&str) -> String,
{
    let rule = "-".repeat(width);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    for row in layer_rows(layers, direction, label, width) {
        out.push_str(&row);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
    }

    out
}
