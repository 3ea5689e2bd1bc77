//! Lineage graph construction
//!
//! Edges point from parent to child, so predecessors are upstream and
//! successors are downstream.

use dbthelper_core::{ChildMapping, NodeInfo, NodeKind, ParentMapping};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Reverse a parent mapping into a child mapping
///
/// Nodes without children do not appear as keys.
pub fn build_child_mapping(parents: &ParentMapping) -> ChildMapping {
    let mut children = ChildMapping::new();

    for (node, node_parents) in parents {
        for parent in node_parents {
            children
                .entry(parent.clone())
                .or_default()
                .insert(node.clone());
        }
    }

    children
}

/// A node in the lineage graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Node key (unique_id or model name)
    pub key: String,

    /// Presentation kind
    pub kind: NodeKind,

    /// Label used when rendering
    pub display_name: String,
}

/// Directed dependency graph over a subset of nodes
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    graph: DiGraph<GraphNode, ()>,

    /// Map from node key to node index
    node_map: HashMap<String, NodeIndex>,
}

impl LineageGraph {
    /// Build the graph induced by `node_set`
    ///
    /// Every member of `node_set` becomes a node. An edge parent -> node is
    /// added for each of the node's parents that is itself in `node_set`;
    /// parents outside the set are dropped rather than pulled in.
    pub fn build(
        parents: &ParentMapping,
        node_set: &BTreeSet<String>,
        nodes: &BTreeMap<String, NodeInfo>,
    ) -> Self {
        let mut lineage = Self::default();

        for key in node_set {
            let info = nodes.get(key);
            lineage.add_node(GraphNode {
                key: key.clone(),
                kind: info.map(|i| i.kind).unwrap_or_default(),
                display_name: info
                    .and_then(|i| i.display_name.clone())
                    .unwrap_or_else(|| key.clone()),
            });
        }

        for key in node_set {
            let Some(node_parents) = parents.get(key) else {
                continue;
            };
            let child_idx = lineage.node_map[key];

            for parent in node_parents {
                if let Some(&parent_idx) = lineage.node_map.get(parent) {
                    lineage.graph.add_edge(parent_idx, child_idx, ());
                }
            }
        }

        lineage
    }

    fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node.key) {
            return idx;
        }
        let key = node.key.clone();
        let idx = self.graph.add_node(node);
        self.node_map.insert(key, idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.node_map.contains_key(key)
    }

    pub fn node(&self, key: &str) -> Option<&GraphNode> {
        self.node_map.get(key).map(|&idx| &self.graph[idx])
    }

    pub fn kind(&self, key: &str) -> Option<NodeKind> {
        self.node(key).map(|node| node.kind)
    }

    /// Display name for a key, falling back to the key itself
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.node(key)
            .map(|node| node.display_name.as_str())
            .unwrap_or(key)
    }

    /// Direct parents inside the graph, sorted by key
    pub fn predecessors(&self, key: &str) -> Vec<&str> {
        self.neighbors(key, petgraph::Direction::Incoming)
    }

    /// Direct children inside the graph, sorted by key
    pub fn successors(&self, key: &str) -> Vec<&str> {
        self.neighbors(key, petgraph::Direction::Outgoing)
    }

    fn neighbors(&self, key: &str, direction: petgraph::Direction) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(key) else {
            return Vec::new();
        };

        let mut keys: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// All nodes, sorted by key
    pub fn nodes(&self) -> Vec<&GraphNode> {
        let mut nodes: Vec<&GraphNode> = self.graph.node_weights().collect();
        nodes.sort_by(|a, b| a.key.cmp(&b.key));
        nodes
    }

    /// All (parent, child) edges, sorted
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].key.as_str(),
                    self.graph[e.target()].key.as_str(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(entries: &[(&str, &[&str])]) -> ParentMapping {
        entries
            .iter()
            .map(|(node, parents)| {
                (
                    node.to_string(),
                    parents.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn child_mapping_reverses_parents() {
        let parents = mapping(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])]);
        let children = build_child_mapping(&parents);

        assert_eq!(children["a"], keys(&["b", "c"]));
        assert_eq!(children["b"], keys(&["c"]));
        assert!(!children.contains_key("c"));
    }

    #[test]
    fn child_mapping_is_reciprocal() {
        let parents = mapping(&[("b", &["a"]), ("c", &["a", "b"]), ("d", &["c", "x"])]);
        let children = build_child_mapping(&parents);

        for (child, node_parents) in &parents {
            for parent in node_parents {
                assert!(children[parent].contains(child));
            }
        }
        for (parent, node_children) in &children {
            for child in node_children {
                assert!(parents[child].contains(parent));
            }
        }
    }

    #[test]
    fn build_drops_edges_leaving_node_set() {
        let parents = mapping(&[("b", &["a"]), ("c", &["b", "x"])]);
        let graph = LineageGraph::build(&parents, &keys(&["b", "c"]), &BTreeMap::new());

        assert_eq!(graph.node_count(), 2);
        assert!(!graph.contains("a"));
        assert!(!graph.contains("x"));
        assert_eq!(graph.edges(), vec![("b", "c")]);
    }

    #[test]
    fn build_attaches_kind_and_display_name() {
        let parents = mapping(&[("model.p.b", &["model.p.a"])]);
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "model.p.a".to_string(),
            NodeInfo::new(NodeKind::Csv).with_display_name("seeds.a"),
        );

        let graph = LineageGraph::build(&parents, &keys(&["model.p.a", "model.p.b"]), &nodes);

        assert_eq!(graph.kind("model.p.a"), Some(NodeKind::Csv));
        assert_eq!(graph.display_name("model.p.a"), "seeds.a");
        assert_eq!(graph.kind("model.p.b"), Some(NodeKind::Undetermined));
        assert_eq!(graph.display_name("model.p.b"), "model.p.b");
    }

    #[test]
    fn neighbors_are_sorted() {
        let parents = mapping(&[("d", &["c", "a", "b"]), ("e", &["a"])]);
        let graph = LineageGraph::build(&parents, &keys(&["a", "b", "c", "d", "e"]), &BTreeMap::new());

        assert_eq!(graph.predecessors("d"), vec!["a", "b", "c"]);
        assert_eq!(graph.successors("a"), vec!["d", "e"]);
        assert!(graph.predecessors("missing").is_empty());
    }
}
