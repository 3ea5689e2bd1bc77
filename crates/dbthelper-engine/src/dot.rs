//! Graphviz DOT export of a lineage graph

use crate::graph::LineageGraph;
use dbthelper_core::NodeKind;

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn kind_color(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::View => Some("green"),
        NodeKind::Chart => Some("blue"),
        NodeKind::Csv => Some("red"),
        NodeKind::Source => Some("gray"),
        _ => None,
    }
}

/// Render the graph as a `digraph`, edges pointing parent -> child
///
/// Nodes are identified by key and labelled with their display name. Output
/// is sorted so the same graph always renders identically.
pub fn to_dot(graph: &LineageGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph lineage {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, fontname=\"Helvetica\"];\n\n");

    for node in graph.nodes() {
        let mut attrs = vec![format!("label=\"{}\"", dot_escape(&node.display_name))];
        if let Some(color) = kind_color(node.kind) {
            attrs.push(format!("color={}", color));
        }
        out.push_str(&format!(
            "  \"{}\" [{}];\n",
            dot_escape(&node.key),
            attrs.join(", ")
        ));
    }

    if graph.edge_count() > 0 {
        out.push('\n');
    }

    for (parent, child) in graph.edges() {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            dot_escape(parent),
            dot_escape(child)
        ));
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbthelper_core::{NodeInfo, ParentMapping};
    use pretty_assertions::assert_eq;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn renders_nodes_and_edges() {
        let mut parents = ParentMapping::new();
        parents.insert("b".to_string(), ["a".to_string()].into_iter().collect());
        parents.insert("a".to_string(), BTreeSet::new());

        let mut nodes = BTreeMap::new();
        nodes.insert("a".to_string(), NodeInfo::new(NodeKind::Csv).with_display_name("seeds.a"));
        nodes.insert("b".to_string(), NodeInfo::new(NodeKind::Table));

        let node_set: BTreeSet<String> = ["a".to_string(), "b".to_string()].into_iter().collect();
        let graph = LineageGraph::build(&parents, &node_set, &nodes);

        let expected = "digraph lineage {\n  rankdir=LR;\n  node [shape=box, fontname=\"Helvetica\"];\n\n  \"a\" [label=\"seeds.a\", color=red];\n  \"b\" [label=\"b\"];\n\n  \"a\" -> \"b\";\n}\n";
        assert_eq!(to_dot(&graph), expected);
    }

    #[test]
    fn escapes_quotes() {
        assert_eq!(dot_escape(r#"my"model"#), r#"my\"model"#);
    }
}
