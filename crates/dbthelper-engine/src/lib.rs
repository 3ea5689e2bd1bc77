//! dbthelper Lineage Engine
//!
//! Source-agnostic dependency graph analysis:
//! - Graph construction from a parent mapping
//! - Transitive ancestor/descendant closures (cycle tolerant)
//! - Focal subsetting of the graph around one model
//! - Distance layers and their console rendering
//! - Graphviz DOT export

pub mod graph;
pub mod closure;
pub mod focal;
pub mod layers;
pub mod dot;
pub mod lineage;

pub use graph::{build_child_mapping, LineageGraph};
pub use closure::{traverse, ClosureMaps};
pub use focal::{restrict_mapping, select_neighborhood, select_node_set};
pub use layers::{compute_layers, layer_rows, render_layers, DEFAULT_WIDTH};
pub use dot::to_dot;
pub use lineage::{Lineage, Scope};
