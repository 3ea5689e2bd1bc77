//! dbthelper Core
//!
//! Shared domain model for lineage inspection: node metadata, traversal
//! direction, the parent mapping every lineage source produces, and the
//! `dbthelper.toml` configuration.

pub mod lineage;
pub mod source;
pub mod config;

pub use lineage::{NodeKind, NodeInfo, Direction, ParentMapping, ChildMapping, LayerMap};
pub use source::{LineageInput, LineageSource};
pub use config::{Config, ConfigError, SourceConfig};
