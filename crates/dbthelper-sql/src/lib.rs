//! SQL-text lineage extraction
//!
//! This crate handles:
//! - Normalizing raw SQL (lowercasing, comment stripping, whitespace collapse)
//! - Extracting referenced tables after `from` / `join` with regexes
//! - Excluding CTE names from the referenced set
//! - Scanning a models directory into a lineage source

pub mod extractor;
pub mod project;

pub use extractor::{clean_sql, extract_ctes, extract_parents, sql_parents};
pub use project::{SqlModel, SqlProject, ScanError};
