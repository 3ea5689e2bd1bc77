//! Lineage source backed by a directory of raw SQL models

use crate::extractor::sql_parents;
use dbthelper_core::{LineageInput, LineageSource, NodeInfo, NodeKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A single SQL model file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlModel {
    /// Model name (file stem)
    pub name: String,

    /// Path the SQL was read from
    pub path: PathBuf,

    /// Raw SQL text
    pub sql: String,
}

impl SqlModel {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(format!("{}.sql", name)),
            name,
            sql: sql.into(),
        }
    }
}

/// All SQL models found under a models directory
///
/// Parents are extracted once, when the project is built.
#[derive(Debug, Clone, Default)]
pub struct SqlProject {
    models: Vec<SqlModel>,
    input: LineageInput,
}

impl SqlProject {
    /// Build a project from already loaded models
    pub fn from_models(models: Vec<SqlModel>) -> Self {
        let input = Self::extract(&models);
        Self { models, input }
    }

    fn extract(models: &[SqlModel]) -> LineageInput {
        let mut input = LineageInput::new();

        for model in models {
            let parents = sql_parents(&model.sql);

            // Same stem in two folders: the later file wins
            if input.parents.insert(model.name.clone(), parents).is_some() {
                warn!(
                    model = %model.name,
                    path = %model.path.display(),
                    "duplicate model name, replacing earlier definition"
                );
            }
            input.nodes.insert(model.name.clone(), NodeInfo::new(NodeKind::View));
        }

        input
    }

    /// Recursively scan `models_dir` for `.sql` files
    ///
    /// Files containing only whitespace are skipped. Files that are not valid
    /// UTF-8 are skipped with a warning.
    pub fn scan(models_dir: &Path) -> Result<Self, ScanError> {
        if !models_dir.is_dir() {
            return Err(ScanError::NotADirectory(models_dir.display().to_string()));
        }

        let mut models = Vec::new();

        for entry in WalkDir::new(models_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ScanError::Walk(e.to_string()))?;
            let path = entry.path();

            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("sql")
            {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!(path = %path.display(), "skipping SQL file with non UTF-8 name");
                continue;
            };

            let sql = match std::fs::read_to_string(path) {
                Ok(sql) => sql,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    warn!(path = %path.display(), "skipping SQL file that is not valid UTF-8");
                    continue;
                }
                Err(e) => {
                    return Err(ScanError::IoError(path.display().to_string(), e.to_string()))
                }
            };

            if sql.trim().is_empty() {
                debug!(path = %path.display(), "skipping empty SQL file");
                continue;
            }

            models.push(SqlModel {
                name: name.to_string(),
                path: path.to_path_buf(),
                sql,
            });
        }

        debug!(count = models.len(), dir = %models_dir.display(), "scanned SQL models");

        Ok(Self::from_models(models))
    }

    /// Models in scan order
    pub fn models(&self) -> &[SqlModel] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl LineageSource for SqlProject {
    fn lineage_input(&self) -> LineageInput {
        self.input.clone()
    }

    fn resolve_model(&self, name: &str) -> Option<String> {
        if self.input.contains(name) {
            return Some(name.to_string());
        }

        // Referenced relations are lowercased during extraction
        let lowered = name.to_lowercase();
        self.input.contains(&lowered).then_some(lowered)
    }
}

/// Errors raised while scanning a models directory
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Models directory not found: {0}")]
    NotADirectory(String),

    #[error("Failed to walk models directory: {0}")]
    Walk(String),

    #[error("Failed to read SQL file {0}: {1}")]
    IoError(String, String),
}
