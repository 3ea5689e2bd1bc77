//! Configuration schema (dbthelper.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the parent mapping comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceConfig {
    /// dbt-generated manifest.json
    Manifest,

    /// Regex scan of raw .sql files under the models directory
    Sql,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Manifest
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("target/manifest.json")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_render_width() -> usize {
    80
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Lineage source
    #[serde(default)]
    pub source: SourceConfig,

    /// Path to manifest.json, relative to the project root
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// Directory scanned for .sql models, relative to the project root
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Console width used to center layer rows
    #[serde(default = "default_render_width")]
    pub render_width: usize,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            manifest_path: default_manifest_path(),
            models_dir: default_models_dir(),
            render_width: default_render_width(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.project_root = std::env::current_dir().unwrap_or_default();

        if config.render_width == 0 {
            return Err(ConfigError::InvalidValue(
                "render_width must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Manifest path resolved against the project root
    pub fn resolved_manifest_path(&self) -> PathBuf {
        self.resolve(&self.manifest_path)
    }

    /// Models directory resolved against the project root
    pub fn resolved_models_dir(&self) -> PathBuf {
        self.resolve(&self.models_dir)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.source, SourceConfig::Manifest);
        assert_eq!(config.manifest_path, PathBuf::from("target/manifest.json"));
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert_eq!(config.render_width, 80);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.source, SourceConfig::Manifest);
        assert_eq!(config.render_width, 80);
    }

    #[test]
    fn parse_sql_source() {
        let config = Config::from_toml(
            r#"
            source = "sql"
            models_dir = "warehouse/models"
            render_width = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.source, SourceConfig::Sql);
        assert_eq!(config.models_dir, PathBuf::from("warehouse/models"));
        assert_eq!(config.render_width, 120);
    }

    #[test]
    fn reject_zero_width() {
        let result = Config::from_toml("render_width = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn reject_unknown_source() {
        let result = Config::from_toml("source = \"warehouse\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbthelper.toml");
        std::fs::write(&path, "manifest_path = \"build/manifest.json\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.project_root, dir.path().to_path_buf());
        assert_eq!(
            config.resolved_manifest_path(),
            dir.path().join("build/manifest.json")
        );
        assert_eq!(config.resolved_models_dir(), dir.path().join("models"));
    }
}
