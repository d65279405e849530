//! Application configuration for datacat.
//!
//! User config lives at `~/.datacat/datacat.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DatacatError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "datacat.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".datacat";

// ---------------------------------------------------------------------------
// Config structs (matching datacat.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// `[catalog]` settings.
    #[serde(default)]
    pub catalog: CatalogSection,

    /// `[workers]` settings.
    #[serde(default)]
    pub workers: WorkersSection,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Base URL for per-dataset catalog links.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Display name of the catalog, embedded in structured metadata.
    #[serde(default = "default_catalog_name")]
    pub name: String,

    /// Category-path segment marking non-public subtrees to exclude.
    #[serde(default = "default_testing_marker")]
    pub testing_marker: String,

    /// Dataset names to skip entirely (undocumentable or deprecated).
    #[serde(default)]
    pub exclude: Vec<String>,

    /// What to do when one dataset fails to document.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            name: default_catalog_name(),
            testing_marker: default_testing_marker(),
            exclude: Vec::new(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://datasets.example.org/catalog").expect("default base URL is valid")
}
fn default_catalog_name() -> String {
    "Dataset Catalog".into()
}
fn default_testing_marker() -> String {
    "testing".into()
}

/// Policy for a dataset that fails during document generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// First failure aborts the whole catalog run; no partial catalog
    /// is emitted.
    #[default]
    Abort,
    /// Failing datasets are logged and recorded; the catalog covers
    /// the successes.
    Skip,
}

/// `[workers]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkersSection {
    /// Worker limit for the outer builder-discovery fan-out.
    #[serde(default = "default_discovery_workers")]
    pub discovery: usize,

    /// Worker limit for inner config resolution and document rendering.
    #[serde(default = "default_render_workers")]
    pub render: usize,
}

impl Default for WorkersSection {
    fn default() -> Self {
        Self {
            discovery: default_discovery_workers(),
            render: default_render_workers(),
        }
    }
}

fn default_discovery_workers() -> usize {
    200
}
fn default_render_workers() -> usize {
    50
}

// ---------------------------------------------------------------------------
// Catalog config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime catalog configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL for per-dataset catalog links.
    pub base_url: Url,
    /// Display name of the catalog.
    pub catalog_name: String,
    /// Category-path segment marking non-public subtrees.
    pub testing_marker: String,
    /// Dataset names to skip entirely.
    pub exclude: Vec<String>,
    /// What to do when one dataset fails to document.
    pub failure_policy: FailurePolicy,
    /// Worker limit for the outer discovery fan-out.
    pub discovery_workers: usize,
    /// Worker limit for config resolution and document rendering.
    pub render_workers: usize,
}

impl From<&AppConfig> for CatalogConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.catalog.base_url.clone(),
            catalog_name: config.catalog.name.clone(),
            testing_marker: config.catalog.testing_marker.clone(),
            exclude: config.catalog.exclude.clone(),
            failure_policy: config.catalog.failure_policy,
            discovery_workers: config.workers.discovery,
            render_workers: config.workers.render,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.datacat/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DatacatError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.datacat/datacat.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DatacatError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DatacatError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DatacatError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DatacatError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DatacatError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("testing_marker"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.workers.discovery, 200);
        assert_eq!(parsed.workers.render, 50);
        assert_eq!(parsed.catalog.testing_marker, "testing");
        assert_eq!(parsed.catalog.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn config_with_exclusions_and_policy() {
        let toml_str = r#"
[catalog]
base_url = "https://docs.example.com/datasets"
exclude = ["wmt_translate", "coco2014"]
failure_policy = "skip"

[workers]
discovery = 16
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.catalog.exclude.len(), 2);
        assert_eq!(config.catalog.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.workers.discovery, 16);
        // Unset fields keep their defaults.
        assert_eq!(config.workers.render, 50);
    }

    #[test]
    fn catalog_config_from_app_config() {
        let app = AppConfig::default();
        let catalog = CatalogConfig::from(&app);
        assert_eq!(catalog.discovery_workers, 200);
        assert_eq!(catalog.render_workers, 50);
        assert_eq!(catalog.catalog_name, "Dataset Catalog");
        assert!(catalog.exclude.is_empty());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let toml_str = r#"
[catalog]
base_url = "not a url"
"#;
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }
}
