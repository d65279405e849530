//! JSON snapshot registry.
//!
//! Loads a registry snapshot of dataset descriptors from a JSON file
//! and serves lookups from memory. The snapshot is parsed once and
//! never mutated, matching the read-only-registry assumption of the
//! catalog pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use datacat_shared::{BuilderRef, DatacatError, Result};

use crate::BuilderLookup;

// ---------------------------------------------------------------------------
// Snapshot file schema
// ---------------------------------------------------------------------------

/// Root of a `registry.json` snapshot.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    datasets: Vec<DatasetEntry>,
}

/// One dataset descriptor in the snapshot.
#[derive(Debug, Clone, Deserialize)]
struct DatasetEntry {
    name: String,
    #[serde(default)]
    category: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    urls: Vec<String>,
    /// Named configs; keys become the builder's config-key list.
    /// `BTreeMap` keeps key order stable across runs.
    #[serde(default)]
    configs: BTreeMap<String, ConfigEntry>,
}

/// Per-config overrides. Fields not set fall back to the dataset's.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigEntry {
    #[serde(default)]
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// SnapshotRegistry
// ---------------------------------------------------------------------------

/// An immutable, in-memory dataset registry loaded from a JSON snapshot.
#[derive(Debug)]
pub struct SnapshotRegistry {
    datasets: BTreeMap<String, DatasetEntry>,
}

impl SnapshotRegistry {
    /// Load a snapshot from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DatacatError::io(path, e))?;
        let registry = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            datasets = registry.datasets.len(),
            "registry snapshot loaded"
        );
        Ok(registry)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(content)
            .map_err(|e| DatacatError::config(format!("invalid registry snapshot: {e}")))?;

        let mut datasets = BTreeMap::new();
        for entry in file.datasets {
            if datasets.insert(entry.name.clone(), entry.clone()).is_some() {
                return Err(DatacatError::config(format!(
                    "duplicate dataset name in registry snapshot: '{}'",
                    entry.name
                )));
            }
        }

        Ok(Self { datasets })
    }

    /// Number of datasets in the snapshot.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl BuilderLookup for SnapshotRegistry {
    fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.datasets.keys().cloned().collect())
    }

    fn resolve(&self, name: &str, config: Option<&str>) -> Result<BuilderRef> {
        let entry = self
            .datasets
            .get(name)
            .ok_or_else(|| DatacatError::not_found(name))?;

        let (description, bound) = match config {
            None => (entry.description.clone(), None),
            Some(key) => {
                let config_entry = entry.configs.get(key).ok_or_else(|| {
                    DatacatError::instantiation(name, format!("unknown config '{key}'"))
                })?;
                let description = config_entry
                    .description
                    .clone()
                    .unwrap_or_else(|| entry.description.clone());
                (description, Some(key.to_string()))
            }
        };

        Ok(BuilderRef {
            name: entry.name.clone(),
            category: entry.category.clone(),
            description,
            urls: entry.urls.clone(),
            config_keys: entry.configs.keys().cloned().collect(),
            config: bound,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
