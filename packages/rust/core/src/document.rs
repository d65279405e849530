//! Per-dataset document assembly.
//!
//! Resolves a builder's config variants (bounded by the inner worker
//! limit), renders the document body, and prepends the
//! structured-metadata block.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use datacat_registry::BuilderLookup;
use datacat_render::{DATASET_TEMPLATE, TemplateRenderer};
use datacat_shared::{BuilderRef, CatalogConfig, Result};

use crate::mapper::map_bounded;
use crate::microdata;

/// A builder resolved against one specific named configuration.
/// Ephemeral — exists only while its parent's document renders.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigVariant {
    /// The bound config key.
    pub key: String,
    /// Variant-specific builder metadata.
    pub builder: BuilderRef,
}

/// Assembles the final document text for one builder.
///
/// Cheap to clone; concurrent workers each hold their own handle to
/// the shared collaborators.
#[derive(Clone)]
pub struct DocumentAssembler {
    lookup: Arc<dyn BuilderLookup>,
    renderer: Arc<dyn TemplateRenderer>,
    config: Arc<CatalogConfig>,
}

impl DocumentAssembler {
    pub fn new(
        lookup: Arc<dyn BuilderLookup>,
        renderer: Arc<dyn TemplateRenderer>,
        config: Arc<CatalogConfig>,
    ) -> Self {
        Self {
            lookup,
            renderer,
            config,
        }
    }

    /// Produce the document for `builder`: metadata block, newline,
    /// then the trimmed rendered body.
    ///
    /// Config resolution runs through the bounded mapper with the
    /// inner worker limit, so a batch of builders that each declare
    /// many variants cannot exceed the outer phase's resource budget.
    /// Builders without configs never trigger resolution.
    pub async fn assemble(&self, builder: BuilderRef) -> Result<String> {
        debug!(name = %builder.name, configs = builder.config_keys.len(), "documenting builder");

        let variants = if builder.has_configs() {
            self.resolve_variants(&builder).await?
        } else {
            Vec::new()
        };

        let values = json!({
            "builder": &builder,
            "config_variants": &variants,
        });
        let body = self.renderer.render(DATASET_TEMPLATE, &values)?;

        let header =
            microdata::dataset_block(&builder, &self.config.base_url, &self.config.catalog_name);

        Ok(format!("{header}\n{}", body.trim()))
    }

    async fn resolve_variants(&self, builder: &BuilderRef) -> Result<Vec<ConfigVariant>> {
        let lookup = self.lookup.clone();
        let name = builder.name.clone();

        map_bounded(
            builder.config_keys.clone(),
            self.config.render_workers,
            move |key: String| {
                let lookup = lookup.clone();
                let name = name.clone();
                async move {
                    let resolved = lookup.resolve(&name, Some(&key))?;
                    Ok(ConfigVariant {
                        key,
                        builder: resolved,
                    })
                }
            },
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
