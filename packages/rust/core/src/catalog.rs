//! Top-level catalog orchestration and output ordering.
//!
//! Discovery, tree construction, and per-section rendering. All
//! consumer-visible ordering is re-imposed here by explicit sorts, so
//! an unchanged registry snapshot and unchanged templates always
//! produce byte-identical output no matter how the concurrent phases
//! interleave.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument, warn};

use datacat_registry::BuilderLookup;
use datacat_render::{OVERVIEW_TEMPLATE, TemplateRenderer};
use datacat_shared::{BuilderRef, CatalogConfig, FailurePolicy, Result};

use crate::document::DocumentAssembler;
use crate::mapper::map_bounded;
use crate::tree::{build_tree, section_label};

/// One dataset's rendered documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Dataset name.
    pub name: String,
    /// Full document text: metadata block plus rendered body.
    pub text: String,
}

/// Final catalog artifact. Immutable once produced.
#[derive(Debug, Clone)]
pub struct CatalogResult {
    /// The catalog-wide overview page.
    pub overview: String,
    /// Section label → documents, sorted by dataset name.
    pub sections: BTreeMap<String, Vec<RenderedDocument>>,
    /// Datasets dropped under [`FailurePolicy::Skip`], with the error
    /// that dropped each. Always empty under `Abort`.
    pub skipped: Vec<(String, String)>,
}

/// Outcome of documenting one builder under the active failure policy.
enum DocOutcome {
    Rendered(RenderedDocument),
    Skipped { name: String, error: String },
}

/// Top-level orchestrator for one documentation pass.
pub struct CatalogAssembler {
    lookup: Arc<dyn BuilderLookup>,
    renderer: Arc<dyn TemplateRenderer>,
    config: Arc<CatalogConfig>,
}

impl CatalogAssembler {
    pub fn new(
        lookup: Arc<dyn BuilderLookup>,
        renderer: Arc<dyn TemplateRenderer>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            lookup,
            renderer,
            config: Arc::new(config),
        }
    }

    /// Run the full pipeline: discover builders, build the category
    /// tree, render every section, render the overview.
    #[instrument(skip_all)]
    pub async fn generate(&self) -> Result<CatalogResult> {
        info!("retrieving the list of builders");
        let excluded: HashSet<&str> = self.config.exclude.iter().map(String::as_str).collect();
        let names: Vec<String> = self
            .lookup
            .list_names()?
            .into_iter()
            .filter(|name| !excluded.contains(name.as_str()))
            .collect();

        info!(count = names.len(), "resolving vanilla builders");
        let builders = {
            let lookup = self.lookup.clone();
            map_bounded(names, self.config.discovery_workers, move |name: String| {
                let lookup = lookup.clone();
                async move { lookup.resolve(&name, None) }
            })
            .await?
        };

        let tree = build_tree(builders, &self.config.testing_marker)?;

        let assembler = DocumentAssembler::new(
            self.lookup.clone(),
            self.renderer.clone(),
            self.config.clone(),
        );

        let mut sections = BTreeMap::new();
        let mut skipped = Vec::new();

        // BTreeMap iteration gives the lexicographic section order.
        for (segment, node) in &tree {
            let mut builders = node.flatten();
            builders.sort_by(|a, b| a.name.cmp(&b.name));

            info!(section = %segment, builders = builders.len(), "rendering section");
            let outcomes = self.render_section(&assembler, builders).await?;

            let mut docs = Vec::with_capacity(outcomes.len());
            for outcome in outcomes {
                match outcome {
                    DocOutcome::Rendered(doc) => docs.push(doc),
                    DocOutcome::Skipped { name, error } => skipped.push((name, error)),
                }
            }
            sections.insert(section_label(segment), docs);
        }

        let overview = self
            .renderer
            .render(OVERVIEW_TEMPLATE, &json!({}))?
            .trim_start()
            .to_string();

        info!(
            sections = sections.len(),
            skipped = skipped.len(),
            "catalog generation complete"
        );

        Ok(CatalogResult {
            overview,
            sections,
            skipped,
        })
    }

    /// Render one section's builders, already name-sorted, through the
    /// bounded mapper. Under `Abort` any failure ends the run; under
    /// `Skip` the failing dataset is recorded and the batch continues.
    async fn render_section(
        &self,
        assembler: &DocumentAssembler,
        builders: Vec<BuilderRef>,
    ) -> Result<Vec<DocOutcome>> {
        let policy = self.config.failure_policy;
        let assembler = assembler.clone();

        map_bounded(
            builders,
            self.config.render_workers,
            move |builder: BuilderRef| {
                let assembler = assembler.clone();
                async move {
                    let name = builder.name.clone();
                    match assembler.assemble(builder).await {
                        Ok(text) => Ok(DocOutcome::Rendered(RenderedDocument { name, text })),
                        Err(e) if policy == FailurePolicy::Skip => {
                            warn!(name = %name, error = %e, "skipping dataset after failure");
                            Ok(DocOutcome::Skipped {
                                name,
                                error: e.to_string(),
                            })
                        }
                        Err(e) => Err(e),
                    }
                }
            },
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
