//! Template rendering seam for datacat.
//!
//! The pipeline renders through [`TemplateRenderer`];
//! [`HandlebarsRenderer`] is the bundled implementation. Its
//! `handlebars::Handlebars` registry is built once per run and owns
//! every parsed template, so parsing happens exactly once per template
//! identifier with no process-global cache.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use datacat_shared::{DatacatError, Result};

/// Template identifier for a single dataset's document body.
pub const DATASET_TEMPLATE: &str = "dataset";

/// Template identifier for the catalog-wide overview page.
pub const OVERVIEW_TEMPLATE: &str = "catalog_overview";

/// File extension recognized when loading templates from a directory.
const TEMPLATE_EXTENSION: &str = "hbs";

// ---------------------------------------------------------------------------
// TemplateRenderer
// ---------------------------------------------------------------------------

/// Renders a named template against a set of named values.
///
/// Implementations must be pure and safe for concurrent invocation.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template_id` with `values` bound as template variables.
    ///
    /// Errors with [`DatacatError::TemplateMissing`] when the
    /// identifier is unknown and [`DatacatError::Render`] when
    /// evaluation fails.
    ///
    /// [`DatacatError::TemplateMissing`]: datacat_shared::DatacatError::TemplateMissing
    /// [`DatacatError::Render`]: datacat_shared::DatacatError::Render
    fn render(&self, template_id: &str, values: &Value) -> Result<String>;
}

// ---------------------------------------------------------------------------
// HandlebarsRenderer
// ---------------------------------------------------------------------------

/// Handlebars-backed renderer with an explicit per-run template cache.
#[derive(Debug)]
pub struct HandlebarsRenderer {
    registry: handlebars::Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create an empty renderer; templates are registered explicitly.
    pub fn new() -> Self {
        let mut registry = handlebars::Handlebars::new();
        // Documentation values are markup already; no HTML escaping.
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Register one template source under an identifier.
    pub fn register_template(&mut self, template_id: &str, source: &str) -> Result<()> {
        self.registry
            .register_template_string(template_id, source)
            .map_err(|e| {
                DatacatError::config(format!("template '{template_id}' failed to parse: {e}"))
            })
    }

    /// Load every `*.hbs` file in a directory; the file stem becomes
    /// the template identifier.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new();

        let entries = std::fs::read_dir(dir).map_err(|e| DatacatError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| DatacatError::io(dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(template_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source =
                std::fs::read_to_string(&path).map_err(|e| DatacatError::io(&path, e))?;
            renderer.register_template(template_id, &source)?;
            debug!(template = %template_id, path = %path.display(), "registered template");
        }

        Ok(renderer)
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template_id: &str, values: &Value) -> Result<String> {
        if !self.registry.has_template(template_id) {
            return Err(DatacatError::TemplateMissing {
                template: template_id.to_string(),
            });
        }

        self.registry
            .render(template_id, values)
            .map_err(|e| DatacatError::render(template_id, e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_registered_template() {
        let mut renderer = HandlebarsRenderer::new();
        renderer
            .register_template("dataset", "# {{builder.name}}\n\n{{builder.description}}")
            .unwrap();

        let out = renderer
            .render(
                "dataset",
                &json!({"builder": {"name": "mnist", "description": "Digits."}}),
            )
            .unwrap();
        assert_eq!(out, "# mnist\n\nDigits.");
    }

    #[test]
    fn values_are_not_html_escaped() {
        let mut renderer = HandlebarsRenderer::new();
        renderer.register_template("t", "{{text}}").unwrap();

        let out = renderer.render("t", &json!({"text": "a & b <c>"})).unwrap();
        assert_eq!(out, "a & b <c>");
    }

    #[test]
    fn unknown_template_is_template_missing() {
        let renderer = HandlebarsRenderer::new();
        let err = renderer.render("nope", &json!({})).unwrap_err();
        assert!(matches!(
            err,
            DatacatError::TemplateMissing { template } if template == "nope"
        ));
    }

    #[test]
    fn invalid_template_source_is_rejected() {
        let mut renderer = HandlebarsRenderer::new();
        let err = renderer
            .register_template("broken", "{{#if x}}unclosed")
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn from_dir_loads_hbs_files() {
        let dir = std::env::temp_dir().join(format!("datacat-render-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("dataset.hbs"), "name={{name}}").unwrap();
        std::fs::write(dir.join("catalog_overview.hbs"), "overview").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let renderer = HandlebarsRenderer::from_dir(&dir).unwrap();
        assert_eq!(
            renderer.render("dataset", &json!({"name": "x"})).unwrap(),
            "name=x"
        );
        assert_eq!(renderer.render("catalog_overview", &json!({})).unwrap(), "overview");
        assert!(renderer.render("notes", &json!({})).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_dir_missing_directory_is_io_error() {
        let err = HandlebarsRenderer::from_dir(Path::new("/nonexistent/datacat-templates"))
            .unwrap_err();
        assert!(matches!(err, DatacatError::Io { .. }));
    }
}
