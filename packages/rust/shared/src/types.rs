//! Core domain types for datacat catalogs.

use serde::{Deserialize, Serialize};

/// Immutable description of one dataset builder, as returned by the
/// registry.
///
/// A `BuilderRef` is created by the builder lookup and never mutated;
/// its lifetime is one documentation pass. Templates receive it with
/// all fields bound as named values, which is why it is `Serialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderRef {
    /// Dataset name, unique within a run.
    pub name: String,

    /// Ordered namespace segments the builder is documented under
    /// (e.g., `["image", "classification"]`).
    pub category: Vec<String>,

    /// Free-form dataset description.
    #[serde(default)]
    pub description: String,

    /// Source/homepage URLs; the first one becomes the `sameAs` link
    /// in the structured-metadata block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,

    /// Named configuration variants. Empty when the builder has none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_keys: Vec<String>,

    /// The config key this ref was resolved against, if it is a
    /// config variant rather than the vanilla builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

impl BuilderRef {
    /// Whether this builder declares named configuration variants.
    pub fn has_configs(&self) -> bool {
        !self.config_keys.is_empty()
    }
}
