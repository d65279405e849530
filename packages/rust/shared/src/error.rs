//! Error types for datacat.
//!
//! Library crates use [`DatacatError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Every registry or template failure carries the identity of the
//! dataset or template that produced it, so a run that aborts reports
//! exactly which entry broke it.

use std::path::PathBuf;

/// Top-level error type for all datacat operations.
#[derive(Debug, thiserror::Error)]
pub enum DatacatError {
    /// Named dataset absent from the registry.
    #[error("dataset '{name}' not found in registry")]
    NotFound { name: String },

    /// Registry lookup failed while constructing a builder.
    #[error("failed to instantiate builder for '{name}': {message}")]
    Instantiation { name: String, message: String },

    /// Referenced template identifier is not registered.
    #[error("template '{template}' not found")]
    TemplateMissing { template: String },

    /// Template evaluation failed given the supplied values.
    #[error("template '{template}' failed to render: {message}")]
    Render { template: String, message: String },

    /// A builder's category path cannot be placed in the category tree
    /// (empty path, or a leaf and a subcategory claim the same node).
    #[error("category path conflict for dataset '{name}' at '{path}'")]
    CategoryConflict { name: String, path: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A concurrent worker task panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Task(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DatacatError>;

impl DatacatError {
    /// Create a not-found error for a dataset name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an instantiation error for a dataset name.
    pub fn instantiation(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Instantiation {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Create a render error for a template identifier.
    pub fn render(template: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
