//! Shared types, error model, and configuration for datacat.
//!
//! This crate is the foundation depended on by all other datacat crates.
//! It provides:
//! - [`DatacatError`] — the unified error type
//! - Domain types ([`BuilderRef`])
//! - Configuration ([`AppConfig`], [`CatalogConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, CatalogSection, FailurePolicy, WorkersSection, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DatacatError, Result};
pub use types::BuilderRef;
