//! Catalog construction pipeline for datacat.
//!
//! This crate ties the registry and renderer seams into the end-to-end
//! `generate` workflow: concurrent builder discovery, category tree
//! construction, bounded per-document fan-out, and deterministic
//! aggregation into the final catalog.

pub mod catalog;
pub mod document;
pub mod mapper;
pub mod microdata;
pub mod tree;

pub use catalog::{CatalogAssembler, CatalogResult, RenderedDocument};
pub use document::{ConfigVariant, DocumentAssembler};
pub use mapper::map_bounded;
pub use tree::CategoryNode;
