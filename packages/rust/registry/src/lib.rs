//! Dataset registry seam for datacat.
//!
//! The catalog pipeline never talks to a concrete registry directly;
//! it goes through [`BuilderLookup`]. [`SnapshotRegistry`] is the
//! bundled implementation backed by an immutable JSON snapshot file.

pub mod snapshot;

use datacat_shared::{BuilderRef, Result};

pub use snapshot::SnapshotRegistry;

/// Resolves dataset names to builder metadata.
///
/// Implementations must be side-effect-free and safe to call from
/// concurrent workers; the registry is treated as a read-only snapshot
/// for the duration of one documentation pass.
pub trait BuilderLookup: Send + Sync {
    /// Enumerate every dataset name the registry knows about.
    fn list_names(&self) -> Result<Vec<String>>;

    /// Resolve a dataset name to a builder, optionally bound to one
    /// named config.
    ///
    /// Errors with [`DatacatError::NotFound`] when the name is absent
    /// and [`DatacatError::Instantiation`] when construction fails
    /// (e.g., an unknown config key).
    ///
    /// [`DatacatError::NotFound`]: datacat_shared::DatacatError::NotFound
    /// [`DatacatError::Instantiation`]: datacat_shared::DatacatError::Instantiation
    fn resolve(&self, name: &str, config: Option<&str>) -> Result<BuilderRef>;
}
