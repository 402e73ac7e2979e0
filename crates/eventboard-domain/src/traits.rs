//! Trait definitions for external interactions
//!
//! These traits define the boundaries between derivation logic and the
//! surrounding application. Implementations live in host crates.

use crate::EntitySnapshot;
use std::sync::Arc;

/// Boundary to the entity store
///
/// Implemented by whatever fetches entities from the remote store. Each
/// successful load yields a new snapshot identity, even when the delivered
/// data happens to be unchanged.
pub trait SnapshotSource {
    /// Error type for load operations
    type Error;

    /// Load the current entities into an immutable snapshot
    fn load(&self) -> Result<Arc<EntitySnapshot>, Self::Error>;
}
