//! Asset identifier allocation.
//!
//! Assigns every new asset a human-readable, category-scoped code such as
//! `NB-007`. The number is the smallest positive suffix not yet used in the
//! category (first-fit gap filling). Uniqueness is never guaranteed locally:
//! the store's unique index on `asset_id` is the authority, and the
//! [`AssetIdAllocator`] retries the whole compute-and-create sequence when it
//! loses a race for a slot.

pub mod allocator;
pub mod policy;
pub mod sequence;
pub mod store;

pub use allocator::AssetIdAllocator;
pub use policy::AllocationPolicy;
pub use sequence::{plan_allocation, Allocation, SequencedCategory};
pub use store::{AssetStore, StoreError};

use crate::types::DbId;

/// Errors surfaced by the allocator to its caller.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("Asset category not found: {0}")]
    CategoryNotFound(DbId),

    #[error("Invalid asset category: {0}")]
    InvalidCategory(String),

    #[error("Category {prefix} has no free asset identifiers left")]
    CategoryFull { prefix: String },

    /// Every attempt lost the race for its candidate identifier.
    #[error("Could not allocate an asset identifier after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    /// A non-retryable store failure, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
