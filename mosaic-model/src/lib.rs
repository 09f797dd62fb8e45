//! Core data model definitions shared across Mosaic crates.
#![allow(missing_docs)]

pub mod asset;
pub mod error;
pub mod filter;
pub mod ids;
pub mod media_kind;

// Intentionally curated re-exports for downstream consumers.
pub use asset::{Asset, AssetPage, AssetPatch};
pub use error::{ModelError, Result as ModelResult};
pub use filter::{AssetFilter, DateRange, LoadMode};
pub use ids::{AssetId, CollectionId};
pub use media_kind::{MarkingStatus, MediaKind};

/// Frequently used model types.
pub mod prelude {
    pub use crate::asset::{Asset, AssetPage, AssetPatch};
    pub use crate::filter::{AssetFilter, DateRange, LoadMode};
    pub use crate::ids::{AssetId, CollectionId};
    pub use crate::media_kind::{MarkingStatus, MediaKind};
}
