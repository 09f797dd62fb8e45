//! Asset store port.
//!
//! The grid never talks to a database directly; it consumes this trait.
//! Infrastructure adapters (SQLite catalog, IPC bridge, ...) implement it.

use async_trait::async_trait;
use mosaic_model::{Asset, AssetFilter, AssetId, AssetPage, AssetPatch};

use crate::error::Result;

pub mod memory;

pub use memory::InMemoryAssetStore;

/// Repository port for filtered, sorted asset listings.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Slice `[offset, offset + limit)` of the filter's result set, plus the
    /// size of the whole set.
    async fn get_assets_page(
        &self,
        filter: &AssetFilter,
        offset: usize,
        limit: usize,
    ) -> Result<AssetPage>;

    /// The complete result set; only used for grouped views.
    async fn get_assets(&self, filter: &AssetFilter) -> Result<Vec<Asset>>;

    /// Persist a partial update.
    async fn update_asset(&self, id: AssetId, patch: &AssetPatch) -> Result<()>;
}
