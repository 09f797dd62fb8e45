use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use mosaic_model::{Asset, AssetFilter, AssetId, AssetPage, AssetPatch};
use parking_lot::RwLock;

use super::AssetStore;
use crate::error::{MosaicError, Result};

/// Reference [`AssetStore`] backed by a vector.
///
/// Listings are ordered newest capture first, undated assets last, ties
/// broken by path so the order is stable across calls.
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    assets: RwLock<Vec<Asset>>,
    page_fetches: AtomicUsize,
    full_fetches: AtomicUsize,
}

impl InMemoryAssetStore {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets: RwLock::new(assets),
            page_fetches: AtomicUsize::new(0),
            full_fetches: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, asset: Asset) {
        self.assets.write().push(asset);
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }

    pub fn get(&self, id: AssetId) -> Option<Asset> {
        self.assets.read().iter().find(|a| a.id == id).cloned()
    }

    /// Number of `get_assets_page` calls served.
    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(AtomicOrdering::Relaxed)
    }

    /// Number of `get_assets` calls served.
    pub fn full_fetches(&self) -> usize {
        self.full_fetches.load(AtomicOrdering::Relaxed)
    }

    fn filtered(&self, filter: &AssetFilter) -> Vec<Asset> {
        let mut matching: Vec<Asset> = self
            .assets
            .read()
            .iter()
            .filter(|asset| filter.matches(asset))
            .cloned()
            .collect();
        matching.sort_by(listing_order);
        matching
    }
}

fn listing_order(a: &Asset, b: &Asset) -> Ordering {
    match (a.captured_at, b.captured_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.path.cmp(&b.path))
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn get_assets_page(
        &self,
        filter: &AssetFilter,
        offset: usize,
        limit: usize,
    ) -> Result<AssetPage> {
        self.page_fetches.fetch_add(1, AtomicOrdering::Relaxed);
        let matching = self.filtered(filter);
        let total = matching.len();
        let items = matching.into_iter().skip(offset).take(limit).collect();
        Ok(AssetPage { items, total })
    }

    async fn get_assets(&self, filter: &AssetFilter) -> Result<Vec<Asset>> {
        self.full_fetches.fetch_add(1, AtomicOrdering::Relaxed);
        Ok(self.filtered(filter))
    }

    async fn update_asset(
        &self,
        id: AssetId,
        patch: &AssetPatch,
    ) -> Result<()> {
        let mut assets = self.assets.write();
        let asset = assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(MosaicError::NotFound(id))?;
        patch.apply_to(asset);
        Ok(())
    }
}
