#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use mosaic_core::{AssetStore, InMemoryAssetStore, MosaicError, Result};
use mosaic_model::{
    Asset, AssetFilter, AssetId, AssetPage, AssetPatch, MediaKind,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `n` undated assets; the store's listing order is then path order, so
/// listing index `i` is always `/lib/{i:05}.jpg`.
pub fn make_assets(n: usize) -> Vec<Asset> {
    (0..n).map(|i| make_asset(i, "main")).collect()
}

pub fn make_asset(i: usize, volume: &str) -> Asset {
    Asset::new(format!("/lib/{i:05}.jpg"), MediaKind::Image, volume)
}

pub fn expected_path(i: usize) -> String {
    format!("/lib/{i:05}.jpg")
}

/// Wraps the in-memory store with call recording, per-offset holds and
/// per-offset failures.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: InMemoryAssetStore,
    calls: Mutex<Vec<(AssetFilter, usize)>>,
    holds: Mutex<HashMap<usize, Arc<Notify>>>,
    failing: Mutex<HashSet<usize>>,
}

impl ScriptedStore {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            inner: InMemoryAssetStore::new(assets),
            ..Self::default()
        }
    }

    /// Page fetches at `offset` block until the returned handle is notified.
    pub fn hold(&self, offset: usize) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds.lock().insert(offset, notify.clone());
        notify
    }

    pub fn fail_at(&self, offset: usize) {
        self.failing.lock().insert(offset);
    }

    pub fn heal(&self, offset: usize) {
        self.failing.lock().remove(&offset);
    }

    pub fn page_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn offsets_for(&self, filter: &AssetFilter) -> Vec<usize> {
        self.calls
            .lock()
            .iter()
            .filter(|(f, _)| f == filter)
            .map(|(_, offset)| *offset)
            .collect()
    }

    /// Yield until at least `n` page fetches have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.page_calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl AssetStore for ScriptedStore {
    async fn get_assets_page(
        &self,
        filter: &AssetFilter,
        offset: usize,
        limit: usize,
    ) -> Result<AssetPage> {
        self.calls.lock().push((filter.clone(), offset));
        let hold = self.holds.lock().get(&offset).cloned();
        if let Some(notify) = hold {
            notify.notified().await;
        }
        if self.failing.lock().contains(&offset) {
            let message = format!("disk read failed at {offset}");
            return Err(MosaicError::Store(message));
        }
        self.inner.get_assets_page(filter, offset, limit).await
    }

    async fn get_assets(&self, filter: &AssetFilter) -> Result<Vec<Asset>> {
        self.inner.get_assets(filter).await
    }

    async fn update_asset(
        &self,
        id: AssetId,
        patch: &AssetPatch,
    ) -> Result<()> {
        self.inner.update_asset(id, patch).await
    }
}
