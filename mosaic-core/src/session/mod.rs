//! Filter-reset coordinator.
//!
//! A [`GridSession`] is what a grid view owns: the asset window, the
//! selection that indexes into it, and the spatial index used for keyboard
//! moves. Changing the filter goes through [`GridSession::reset_and_load`],
//! which invalidates all three together.

use std::sync::Arc;
use std::time::Instant;

use mosaic_model::{Asset, AssetFilter, AssetId, AssetPatch, LoadMode};
use tracing::{debug, info};

use crate::config::MosaicConfig;
use crate::error::Result;
use crate::spatial::{Direction, GeometryProvider, SpatialIndex};
use crate::store::AssetStore;
use crate::window::{AssetWindow, PageLoad, RangeLoad};

pub mod selection;

pub use selection::Selection;

#[derive(Debug)]
pub struct GridSession {
    window: AssetWindow,
    selection: Selection,
    spatial: SpatialIndex,
}

impl GridSession {
    pub fn new(
        store: Arc<dyn AssetStore>,
        config: MosaicConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            window: AssetWindow::new(store, config.window)?,
            selection: Selection::default(),
            spatial: SpatialIndex::new(&config.spatial),
        })
    }

    pub fn window(&self) -> &AssetWindow {
        &self.window
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn spatial_mut(&mut self) -> &mut SpatialIndex {
        &mut self.spatial
    }

    pub fn get(&self, index: usize) -> Option<Arc<Asset>> {
        self.window.get(index)
    }

    pub fn version(&self) -> u64 {
        self.window.version()
    }

    pub fn ensure_range_loaded(
        &self,
        start: usize,
        stop: usize,
        filter: &AssetFilter,
    ) -> RangeLoad {
        self.window.ensure_range_loaded(start, stop, filter)
    }

    /// Switch the view to `filter`.
    ///
    /// Clears the cache, the selection and any open viewer, then loads
    /// either page 0 (paged views) or the whole result set (grouped views)
    /// before returning. If another handle already claimed page 0, this
    /// waits for that fetch instead.
    pub async fn reset_and_load(&mut self, filter: AssetFilter) -> PageLoad {
        self.selection.clear();
        self.spatial.clear();
        let mode = filter.load_mode();
        let generation = self.window.reset(filter.clone());
        info!(generation, ?mode, "grid filter changed");

        match mode {
            LoadMode::Paged => {
                self.window.load_page_settled(0, &filter).await
            }
            LoadMode::Grouped => {
                self.window.load_all(generation, &filter).await
            }
        }
    }

    /// Reload the active filter from scratch, e.g. after an import changed
    /// the collection size. `None` when no filter has been applied yet.
    pub async fn refresh(&mut self) -> Option<PageLoad> {
        let filter = self.window.active_filter()?;
        Some(self.reset_and_load(filter).await)
    }

    /// Persist `patch` through the store, then mirror it locally.
    ///
    /// Returns whether the asset was resident and patched in the cache.
    pub async fn persist_asset_update(
        &self,
        id: AssetId,
        patch: AssetPatch,
    ) -> Result<bool> {
        self.window.store().update_asset(id, &patch).await?;
        let patched = self.window.update_asset(id, &patch);
        debug!(%id, patched, "asset update persisted");
        Ok(patched)
    }

    /// Resident assets for the current selection, in index order.
    pub fn selected_assets(&self) -> Vec<Arc<Asset>> {
        self.selection
            .selected()
            .filter_map(|index| self.window.get(index))
            .collect()
    }

    /// Record a scroll or resize of the grid.
    pub fn notify_layout_changed(&mut self, now: Instant) {
        self.spatial.notify_layout_changed(now);
    }

    /// Debounced spatial refresh for the tick loop.
    pub fn refresh_layout<P>(&mut self, provider: &P, now: Instant) -> bool
    where
        P: GeometryProvider + ?Sized,
    {
        let version = self.window.version();
        self.spatial.refresh(provider, version, now)
    }

    /// Move the focused cell one step in `direction`.
    ///
    /// The new cell becomes the sole selection; an open viewer follows it.
    /// `None` (and no change) when nothing is focused, the focused cell is
    /// not rendered, or there is no cell that way.
    pub fn navigate<P>(
        &mut self,
        direction: Direction,
        provider: &P,
    ) -> Option<usize>
    where
        P: GeometryProvider + ?Sized,
    {
        let from = self.selection.anchor()?;
        let version = self.window.version();
        let next = self
            .spatial
            .find_neighbor(direction, from, provider, version)?;

        self.selection.select(next);
        if self.selection.viewer().is_some() {
            self.selection.open_viewer(next);
        }
        Some(next)
    }
}
