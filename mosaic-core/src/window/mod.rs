//! Windowed asset cache.
//!
//! A sparse, index-addressable view over a filter's result set. Slots are
//! filled page by page from an [`AssetStore`]; resident pages are capped and
//! the overflow is evicted after every install (see [`eviction`]).
//!
//! Every reset bumps a generation number. Fetches carry the generation they
//! were issued under and their results are dropped if it has moved on, so a
//! slow response for an old filter can never land in the new filter's slots.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;
use std::sync::Arc;

use mosaic_model::{Asset, AssetFilter, AssetId, AssetPatch, LoadMode};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::config::WindowConfig;
use crate::error::Result;
use crate::store::AssetStore;

pub mod eviction;
pub mod loader;

use eviction::{PageAccess, plan_evictions};
pub use loader::{PageLoad, RangeLoad};

/// Outcome of installing one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageApply {
    /// Items are resident; `evicted` lists pages dropped to stay under the cap
    Installed { evicted: Vec<usize> },
    /// The fetch was issued under an earlier filter generation
    StaleGeneration,
    /// The store reported a different total than the resident sequence
    TotalMismatch { current: usize, reported: usize },
    /// The page starts at or past the end of the result set; nothing is
    /// resident for it
    PastEnd,
}

/// Point-in-time counters, mostly for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    pub total: Option<usize>,
    pub resident_pages: usize,
    pub in_flight_pages: usize,
    pub resident_slots: usize,
    pub generation: u64,
    pub version: u64,
}

/// Cheap-to-clone handle to one grid view's cache.
///
/// Clones share state; spawned page loads hold a clone.
#[derive(Clone)]
pub struct AssetWindow {
    inner: Arc<WindowInner>,
}

struct WindowInner {
    store: Arc<dyn AssetStore>,
    config: WindowConfig,
    state: RwLock<WindowState>,
}

#[derive(Debug)]
pub(crate) struct WindowState {
    slots: Vec<Option<Arc<Asset>>>,
    /// Size reported by the store for the active generation
    total: Option<usize>,
    /// Resident pages and their last access tick
    loaded: HashMap<usize, u64>,
    /// Pages with a fetch outstanding. Dropping the sender wakes anyone
    /// waiting for the page to settle.
    in_flight: HashMap<usize, watch::Sender<()>>,
    /// Viewport pages of the latest range request, kept out of eviction
    viewport: BTreeSet<usize>,
    access_clock: u64,
    generation: u64,
    filter: Option<AssetFilter>,
    mode: LoadMode,
    version: u64,
}

impl WindowState {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            total: None,
            loaded: HashMap::new(),
            in_flight: HashMap::new(),
            viewport: BTreeSet::new(),
            access_clock: 0,
            generation: 0,
            filter: None,
            mode: LoadMode::Paged,
            version: 0,
        }
    }

    fn accepts(&self, filter: &AssetFilter) -> bool {
        self.filter.as_ref() == Some(filter)
    }

    fn touch(&mut self, page: usize) {
        self.access_clock += 1;
        self.loaded.insert(page, self.access_clock);
    }

    /// Slot range covered by `page`, clamped to the sequence.
    fn page_range(&self, page: usize, page_size: usize) -> Range<usize> {
        let start = page.saturating_mul(page_size).min(self.slots.len());
        let end = start.saturating_add(page_size).min(self.slots.len());
        start..end
    }

    fn evict(&mut self, page: usize, page_size: usize) {
        let range = self.page_range(page, page_size);
        for slot in &mut self.slots[range] {
            *slot = None;
        }
        self.loaded.remove(&page);
    }
}

impl std::fmt::Debug for AssetWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetWindow")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl AssetWindow {
    pub fn new(
        store: Arc<dyn AssetStore>,
        config: WindowConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(WindowInner {
                store,
                config,
                state: RwLock::new(WindowState::new()),
            }),
        })
    }

    pub fn config(&self) -> &WindowConfig {
        &self.inner.config
    }

    pub(crate) fn store(&self) -> &Arc<dyn AssetStore> {
        &self.inner.store
    }

    /// Asset at `index`, or `None` if that slot is not loaded (or out of
    /// range).
    pub fn get(&self, index: usize) -> Option<Arc<Asset>> {
        self.inner.state.read().slots.get(index).cloned().flatten()
    }

    /// Length of the sparse sequence; zero until the first page lands.
    pub fn len(&self) -> usize {
        self.inner.state.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bumped on every structural or content mutation.
    pub fn version(&self) -> u64 {
        self.inner.state.read().version
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.read().generation
    }

    pub fn active_filter(&self) -> Option<AssetFilter> {
        self.inner.state.read().filter.clone()
    }

    pub fn load_mode(&self) -> LoadMode {
        self.inner.state.read().mode
    }

    /// Resident pages in ascending order.
    pub fn loaded_pages(&self) -> Vec<usize> {
        let mut pages: Vec<usize> =
            self.inner.state.read().loaded.keys().copied().collect();
        pages.sort_unstable();
        pages
    }

    /// Pages with an outstanding fetch, in ascending order.
    pub fn in_flight_pages(&self) -> Vec<usize> {
        let mut pages: Vec<usize> =
            self.inner.state.read().in_flight.keys().copied().collect();
        pages.sort_unstable();
        pages
    }

    pub fn stats(&self) -> WindowStats {
        let state = self.inner.state.read();
        WindowStats {
            total: state.total,
            resident_pages: state.loaded.len(),
            in_flight_pages: state.in_flight.len(),
            resident_slots: state.slots.iter().filter(|s| s.is_some()).count(),
            generation: state.generation,
            version: state.version,
        }
    }

    /// Drop everything and start a new generation for `filter`.
    ///
    /// Outstanding fetches keep running but their results will be discarded.
    pub fn reset(&self, filter: AssetFilter) -> u64 {
        let mut state = self.inner.state.write();
        state.generation += 1;
        state.mode = filter.load_mode();
        state.filter = Some(filter);
        state.slots.clear();
        state.total = None;
        state.loaded.clear();
        state.in_flight.clear();
        state.viewport.clear();
        state.version += 1;
        debug!(
            generation = state.generation,
            mode = ?state.mode,
            "asset window reset"
        );
        state.generation
    }

    /// Install a fetched page.
    ///
    /// Results from an earlier generation are dropped. A `total` that
    /// disagrees with the resident sequence is treated as stale too, unless
    /// nothing is resident yet, in which case the sequence is sized to it.
    /// A page starting at or past `total` sizes the sequence but never
    /// becomes resident.
    pub fn apply_page_result(
        &self,
        page: usize,
        generation: u64,
        offset: usize,
        items: Vec<Asset>,
        total: usize,
    ) -> PageApply {
        let page_size = self.inner.config.page_size;
        let mut state = self.inner.state.write();

        if generation != state.generation {
            debug!(
                page,
                generation,
                current = state.generation,
                "discarding page from stale generation"
            );
            return PageApply::StaleGeneration;
        }
        state.in_flight.remove(&page);

        let mut resized = false;
        if state.total != Some(total) {
            if state.loaded.is_empty() {
                state.slots.clear();
                state.slots.resize(total, None);
                state.total = Some(total);
                resized = true;
            } else {
                let current = state.slots.len();
                warn!(
                    page,
                    current,
                    reported = total,
                    "page total disagrees with resident sequence, discarding"
                );
                return PageApply::TotalMismatch {
                    current,
                    reported: total,
                };
            }
        }

        if offset >= total {
            if resized {
                state.version += 1;
            }
            debug!(page, offset, total, "page starts past the end");
            return PageApply::PastEnd;
        }

        let installed = items.len();
        for (i, item) in items.into_iter().enumerate() {
            match state.slots.get_mut(offset + i) {
                Some(slot) => *slot = Some(Arc::new(item)),
                None => break,
            }
        }
        state.touch(page);

        let resident = state
            .loaded
            .iter()
            .map(|(&page, &last_access)| PageAccess { page, last_access });
        let plan = plan_evictions(
            resident,
            page,
            &state.viewport,
            self.inner.config.max_loaded_pages,
        );
        for &victim in &plan.evict {
            state.evict(victim, page_size);
        }
        state.version += 1;

        trace!(
            page,
            installed,
            evicted = plan.evict.len(),
            resident = state.loaded.len(),
            "page installed"
        );
        PageApply::Installed { evicted: plan.evict }
    }

    /// Install a complete, dense result set (grouped views).
    pub fn apply_full_result(
        &self,
        generation: u64,
        items: Vec<Asset>,
    ) -> PageApply {
        let mut state = self.inner.state.write();
        if generation != state.generation {
            debug!(
                generation,
                current = state.generation,
                "discarding full result from stale generation"
            );
            return PageApply::StaleGeneration;
        }
        state.total = Some(items.len());
        state.slots = items.into_iter().map(|a| Some(Arc::new(a))).collect();
        state.loaded.clear();
        state.version += 1;
        trace!(total = state.slots.len(), "full result installed");
        PageApply::Installed { evicted: Vec::new() }
    }

    /// Merge `patch` into the resident asset with `id`.
    ///
    /// Paged views only search resident pages; grouped views hold the whole
    /// result set. Returns `false` when the asset is not resident; nothing
    /// changes then.
    pub fn update_asset(&self, id: AssetId, patch: &AssetPatch) -> bool {
        let page_size = self.inner.config.page_size;
        let mut guard = self.inner.state.write();
        let state = &mut *guard;
        let ranges: Vec<Range<usize>> = match state.mode {
            LoadMode::Paged => state
                .loaded
                .keys()
                .map(|&page| state.page_range(page, page_size))
                .collect(),
            LoadMode::Grouped => vec![0..state.slots.len()],
        };

        for range in ranges {
            for slot in &mut state.slots[range] {
                if let Some(asset) = slot
                    && asset.id == id
                {
                    patch.apply_to(Arc::make_mut(asset));
                    state.version += 1;
                    return true;
                }
            }
        }
        false
    }
}
