//! Page loading and viewport scheduling.
//!
//! Claiming a page (check loaded / check in flight / mark in flight) happens
//! under a single write-lock acquisition, before any `.await`. That is the
//! only mutual exclusion the loader needs to guarantee one fetch per page.

use std::collections::BTreeSet;

use futures::future::join_all;
use mosaic_model::{AssetFilter, AssetPage, LoadMode};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::{AssetWindow, PageApply, WindowState};
use crate::config::WindowConfig;

/// Outcome of a single page load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    /// A fetch was issued and its result handed to the window
    Fetched(PageApply),
    /// Page was resident; its access time was refreshed
    AlreadyLoaded,
    /// Another request owns the fetch for this page
    AlreadyInFlight,
    /// The store call failed; the page stays unloaded
    Failed,
    /// Filter is not the active one, or the view is not paged
    Skipped,
}

pub(crate) enum Claim {
    Loaded,
    InFlight(watch::Receiver<()>),
    Claimed { generation: u64 },
}

/// Handle to the loads scheduled by one [`AssetWindow::ensure_range_loaded`]
/// call.
///
/// Dropping it does not cancel anything.
#[derive(Debug, Default)]
pub struct RangeLoad {
    scheduled: Vec<usize>,
    handles: Vec<JoinHandle<PageLoad>>,
    pending: Vec<watch::Receiver<()>>,
}

impl RangeLoad {
    /// Pages this call issued fetches for, viewport pages before backfill.
    pub fn scheduled_pages(&self) -> &[usize] {
        &self.scheduled
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty() && self.pending.is_empty()
    }

    /// Wait for every fetch this call issued, and for any fetch it found
    /// already in flight for a page it needed.
    pub async fn settled(self) -> Vec<PageLoad> {
        let outcomes = join_all(self.handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(error = %err, "page load task did not complete");
                    PageLoad::Failed
                }
            })
            .collect();
        for mut rx in self.pending {
            // Resolves once the owning fetch drops its in-flight entry.
            while rx.changed().await.is_ok() {}
        }
        outcomes
    }
}

/// Pages one range request should touch, before dedup.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct RangePlan {
    pub viewport: Vec<usize>,
    pub backfill: Vec<usize>,
}

impl RangePlan {
    /// Viewport pages first, then backfill.
    pub fn pages(&self) -> Vec<usize> {
        self.viewport.iter().chain(&self.backfill).copied().collect()
    }
}

/// Which pages a viewport request should touch.
///
/// Viewport coverage spans `[start_page, min(stop_page + look_ahead,
/// start_page + max_burst)]`. If the viewport begins past the contiguous
/// loaded prefix, the next `backfill_budget` pages after that prefix follow;
/// ones already in flight are left to their owner.
pub(crate) fn plan_range(
    config: &WindowConfig,
    state: &WindowState,
    start: usize,
    stop: usize,
) -> RangePlan {
    let (start, stop) = if start <= stop {
        (start, stop)
    } else {
        (stop, start)
    };
    let start_page = config.page_of(start);
    let stop_page = config.page_of(stop);
    let mut last = stop_page
        .saturating_add(config.look_ahead)
        .min(start_page.saturating_add(config.max_burst));

    if let Some(total) = state.total {
        if total == 0 {
            return RangePlan::default();
        }
        last = last.min(config.page_of(total - 1));
    }
    if start_page > last {
        return RangePlan::default();
    }

    let mut prefix = 0;
    while state.loaded.contains_key(&prefix) {
        prefix += 1;
    }
    let backfill = if start_page > prefix {
        (prefix..start_page).take(config.backfill_budget).collect()
    } else {
        Vec::new()
    };

    RangePlan {
        viewport: (start_page..=last).collect(),
        backfill,
    }
}

impl AssetWindow {
    pub(crate) fn claim(state: &mut WindowState, page: usize) -> Claim {
        if state.loaded.contains_key(&page) {
            state.touch(page);
            return Claim::Loaded;
        }
        if let Some(tx) = state.in_flight.get(&page) {
            return Claim::InFlight(tx.subscribe());
        }
        let (tx, _rx) = watch::channel(());
        state.in_flight.insert(page, tx);
        Claim::Claimed {
            generation: state.generation,
        }
    }

    /// Load one page for `filter`.
    ///
    /// No-op for a resident page beyond refreshing its access time, and for
    /// a page another request is already fetching. Failures are logged and
    /// leave the page unloaded; nothing retries on its own.
    pub async fn load_page(
        &self,
        page: usize,
        filter: &AssetFilter,
    ) -> PageLoad {
        self.load_page_inner(page, filter, false).await
    }

    /// Like [`Self::load_page`], but when another request owns the fetch,
    /// wait until it has settled before returning `AlreadyInFlight`.
    pub async fn load_page_settled(
        &self,
        page: usize,
        filter: &AssetFilter,
    ) -> PageLoad {
        self.load_page_inner(page, filter, true).await
    }

    async fn load_page_inner(
        &self,
        page: usize,
        filter: &AssetFilter,
        wait: bool,
    ) -> PageLoad {
        let claim = {
            let mut state = self.inner.state.write();
            if !state.accepts(filter) || state.mode != LoadMode::Paged {
                return PageLoad::Skipped;
            }
            Self::claim(&mut state, page)
        };

        match claim {
            Claim::Loaded => PageLoad::AlreadyLoaded,
            Claim::InFlight(mut rx) => {
                if wait {
                    while rx.changed().await.is_ok() {}
                }
                PageLoad::AlreadyInFlight
            }
            Claim::Claimed { generation } => {
                self.fetch_claimed(page, generation, filter).await
            }
        }
    }

    async fn fetch_claimed(
        &self,
        page: usize,
        generation: u64,
        filter: &AssetFilter,
    ) -> PageLoad {
        let page_size = self.inner.config.page_size;
        let offset = self.inner.config.page_offset(page);
        trace!(page, offset, generation, "fetching page");

        match self
            .inner
            .store
            .get_assets_page(filter, offset, page_size)
            .await
        {
            Ok(AssetPage { items, total }) => PageLoad::Fetched(
                self.apply_page_result(page, generation, offset, items, total),
            ),
            Err(err) => {
                warn!(page, generation, error = %err, "page fetch failed");
                let mut state = self.inner.state.write();
                if state.generation == generation {
                    state.in_flight.remove(&page);
                }
                PageLoad::Failed
            }
        }
    }

    /// Make sure the slots in `[start, stop]` are on their way in.
    ///
    /// Fire-and-forget: fetches run as Tokio tasks and the returned
    /// [`RangeLoad`] may be dropped. Repeated calls for the same range only
    /// refresh access times. Requests for a filter other than the active one,
    /// and for grouped views, are ignored.
    pub fn ensure_range_loaded(
        &self,
        start: usize,
        stop: usize,
        filter: &AssetFilter,
    ) -> RangeLoad {
        let Ok(runtime) = Handle::try_current() else {
            warn!("ensure_range_loaded called outside a Tokio runtime");
            return RangeLoad::default();
        };

        let mut load = RangeLoad::default();
        let mut claimed = Vec::new();
        {
            let mut state = self.inner.state.write();
            if !state.accepts(filter) {
                debug!(start, stop, "ignoring range for inactive filter");
                return load;
            }
            if state.mode != LoadMode::Paged {
                return load;
            }

            let plan = plan_range(&self.inner.config, &state, start, stop);
            state.viewport = plan.viewport.iter().copied().collect();

            let mut seen = BTreeSet::new();
            for page in plan.pages() {
                if !seen.insert(page) {
                    continue;
                }
                match Self::claim(&mut state, page) {
                    Claim::Loaded => {}
                    Claim::InFlight(rx) => load.pending.push(rx),
                    Claim::Claimed { generation } => {
                        claimed.push((page, generation))
                    }
                }
            }
        }

        for (page, generation) in claimed {
            let window = self.clone();
            let filter = filter.clone();
            load.scheduled.push(page);
            load.handles.push(runtime.spawn(async move {
                window.fetch_claimed(page, generation, &filter).await
            }));
        }
        if !load.scheduled.is_empty() {
            trace!(start, stop, pages = ?load.scheduled, "range scheduled");
        }
        load
    }

    /// Fetch the whole result set for a grouped view.
    pub(crate) async fn load_all(
        &self,
        generation: u64,
        filter: &AssetFilter,
    ) -> PageLoad {
        match self.inner.store.get_assets(filter).await {
            Ok(items) => {
                PageLoad::Fetched(self.apply_full_result(generation, items))
            }
            Err(err) => {
                warn!(generation, error = %err, "full fetch failed");
                PageLoad::Failed
            }
        }
    }
}
