//! # Mosaic Core
//!
//! Data plumbing behind the Mosaic media grid: a sparse, page-loaded window
//! over a filtered asset listing, and spatial keyboard navigation across the
//! cells that are actually rendered.
//!
//! ## Architecture
//!
//! - [`store`]: the [`store::AssetStore`] port the grid reads from, plus an
//!   in-memory reference implementation
//! - [`window`]: the windowed cache, its page scheduler and eviction policy
//! - [`session`]: per-view coordinator that resets the window on filter
//!   changes and owns selection state
//! - [`spatial`]: geometry-driven nearest-neighbor lookup for arrow keys
//! - [`config`] / [`constants`]: tuning knobs and their defaults
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mosaic_core::{GridSession, InMemoryAssetStore, MosaicConfig};
//! use mosaic_model::AssetFilter;
//!
//! async fn open_grid() -> mosaic_core::Result<()> {
//!     let store = Arc::new(InMemoryAssetStore::default());
//!     let mut session = GridSession::new(store, MosaicConfig::default())?;
//!
//!     let filter = AssetFilter::all();
//!     session.reset_and_load(filter.clone()).await;
//!     session.ensure_range_loaded(0, 250, &filter).settled().await;
//!     assert!(session.get(0).is_none() || session.window().len() > 0);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod config;
pub mod constants;
pub mod error;
pub mod session;
pub mod spatial;
pub mod store;
pub mod window;

pub use config::{MosaicConfig, SpatialConfig, WindowConfig};
pub use error::{MosaicError, Result};
pub use session::{GridSession, Selection};
pub use spatial::{
    CellGeometry, Direction, GeometryProvider, Rect, SpatialIndex,
};
pub use store::{AssetStore, InMemoryAssetStore};
pub use window::{AssetWindow, PageApply, PageLoad, RangeLoad, WindowStats};
