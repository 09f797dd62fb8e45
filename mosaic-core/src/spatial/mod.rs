//! Spatial navigation over a virtualized grid.
//!
//! Only a window of cells is rendered at any time and the visual layout does
//! not follow linear index order (justified rows, date headers, masonry), so
//! arrow-key moves are resolved against rendered geometry rather than index
//! arithmetic. Geometry comes from a [`GeometryProvider`]; the scoring itself
//! lives in [`scoring`] and has no rendering dependency.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::trace;

use crate::config::SpatialConfig;

pub mod debounce;
pub mod scoring;

pub use debounce::Debouncer;
pub use scoring::nearest_in_direction;

/// Arrow-key travel direction, in screen space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Axis-aligned bounding box in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One rendered cell as reported by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    /// Stable asset index the cell renders
    pub index: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub center_x: f32,
    pub center_y: f32,
    pub rect: Rect,
}

impl SpatialEntry {
    pub fn from_rect(rect: Rect) -> Self {
        let (center_x, center_y) = rect.center();
        Self {
            center_x,
            center_y,
            rect,
        }
    }
}

/// Source of the geometry for currently rendered cells.
pub trait GeometryProvider {
    fn visible_cells(&self) -> Vec<CellGeometry>;
}

impl GeometryProvider for [CellGeometry] {
    fn visible_cells(&self) -> Vec<CellGeometry> {
        self.to_vec()
    }
}

impl GeometryProvider for Vec<CellGeometry> {
    fn visible_cells(&self) -> Vec<CellGeometry> {
        self.clone()
    }
}

/// Index → geometry map for the rendered window, rebuilt lazily.
///
/// The map goes stale when the asset list version moves or when layout
/// changes (scroll/resize). Layout notifications are debounced for
/// background refreshes, but a query always rebuilds first if anything is
/// pending, so answers reflect the current layout.
#[derive(Debug)]
pub struct SpatialIndex {
    entries: BTreeMap<usize, SpatialEntry>,
    built_for_version: Option<u64>,
    layout: Debouncer,
    tolerance: f32,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(&SpatialConfig::default())
    }
}

impl SpatialIndex {
    pub fn new(config: &SpatialConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            built_for_version: None,
            layout: Debouncer::new(config.rebuild_debounce()),
            tolerance: config.tolerance_px,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&SpatialEntry> {
        self.entries.get(&index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.built_for_version = None;
        self.layout.cancel();
    }

    /// Replace the map with the provider's current cells.
    pub fn rebuild<P>(&mut self, provider: &P, version: u64)
    where
        P: GeometryProvider + ?Sized,
    {
        self.entries = provider
            .visible_cells()
            .into_iter()
            .map(|cell| (cell.index, SpatialEntry::from_rect(cell.rect)))
            .collect();
        self.built_for_version = Some(version);
        self.layout.cancel();
        trace!(cells = self.entries.len(), version, "spatial index rebuilt");
    }

    /// Record a scroll or resize.
    pub fn notify_layout_changed(&mut self, now: Instant) {
        self.layout.trigger(now);
    }

    /// Whether a query right now would rebuild first.
    pub fn is_stale(&self, version: u64) -> bool {
        self.entries.is_empty()
            || self.built_for_version != Some(version)
            || self.layout.is_pending()
    }

    /// Debounced background refresh; call from the frame/tick loop.
    ///
    /// Rebuilds when the asset list version moved, or when the layout has
    /// been quiet for the debounce period. Returns whether it rebuilt.
    pub fn refresh<P>(
        &mut self,
        provider: &P,
        version: u64,
        now: Instant,
    ) -> bool
    where
        P: GeometryProvider + ?Sized,
    {
        let version_moved = self.built_for_version != Some(version);
        if version_moved || self.layout.take_due(now) {
            self.rebuild(provider, version);
            true
        } else {
            false
        }
    }

    /// Index of the closest rendered cell from `from_index` in `direction`.
    ///
    /// `None` when the anchor is not rendered or nothing lies that way;
    /// callers treat that as a no-op.
    pub fn find_neighbor<P>(
        &mut self,
        direction: Direction,
        from_index: usize,
        provider: &P,
        version: u64,
    ) -> Option<usize>
    where
        P: GeometryProvider + ?Sized,
    {
        if self.is_stale(version) {
            self.rebuild(provider, version);
        }
        nearest_in_direction(
            &self.entries,
            from_index,
            direction,
            self.tolerance,
        )
    }
}
