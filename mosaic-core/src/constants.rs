//! Default tuning constants for the media grid.
//!
//! [`crate::config`] falls back to these when a value is not overridden.

/// Paged window defaults
pub mod window {
    /// Slots fetched together in one store call
    pub const PAGE_SIZE: usize = 100;
    /// Resident page cap enforced after every install
    pub const MAX_LOADED_PAGES: usize = 30;
    /// Extra pages past the viewport's last page
    pub const LOOK_AHEAD_PAGES: usize = 1;
    /// Upper bound on viewport pages scheduled by one range request
    pub const MAX_BURST_PAGES: usize = 6;
    /// Head-of-collection pages warmed per range request
    pub const BACKFILL_BUDGET: usize = 2;
}

/// Spatial navigation defaults
pub mod spatial {
    /// Cells whose centers differ by less than this on an axis share a
    /// row/column
    pub const ALIGNMENT_TOLERANCE_PX: f32 = 6.0;
    /// Quiet period after the last scroll/resize before the index is rebuilt
    pub const REBUILD_DEBOUNCE_MS: u64 = 150;
    /// Weight applied to the axis perpendicular to the travel direction
    pub const CROSS_AXIS_WEIGHT: f32 = 2.0;
}
