//! Runtime configuration for the media grid.
//!
//! Every field falls back to the compiled defaults in [`crate::constants`],
//! so a partial TOML document only overrides what it names.

use std::time::Duration;

use serde::Deserialize;

use crate::constants;
use crate::error::{MosaicError, Result};

/// Paging, eviction and scheduling knobs for [`crate::window::AssetWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub page_size: usize,
    pub max_loaded_pages: usize,
    pub look_ahead: usize,
    pub max_burst: usize,
    pub backfill_budget: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            page_size: constants::window::PAGE_SIZE,
            max_loaded_pages: constants::window::MAX_LOADED_PAGES,
            look_ahead: constants::window::LOOK_AHEAD_PAGES,
            max_burst: constants::window::MAX_BURST_PAGES,
            backfill_budget: constants::window::BACKFILL_BUDGET,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(MosaicError::InvalidConfig(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if self.max_loaded_pages == 0 {
            return Err(MosaicError::InvalidConfig(
                "max_loaded_pages must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Page containing `index`.
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size
    }

    /// First slot index covered by `page`.
    pub fn page_offset(&self, page: usize) -> usize {
        page.saturating_mul(self.page_size)
    }
}

/// Spatial navigation knobs for [`crate::spatial::SpatialIndex`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    pub tolerance_px: f32,
    pub rebuild_debounce_ms: u64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            tolerance_px: constants::spatial::ALIGNMENT_TOLERANCE_PX,
            rebuild_debounce_ms: constants::spatial::REBUILD_DEBOUNCE_MS,
        }
    }
}

impl SpatialConfig {
    pub fn rebuild_debounce(&self) -> Duration {
        Duration::from_millis(self.rebuild_debounce_ms)
    }
}

/// Top-level configuration document.
///
/// ```toml
/// [window]
/// page_size = 200
/// max_loaded_pages = 12
///
/// [spatial]
/// tolerance_px = 4.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    pub window: WindowConfig,
    pub spatial: SpatialConfig,
}

impl MosaicConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: MosaicConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        if !self.spatial.tolerance_px.is_finite()
            || self.spatial.tolerance_px < 0.0
        {
            return Err(MosaicError::InvalidConfig(
                "tolerance_px must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
