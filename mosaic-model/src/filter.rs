use chrono::NaiveDate;

use crate::asset::Asset;
use crate::error::{ModelError, Result};
use crate::ids::CollectionId;
use crate::media_kind::{MarkingStatus, MediaKind};

/// Inclusive calendar-date range, compared against an asset's capture date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ModelError::InvalidRange(format!(
                "{end} is before {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// How a grid view populates itself for a given filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Sparse, page-by-page loading with eviction
    Paged,
    /// One dense fetch of the whole result set
    Grouped,
}

/// Browsing filter for the media grid.
///
/// The filter is treated as an opaque key by the cache: any change to any
/// field invalidates everything loaded under the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssetFilter {
    pub media_kind: Option<MediaKind>,
    pub date_range: Option<DateRange>,
    pub volume: Option<String>,
    pub path_prefix: Option<String>,
    pub collection: Option<CollectionId>,
    pub marking: Option<MarkingStatus>,
    /// All listed tags must be present on a matching asset
    pub tags: Vec<String>,
    pub group_by_date: bool,
}

impl AssetFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn load_mode(&self) -> LoadMode {
        if self.group_by_date {
            LoadMode::Grouped
        } else {
            LoadMode::Paged
        }
    }

    pub fn with_media_kind(mut self, kind: MediaKind) -> Self {
        self.media_kind = Some(kind);
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = Some(volume.into());
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn grouped_by_date(mut self) -> Self {
        self.group_by_date = true;
        self
    }

    /// Whether `asset` belongs to this filter's result set.
    pub fn matches(&self, asset: &Asset) -> bool {
        if let Some(kind) = self.media_kind
            && asset.kind != kind
        {
            return false;
        }
        if let Some(range) = &self.date_range {
            match asset.captured_at {
                Some(at) if range.contains(at.date_naive()) => {}
                _ => return false,
            }
        }
        if let Some(volume) = &self.volume
            && &asset.volume != volume
        {
            return false;
        }
        if let Some(prefix) = &self.path_prefix
            && !asset.path.starts_with(prefix.as_str())
        {
            return false;
        }
        if let Some(collection) = self.collection
            && asset.collection != Some(collection)
        {
            return false;
        }
        if let Some(marking) = self.marking
            && asset.marking != marking
        {
            return false;
        }
        self.tags.iter().all(|tag| asset.has_tag(tag))
    }
}
