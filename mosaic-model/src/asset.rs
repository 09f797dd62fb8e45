use chrono::{DateTime, Utc};

use crate::ids::{AssetId, CollectionId};
use crate::media_kind::{MarkingStatus, MediaKind};

/// A single media record as returned by the local store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Asset {
    pub id: AssetId,
    pub path: String,
    pub filename: String,
    pub kind: MediaKind,
    /// Mounted volume label the file lives on
    pub volume: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size_bytes: u64,
    pub captured_at: Option<DateTime<Utc>>,
    pub collection: Option<CollectionId>,
    pub marking: MarkingStatus,
    pub tags: Vec<String>,
    pub favorite: bool,
    pub rating: u8,
}

impl Asset {
    /// Build an asset with the required fields; everything else is defaulted.
    pub fn new(
        path: impl Into<String>,
        kind: MediaKind,
        volume: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let filename = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            id: AssetId::new(),
            path,
            filename,
            kind,
            volume: volume.into(),
            width: None,
            height: None,
            size_bytes: 0,
            captured_at: None,
            collection: None,
            marking: MarkingStatus::Unmarked,
            tags: Vec::new(),
            favorite: false,
            rating: 0,
        }
    }

    pub fn with_captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = Some(at);
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_collection(mut self, collection: CollectionId) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn with_marking(mut self, marking: MarkingStatus) -> Self {
        self.marking = marking;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Partial update for an [`Asset`]. Only `Some` fields are merged.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetPatch {
    pub path: Option<String>,
    pub filename: Option<String>,
    pub volume: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub captured_at: Option<DateTime<Utc>>,
    pub collection: Option<Option<CollectionId>>,
    pub marking: Option<MarkingStatus>,
    pub tags: Option<Vec<String>>,
    pub favorite: Option<bool>,
    pub rating: Option<u8>,
}

impl AssetPatch {
    pub fn is_empty(&self) -> bool {
        *self == AssetPatch::default()
    }

    /// Merge the populated fields into `asset`.
    pub fn apply_to(&self, asset: &mut Asset) {
        if let Some(path) = &self.path {
            asset.path.clone_from(path);
        }
        if let Some(filename) = &self.filename {
            asset.filename.clone_from(filename);
        }
        if let Some(volume) = &self.volume {
            asset.volume.clone_from(volume);
        }
        if let Some(width) = self.width {
            asset.width = Some(width);
        }
        if let Some(height) = self.height {
            asset.height = Some(height);
        }
        if let Some(captured_at) = self.captured_at {
            asset.captured_at = Some(captured_at);
        }
        if let Some(collection) = self.collection {
            asset.collection = collection;
        }
        if let Some(marking) = self.marking {
            asset.marking = marking;
        }
        if let Some(tags) = &self.tags {
            asset.tags.clone_from(tags);
        }
        if let Some(favorite) = self.favorite {
            asset.favorite = favorite;
        }
        if let Some(rating) = self.rating {
            asset.rating = rating.min(5);
        }
    }
}

/// One page of a filtered, sorted asset listing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetPage {
    pub items: Vec<Asset>,
    /// Size of the full result set for the filter, not of this page
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_filename_from_path() {
        let asset =
            Asset::new("/photos/2024/IMG_0001.CR3", MediaKind::Raw, "ssd");
        assert_eq!(asset.filename, "IMG_0001.CR3");

        let windows = Asset::new(r"D:\shoot\a.jpg", MediaKind::Image, "d");
        assert_eq!(windows.filename, "a.jpg");
    }

    #[test]
    fn patch_merges_only_populated_fields() {
        let mut asset = Asset::new("/a/b.jpg", MediaKind::Image, "vol")
            .with_tags(["beach"]);
        let patch = AssetPatch {
            marking: Some(MarkingStatus::Picked),
            rating: Some(9),
            ..Default::default()
        };

        patch.apply_to(&mut asset);

        assert_eq!(asset.marking, MarkingStatus::Picked);
        assert_eq!(asset.rating, 5);
        assert_eq!(asset.tags, vec!["beach".to_string()]);
        assert_eq!(asset.path, "/a/b.jpg");
    }

    #[test]
    fn patch_can_clear_collection() {
        let mut asset = Asset::new("/a.jpg", MediaKind::Image, "vol")
            .with_collection(CollectionId::new());
        let patch = AssetPatch {
            collection: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut asset);
        assert!(asset.collection.is_none());
    }
}
