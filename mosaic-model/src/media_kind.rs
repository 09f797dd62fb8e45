use std::fmt::{Display, Formatter};

/// Kind of media an asset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MediaKind {
    /// Still image (jpeg, png, heic, ...)
    Image = 0,
    /// Video clip
    Video = 1,
    /// Camera RAW file
    Raw = 2,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "Image"),
            MediaKind::Video => write!(f, "Video"),
            MediaKind::Raw => write!(f, "Raw"),
        }
    }
}

/// Culling state a user has assigned to an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MarkingStatus {
    #[default]
    Unmarked,
    Picked,
    Rejected,
}

impl Display for MarkingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkingStatus::Unmarked => write!(f, "Unmarked"),
            MarkingStatus::Picked => write!(f, "Picked"),
            MarkingStatus::Rejected => write!(f, "Rejected"),
        }
    }
}
