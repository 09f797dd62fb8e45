use crate::error::ModelError;
use uuid::Uuid;

/// Strongly typed ID for assets in the local store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetId(pub Uuid);

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetId {
    pub fn new() -> Self {
        AssetId(Uuid::now_v7())
    }

    pub fn parse_str(id: &str) -> Result<Self, ModelError> {
        if id.is_empty() {
            return Err(ModelError::InvalidId(
                "Asset ID cannot be empty".to_string(),
            ));
        }
        Uuid::parse_str(id)
            .map(AssetId)
            .map_err(|err| ModelError::InvalidId(format!("{id}: {err}")))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for AssetId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AssetId {
    fn from(value: Uuid) -> Self {
        AssetId(value)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for user collections (albums)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionId(pub Uuid);

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionId {
    pub fn new() -> Self {
        CollectionId(Uuid::now_v7())
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_and_garbage() {
        assert!(AssetId::parse_str("").is_err());
        assert!(AssetId::parse_str("not-a-uuid").is_err());

        let id = AssetId::new();
        let parsed = AssetId::parse_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }
}
