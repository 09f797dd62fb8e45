use mosaic_model::AssetId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Asset not found: {0}")]
    NotFound(AssetId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MosaicError>;
