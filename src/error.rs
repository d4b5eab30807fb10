//! Scene error types

use thiserror::Error;

use crate::sim::StoreId;

#[derive(Debug, Error)]
pub enum SceneError {
    /// A room entry named a store the store→room table does not contain
    #[error("store {0} has no room mapping")]
    UnmappedStore(StoreId),
    #[error("invalid scene config: {0}")]
    InvalidConfig(String),
    #[error("failed to parse scene config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("failed to read scene config: {0}")]
    ConfigIo(#[from] std::io::Error),
}
