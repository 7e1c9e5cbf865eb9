//! Error types for the placement core.

use thiserror::Error;

use crate::ids::ObjectId;

#[derive(Debug, Error)]
pub enum PlacementError {
    /// Texture or material could not be acquired. Spawning carries on
    /// without it.
    #[error("failed to load resource '{resource}': {reason}")]
    ResourceLoad { resource: String, reason: String },

    #[error("unknown object: {0}")]
    UnknownObject(ObjectId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlacementError {
    pub fn resource_load(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, PlacementError>;
