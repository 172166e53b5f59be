//! Video errors

use fos_dom::NodeId;

/// Errors surfaced by the video manager
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    /// The video was never registered (or was already unregistered)
    #[error("Video {0} is not registered")]
    NotRegistered(NodeId),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid docking config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid docking config: {0}")]
    Invalid(String),
}
