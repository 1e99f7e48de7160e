use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::icon_bundle::BundleError;

/// Failures that abort a whole collection run
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to get cryptocurrency data: {0}")]
    Listings(ApiError),
    #[error("Icon bundle unavailable: {0}")]
    IconBundle(#[from] BundleError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CollectorError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
