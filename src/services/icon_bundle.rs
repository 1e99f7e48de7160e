use std::io::Cursor;
use std::path::{Path, PathBuf};

use reqwest::Client as HttpClient;
use thiserror::Error;
use tracing::info;
use zip::ZipArchive;

use crate::api::error::handle_error_response;
use crate::api::ApiError;
use crate::models::ReferenceIcon;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("unable to download icon bundle: {0}")]
    Download(#[from] ApiError),
    #[error("failed to unzip icon bundle: {0}")]
    Extract(#[from] zip::result::ZipError),
    #[error("icon bundle IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("icon bundle index is invalid: {0}")]
    Index(#[from] serde_json::Error),
}

impl BundleError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// An extracted icon bundle: a `manifest.json` index plus `svg/color/<symbol>.svg` files
#[derive(Debug)]
pub struct IconBundle {
    root: PathBuf,
    icons: Vec<ReferenceIcon>,
}

impl IconBundle {
    /// Top-level directory inside the archive
    pub const ROOT_DIR: &'static str = "cryptocurrency-icons-master";

    /// Download the archive at `url`, unpack it below `scratch_dir` and load its index
    pub async fn download(http: &HttpClient, url: &str, scratch_dir: &Path) -> Result<Self, BundleError> {
        info!("Downloading icon bundle from {}", url);

        let response = http.get(url).send().await.map_err(ApiError::from)?;
        if !response.status().is_success() {
            return Err(handle_error_response(response).await.into());
        }
        let archive = response.bytes().await.map_err(ApiError::from)?;

        let dest = scratch_dir.to_path_buf();
        tokio::task::spawn_blocking(move || extract_archive(&archive, &dest))
            .await
            .map_err(|e| BundleError::io(scratch_dir, std::io::Error::other(e)))??;

        Self::open(scratch_dir.join(Self::ROOT_DIR)).await
    }

    /// Load an already extracted bundle
    pub async fn open(root: PathBuf) -> Result<Self, BundleError> {
        let index_path = root.join("manifest.json");
        let raw = tokio::fs::read(&index_path)
            .await
            .map_err(|e| BundleError::io(&index_path, e))?;
        let icons: Vec<ReferenceIcon> = serde_json::from_slice(&raw)?;

        info!("Loaded {} reference icons", icons.len());
        Ok(Self { root, icons })
    }

    pub fn icons(&self) -> &[ReferenceIcon] {
        &self.icons
    }

    /// Location of the colored SVG for a symbol
    pub fn svg_path(&self, symbol: &str) -> PathBuf {
        self.root
            .join("svg")
            .join("color")
            .join(format!("{}.svg", symbol.to_lowercase()))
    }
}

/// Unpack a zip archive held in memory into `dest`
pub fn extract_archive(archive: &[u8], dest: &Path) -> Result<(), BundleError> {
    std::fs::create_dir_all(dest).map_err(|e| BundleError::io(dest, e))?;
    let mut zip = ZipArchive::new(Cursor::new(archive))?;
    zip.extract(dest)?;
    Ok(())
}
