//! Asset lookup used by the game. Images never fail: a missing or broken image
//! comes back as the placeholder and is warned about once per path. Map and
//! sound bytes are returned as errors so the caller decides what is fatal.

mod fs;
mod memory;
mod paths;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::app::{Image, ImageError};

pub use fs::FsAssetProvider;
pub use memory::MemoryAssetProvider;
pub use paths::{resolve_relative, AssetPathError};
pub(crate) use paths::validate_asset_path;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid asset path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: AssetPathError,
    },
    #[error("asset not found: {path}")]
    NotFound { path: String },
    #[error("failed to read asset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("decoded image {path} is unusable: {source}")]
    InvalidImage {
        path: String,
        #[source]
        source: ImageError,
    },
}

pub trait AssetProvider {
    /// Always returns an image; failures yield the shared placeholder.
    fn load_image(&mut self, path: &str) -> Arc<Image>;
    fn load_map_description(&mut self, path: &str) -> Result<Vec<u8>, AssetError>;
    fn load_sound(&mut self, path: &str) -> Result<Vec<u8>, AssetError>;
}

pub(crate) fn checked_path(path: &str) -> Result<&str, AssetError> {
    validate_asset_path(path).map_err(|source| AssetError::InvalidPath {
        path: path.to_string(),
        source,
    })?;
    Ok(path)
}

pub(crate) fn decode_image_bytes(path: &str, bytes: &[u8]) -> Result<Image, AssetError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        path: path.to_string(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    Image::from_rgba(rgba.width(), rgba.height(), rgba.into_raw()).map_err(|source| {
        AssetError::InvalidImage {
            path: path.to_string(),
            source,
        }
    })
}

pub(crate) fn warn_image_load_once(
    warned_paths: &mut HashSet<String>,
    path: &str,
    resolved_path: Option<&Path>,
    error: &AssetError,
) {
    if !warned_paths.insert(path.to_string()) {
        return;
    }
    let path_display = resolved_path
        .map(|resolved| resolved.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        asset_path = path,
        resolved = %path_display,
        error = %error,
        "asset_image_load_failed_using_placeholder"
    );
}
