use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::{checked_path, decode_image_bytes, warn_image_load_once, AssetError, AssetProvider};
use crate::app::Image;

/// Reads assets from below a root directory. Decoded images are cached per
/// path, including the placeholder handed out for a failed path.
#[derive(Debug)]
pub struct FsAssetProvider {
    root: PathBuf,
    image_cache: HashMap<String, Arc<Image>>,
    warned_image_paths: HashSet<String>,
    placeholder: Arc<Image>,
}

impl FsAssetProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            image_cache: HashMap::new(),
            warned_image_paths: HashSet::new(),
            placeholder: Arc::new(Image::placeholder()),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, AssetError> {
        let checked = checked_path(path)?;
        Ok(self.root.join(checked))
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let resolved = self.resolve(path)?;
        fs::read(&resolved).map_err(|source| AssetError::Read {
            path: resolved,
            source,
        })
    }
}

impl AssetProvider for FsAssetProvider {
    fn load_image(&mut self, path: &str) -> Arc<Image> {
        if let Some(cached) = self.image_cache.get(path) {
            return Arc::clone(cached);
        }

        let resolved = self.resolve(path).ok();
        let loaded = self
            .read_bytes(path)
            .and_then(|bytes| decode_image_bytes(path, &bytes));
        let image = match loaded {
            Ok(image) => {
                debug!(
                    asset_path = path,
                    width = image.width(),
                    height = image.height(),
                    "asset_image_loaded"
                );
                Arc::new(image)
            }
            Err(error) => {
                warn_image_load_once(
                    &mut self.warned_image_paths,
                    path,
                    resolved.as_deref(),
                    &error,
                );
                Arc::clone(&self.placeholder)
            }
        };
        self.image_cache.insert(path.to_string(), Arc::clone(&image));
        image
    }

    fn load_map_description(&mut self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.read_bytes(path)
    }

    fn load_sound(&mut self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.read_bytes(path)
    }
}
