use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{checked_path, decode_image_bytes, warn_image_load_once, AssetError, AssetProvider};
use crate::app::Image;

/// Assets held in memory. Images may be registered already decoded or as
/// encoded file bytes.
#[derive(Debug)]
pub struct MemoryAssetProvider {
    images: HashMap<String, Arc<Image>>,
    files: HashMap<String, Vec<u8>>,
    warned_image_paths: HashSet<String>,
    placeholder: Arc<Image>,
}

impl Default for MemoryAssetProvider {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
            files: HashMap::new(),
            warned_image_paths: HashSet::new(),
            placeholder: Arc::new(Image::placeholder()),
        }
    }
}

impl MemoryAssetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, path: impl Into<String>, image: Image) {
        self.images.insert(path.into(), Arc::new(image));
    }

    pub fn insert_file(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn with_image(mut self, path: impl Into<String>, image: Image) -> Self {
        self.insert_image(path, image);
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert_file(path, bytes);
        self
    }

    fn file_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let checked = checked_path(path)?;
        self.files
            .get(checked)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            })
    }
}

impl AssetProvider for MemoryAssetProvider {
    fn load_image(&mut self, path: &str) -> Arc<Image> {
        if let Some(image) = self.images.get(path) {
            return Arc::clone(image);
        }
        let loaded = self
            .file_bytes(path)
            .and_then(|bytes| decode_image_bytes(path, &bytes));
        match loaded {
            Ok(image) => {
                let image = Arc::new(image);
                self.images.insert(path.to_string(), Arc::clone(&image));
                image
            }
            Err(error) => {
                warn_image_load_once(&mut self.warned_image_paths, path, None, &error);
                Arc::clone(&self.placeholder)
            }
        }
    }

    fn load_map_description(&mut self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.file_bytes(path)
    }

    fn load_sound(&mut self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.file_bytes(path)
    }
}
