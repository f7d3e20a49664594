// Asset loading functionality

use super::{AssetError, AtlasImage};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Anything that can produce decoded atlas images by name
///
/// The game only ever talks to this trait, so tests can substitute an
/// in-memory source and count how often images are decoded.
pub trait ImageSource: Send + Sync {
    fn load_image(&self, name: &str) -> Result<AtlasImage, AssetError>;
}

/// Asset loader responsible for finding and decoding image files
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve_path(name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        std::fs::read(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", name, e)))
    }
}

impl ImageSource for AssetLoader {
    fn load_image(&self, name: &str) -> Result<AtlasImage, AssetError> {
        let bytes = self.load_bytes(name)?;
        debug!("Decoding {} ({} bytes)", name, bytes.len());

        let pixels = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::Decode {
                name: name.to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();

        info!(
            "Loaded atlas {}: {}x{}",
            name,
            pixels.width(),
            pixels.height()
        );

        Ok(AtlasImage::new(name, pixels))
    }
}
