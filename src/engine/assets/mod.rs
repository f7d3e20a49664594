// Asset loading and atlas geometry
//
// Images are decoded once into shared `AtlasImage`s; atlas geometry is pure
// and lives alongside so that slicing and loading share one vocabulary.

mod atlas;
mod handle;
mod loader;

pub use atlas::{slice_grid, AtlasImage, AtlasRegion, GeometryError, TileGridSpec};
pub use handle::AssetId;
pub use loader::{AssetLoader, ImageSource};

/// Asset loading errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("Failed to decode image {name}: {reason}")]
    Decode { name: String, reason: String },
}
