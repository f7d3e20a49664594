// Overworld map
//
// The whole map sheet is baked once into a single static batch and drawn
// with one call every frame.

pub mod overworld;

pub use overworld::WorldCompositor;

use crate::engine::assets::{AssetError, GeometryError};
use thiserror::Error;

/// Why the world composite could not be built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    #[error("Failed to load overworld atlas: {0}")]
    Asset(#[from] AssetError),

    #[error("Overworld atlas does not match its grid: {0}")]
    Geometry(#[from] GeometryError),
}
