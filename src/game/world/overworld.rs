// Overworld compositor

use super::WorldError;
use crate::engine::assets::{slice_grid, ImageSource, TileGridSpec};
use crate::engine::renderer::{DrawTarget, SpriteBatch};
use crate::game::config::OverworldConfig;
use glam::{Affine2, UVec2};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Every map of the overworld placed into one static batch
#[derive(Debug)]
pub struct WorldComposite {
    batch: SpriteBatch,
}

/// Builds the overworld composite on first use and keeps it for good
///
/// The first caller of [`get_composite`](Self::get_composite) loads and
/// slices the atlas; concurrent callers wait for that build and every caller
/// sees the same composite. A failed build is kept too and reported to every
/// later caller without loading again.
pub struct WorldCompositor {
    source: Arc<dyn ImageSource>,
    config: OverworldConfig,
    world_to_display: Affine2,
    composite: OnceCell<Result<WorldComposite, WorldError>>,
}

impl WorldCompositor {
    pub fn new(
        source: Arc<dyn ImageSource>,
        config: OverworldConfig,
        world_to_display: Affine2,
    ) -> Self {
        Self {
            source,
            config,
            world_to_display,
            composite: OnceCell::new(),
        }
    }

    /// The baked overworld, building it if this is the first call
    pub fn get_composite(&self) -> Result<&WorldComposite, WorldError> {
        self.composite
            .get_or_init(|| {
                let result = self.build();
                if let Err(e) = &result {
                    error!("Overworld unavailable: {}", e);
                }
                result
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether the first build has already happened
    #[cfg(test)]
    pub fn is_built(&self) -> bool {
        self.composite.get().is_some()
    }

    pub fn draw_world(&self, target: &mut dyn DrawTarget) -> Result<(), WorldError> {
        target.draw_batch(&self.get_composite()?.batch);
        Ok(())
    }

    /// Transform placing the centre of grid cell (column, row)
    ///
    /// The margin shifts every map so that empty sea surrounds the sheet.
    fn cell_transform(&self, column: u32, row: u32) -> Affine2 {
        let cell = UVec2::new(column, row) + UVec2::splat(self.config.margin);
        let centre = (cell * self.config.cell_size).as_vec2();
        self.world_to_display * Affine2::from_translation(centre)
    }

    fn build(&self) -> Result<WorldComposite, WorldError> {
        let config = &self.config;
        let atlas = Arc::new(self.source.load_image(config.atlas)?);

        let grid = TileGridSpec::fit(atlas.size(), config.cell_size, config.border, config.footer)?;
        let regions = slice_grid(atlas.size(), &grid);

        let mut batch = SpriteBatch::with_capacity(atlas.clone(), grid.cell_count());
        for ((column, row), region) in grid.cells().zip(regions) {
            batch.push_region(region, self.cell_transform(column, row));
        }

        info!(
            "Overworld composite built: {} maps ({} columns x {} rows) from {}",
            batch.sprite_count(),
            grid.columns(),
            grid.rows(),
            atlas.name()
        );

        Ok(WorldComposite { batch })
    }
}
