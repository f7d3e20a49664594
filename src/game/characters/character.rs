// Player character: sprite table, animation, and drawing

use super::animation::CharacterAnimator;
use super::state::{CharacterPose, Direction, DirectionTable, Step};
use super::stats::MovementStats;
use crate::engine::assets::{AssetError, AtlasImage, AtlasRegion, GeometryError, ImageSource};
use crate::engine::renderer::{DrawTarget, Sprite};
use crate::game::config::{DisplayConfig, SPRITE_SIZE};
use anyhow::{Context, Result};
use glam::{Affine2, UVec2};
use log::info;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CharacterError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Which of the two character sheets a pose is cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSide {
    Normal,
    /// The sheet flipped about its vertical axis
    Mirrored,
}

/// Where the two walking frames for one direction sit on a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionFrames {
    pub side: SheetSide,
    /// Bottom-left corner of each frame, indexed by `Step`
    pub steps: [UVec2; Step::COUNT],
}

impl DirectionFrames {
    /// Right and left frames on the walking row, by x offset
    const fn walking(side: SheetSide, right_x: u32, left_x: u32) -> Self {
        Self {
            side,
            steps: [UVec2::new(right_x, WALK_ROW), UVec2::new(left_x, WALK_ROW)],
        }
    }
}

/// Layout of a character's walking frames
#[derive(Debug, Clone)]
pub struct CharacterSheet {
    pub atlas: &'static str,
    /// Same art flipped horizontally; the source has no west-facing frames
    pub mirrored_atlas: &'static str,
    pub sprite_size: UVec2,
    pub frames: DirectionTable<DirectionFrames>,
}

const WALK_ROW: u32 = 283;

pub const LINK_SHEET: CharacterSheet = CharacterSheet {
    atlas: "NES-TheLegendOfZelda-Link.png",
    mirrored_atlas: "NES-TheLegendOfZelda-Link-FlippedHorizontally.png",
    sprite_size: SPRITE_SIZE,
    frames: DirectionTable::new(
        DirectionFrames::walking(SheetSide::Normal, 69, 86),
        DirectionFrames::walking(SheetSide::Normal, 35, 52),
        DirectionFrames::walking(SheetSide::Normal, 1, 18),
        DirectionFrames::walking(SheetSide::Mirrored, 320, 303),
    ),
};

impl Default for CharacterSheet {
    fn default() -> Self {
        LINK_SHEET
    }
}

/// A sprite for every (direction, step) pair
#[derive(Debug, Clone)]
pub struct SpriteTable(DirectionTable<[Sprite; Step::COUNT]>);

impl SpriteTable {
    /// Load both sheets once and cut every frame out of them
    ///
    /// Fails if either sheet cannot be loaded or any frame falls outside
    /// its sheet, so a table that exists is always complete.
    pub fn load(source: &dyn ImageSource, sheet: &CharacterSheet) -> Result<Self, CharacterError> {
        let normal = Arc::new(source.load_image(sheet.atlas)?);
        let mirrored = Arc::new(source.load_image(sheet.mirrored_atlas)?);

        Self::from_atlases(&normal, &mirrored, sheet)
    }

    pub fn from_atlases(
        normal: &Arc<AtlasImage>,
        mirrored: &Arc<AtlasImage>,
        sheet: &CharacterSheet,
    ) -> Result<Self, CharacterError> {
        let table = DirectionTable::try_from_fn(|direction| {
            let frames = sheet.frames[direction];
            let atlas = match frames.side {
                SheetSide::Normal => normal,
                SheetSide::Mirrored => mirrored,
            };

            let cut = |corner: UVec2| {
                Sprite::new(
                    atlas.clone(),
                    AtlasRegion::sprite(corner.x, corner.y, sheet.sprite_size),
                )
            };

            Ok::<_, GeometryError>([cut(frames.steps[0])?, cut(frames.steps[1])?])
        })?;

        Ok(Self(table))
    }

    pub fn get(&self, direction: Direction, step: Step) -> &Sprite {
        &self.0[direction][step.index()]
    }
}

/// The player character
#[derive(Debug)]
pub struct Player {
    animator: CharacterAnimator,
    sprites: SpriteTable,
}

impl Player {
    /// Load the player's sprites and place them at the start location
    ///
    /// A player without sprites cannot be shown, so any load failure is
    /// returned as a startup error.
    pub fn new(
        source: &dyn ImageSource,
        sheet: &CharacterSheet,
        stats: MovementStats,
    ) -> Result<Self> {
        let sprites = SpriteTable::load(source, sheet)
            .with_context(|| format!("Failed to load character sheet {}", sheet.atlas))?;

        info!(
            "Player created at ({}, {}) in {:?} mode",
            stats.start_location.x, stats.start_location.y, stats.mode
        );

        Ok(Self::with_sprites(sprites, stats))
    }

    pub fn with_sprites(sprites: SpriteTable, stats: MovementStats) -> Self {
        Self {
            animator: CharacterAnimator::new(stats),
            sprites,
        }
    }

    /// Apply one tick of input
    pub fn update(&mut self, intent: Option<Direction>, dt: f32) {
        self.animator.update(intent, dt);
    }

    pub fn pose(&self) -> &CharacterPose {
        self.animator.pose()
    }

    /// Sprite for the current facing and step
    pub fn sprite(&self) -> &Sprite {
        let pose = self.animator.pose();
        self.sprites.get(pose.facing, pose.step)
    }

    /// Transform from the sprite's local space to display pixels
    pub fn transform(&self, display: &DisplayConfig) -> Affine2 {
        display.world_to_display() * Affine2::from_translation(self.pose().position)
    }

    pub fn draw_character(&self, target: &mut dyn DrawTarget, display: &DisplayConfig) {
        target.draw_sprite(self.sprite(), self.transform(display));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::renderer::SpriteBatch;
    use glam::Vec2;
    use image::RgbaImage;
    use std::sync::Mutex;

    /// Serves blank images of a fixed size and records what was asked for
    struct BlankSource {
        size: UVec2,
        missing: Option<&'static str>,
        requests: Mutex<Vec<String>>,
    }

    impl BlankSource {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: UVec2::new(width, height),
                missing: None,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl ImageSource for BlankSource {
        fn load_image(&self, name: &str) -> Result<AtlasImage, AssetError> {
            self.requests.lock().unwrap().push(name.to_string());
            if self.missing == Some(name) {
                return Err(AssetError::NotFound(name.to_string()));
            }
            Ok(AtlasImage::new(name, RgbaImage::new(self.size.x, self.size.y)))
        }
    }

    #[derive(Default)]
    struct RecordingTarget {
        sprites: Vec<(AtlasRegion, String, Affine2)>,
    }

    impl DrawTarget for RecordingTarget {
        fn draw_batch(&mut self, _batch: &SpriteBatch) {}

        fn draw_sprite(&mut self, sprite: &Sprite, transform: Affine2) {
            self.sprites
                .push((sprite.region(), sprite.atlas().name().to_string(), transform));
        }
    }

    fn player(stats: MovementStats) -> Player {
        let source = BlankSource::new(400, 300);
        Player::new(&source, &LINK_SHEET, stats).unwrap()
    }

    #[test]
    fn test_each_sheet_loaded_once() {
        let source = BlankSource::new(400, 300);
        SpriteTable::load(&source, &LINK_SHEET).unwrap();

        let requests = source.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![LINK_SHEET.atlas.to_string(), LINK_SHEET.mirrored_atlas.to_string()]
        );
    }

    #[test]
    fn test_table_covers_every_pose() {
        let source = BlankSource::new(400, 300);
        let table = SpriteTable::load(&source, &LINK_SHEET).unwrap();

        let expected = [
            (Direction::North, Step::Right, 69, LINK_SHEET.atlas),
            (Direction::North, Step::Left, 86, LINK_SHEET.atlas),
            (Direction::East, Step::Right, 35, LINK_SHEET.atlas),
            (Direction::East, Step::Left, 52, LINK_SHEET.atlas),
            (Direction::South, Step::Right, 1, LINK_SHEET.atlas),
            (Direction::South, Step::Left, 18, LINK_SHEET.atlas),
            (Direction::West, Step::Right, 320, LINK_SHEET.mirrored_atlas),
            (Direction::West, Step::Left, 303, LINK_SHEET.mirrored_atlas),
        ];

        for (direction, step, x, atlas) in expected {
            let sprite = table.get(direction, step);
            assert_eq!(sprite.region(), AtlasRegion::new(x, 283, 16, 16));
            assert_eq!(sprite.atlas().name(), atlas);
        }
    }

    #[test]
    fn test_missing_sheet_fails() {
        let mut source = BlankSource::new(400, 300);
        source.missing = Some(LINK_SHEET.mirrored_atlas);

        let err = SpriteTable::load(&source, &LINK_SHEET).unwrap_err();
        assert!(matches!(err, CharacterError::Asset(AssetError::NotFound(_))));
        assert!(Player::new(&source, &LINK_SHEET, MovementStats::default()).is_err());
    }

    #[test]
    fn test_sheet_too_small_fails() {
        // Frames sit at y = 283, so a 300 pixel tall sheet is the minimum
        let source = BlankSource::new(400, 298);
        let err = SpriteTable::load(&source, &LINK_SHEET).unwrap_err();
        assert!(matches!(
            err,
            CharacterError::Geometry(GeometryError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_sprite_follows_pose() {
        let mut player = player(MovementStats::default());
        assert_eq!(player.sprite().region().min(), UVec2::new(1, 283));

        player.update(Some(Direction::West), 0.125);
        assert_eq!(player.pose().step, Step::Left);
        assert_eq!(player.sprite().region().min(), UVec2::new(303, 283));
        assert_eq!(player.sprite().atlas().name(), LINK_SHEET.mirrored_atlas);
    }

    #[test]
    fn test_draw_character_moves_then_scales() {
        let player = player(MovementStats {
            start_location: Vec2::new(10.0, 20.0),
            ..MovementStats::default()
        });
        let display = DisplayConfig::default().with_scale(2.0);

        let mut target = RecordingTarget::default();
        player.draw_character(&mut target, &display);

        assert_eq!(target.sprites.len(), 1);
        let (region, _, transform) = &target.sprites[0];
        assert_eq!(region.min(), UVec2::new(1, 283));
        assert_eq!(transform.transform_point2(Vec2::ZERO), Vec2::new(20.0, 40.0));
        assert_eq!(transform.transform_point2(Vec2::new(1.0, 0.0)), Vec2::new(22.0, 40.0));
    }
}
