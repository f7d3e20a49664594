// Game layer: the overworld and the player walking on it

pub mod characters;
pub mod config;
pub mod world;

use crate::engine::assets::ImageSource;
use crate::engine::input::{Action, InputManager};
use crate::engine::renderer::{Camera, DrawTarget};
use anyhow::Result;
use characters::{CharacterSheet, Direction, MovementStats, Player};
use config::{DisplayConfig, OverworldConfig};
use glam::Vec2;
use std::sync::Arc;
use world::WorldCompositor;

/// Direction a movement action walks in
pub fn direction_for(action: Action) -> Option<Direction> {
    match action {
        Action::MoveNorth => Some(Direction::North),
        Action::MoveEast => Some(Direction::East),
        Action::MoveSouth => Some(Direction::South),
        Action::MoveWest => Some(Direction::West),
        Action::Quit => None,
    }
}

/// All game state, updated and drawn once per frame
pub struct Game {
    display: DisplayConfig,
    world: WorldCompositor,
    player: Player,
    input: InputManager,
}

impl Game {
    /// Load the player and prepare the overworld
    ///
    /// The overworld is only built the first time it is drawn.
    pub fn new(
        source: Arc<dyn ImageSource>,
        display: DisplayConfig,
        overworld: OverworldConfig,
        sheet: &CharacterSheet,
        stats: MovementStats,
    ) -> Result<Self> {
        let player = Player::new(source.as_ref(), sheet, stats)?;
        let world = WorldCompositor::new(source, overworld, display.world_to_display());

        Ok(Self {
            display,
            world,
            player,
            input: InputManager::new(),
        })
    }

    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// Whether the player asked to leave
    pub fn quit_requested(&self) -> bool {
        self.input.just_pressed(Action::Quit)
    }

    /// Advance the game by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let intent = self.input.movement().and_then(direction_for);
        self.player.update(intent, dt);
    }

    /// Centre the camera on the player and apply wheel zoom
    pub fn update_camera(&mut self, camera: &mut Camera) {
        let scroll = self.input.take_scroll();
        if scroll != 0.0 {
            camera.zoom_by(self.display.zoom_step.powf(scroll));
        }
        camera.look_at(self.player_on_display());
    }

    /// Clear per-frame input state; call after the frame is drawn
    pub fn end_frame(&mut self) {
        self.input.update();
    }

    /// Player position in display pixels
    pub fn player_on_display(&self) -> Vec2 {
        self.display
            .world_to_display()
            .transform_point2(self.player.pose().position)
    }

    /// Draw the world, then the player on top
    pub fn draw(&self, target: &mut dyn DrawTarget) -> Result<()> {
        self.world.draw_world(target)?;
        self.player.draw_character(target, &self.display);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{AssetError, AtlasImage, AtlasRegion};
    use crate::engine::renderer::{Sprite, SpriteBatch};
    use approx::assert_relative_eq;
    use characters::LINK_SHEET;
    use config::MAP_CELL_SIZE;
    use glam::{Affine2, UVec2};
    use image::RgbaImage;

    /// Blank atlases big enough for the character frames and a 1x1 map sheet
    struct BlankSource;

    impl ImageSource for BlankSource {
        fn load_image(&self, name: &str) -> Result<AtlasImage, AssetError> {
            let size = if name == OverworldConfig::default().atlas {
                UVec2::new(MAP_CELL_SIZE.x + 1, 181 + MAP_CELL_SIZE.y + 1)
            } else {
                UVec2::new(400, 300)
            };
            Ok(AtlasImage::new(name, RgbaImage::new(size.x, size.y)))
        }
    }

    #[derive(Default)]
    struct RecordingTarget {
        calls: Vec<&'static str>,
    }

    impl DrawTarget for RecordingTarget {
        fn draw_batch(&mut self, _batch: &SpriteBatch) {
            self.calls.push("batch");
        }

        fn draw_sprite(&mut self, sprite: &Sprite, _transform: Affine2) {
            assert_eq!(sprite.region(), AtlasRegion::new(1, 283, 16, 16));
            self.calls.push("sprite");
        }
    }

    fn game(stats: MovementStats) -> Game {
        Game::new(
            Arc::new(BlankSource),
            DisplayConfig::default(),
            OverworldConfig::default(),
            &LINK_SHEET,
            stats,
        )
        .unwrap()
    }

    #[test]
    fn test_direction_for_actions() {
        assert_eq!(direction_for(Action::MoveNorth), Some(Direction::North));
        assert_eq!(direction_for(Action::MoveWest), Some(Direction::West));
        assert_eq!(direction_for(Action::Quit), None);
    }

    #[test]
    fn test_world_built_on_first_draw() {
        let game = game(MovementStats::default());
        assert!(!game.world.is_built());

        let mut target = RecordingTarget::default();
        game.draw(&mut target).unwrap();

        assert!(game.world.is_built());
        assert_eq!(target.calls, vec!["batch", "sprite"]);
    }

    #[test]
    fn test_held_key_walks_player() {
        let mut game = game(MovementStats::default());
        let start = game.player.pose().position;

        game.input_mut().press(Action::MoveEast);
        game.update(0.5);

        assert_eq!(game.player.pose().facing, Direction::East);
        assert_relative_eq!(game.player.pose().position.x, start.x + 50.0);
    }

    #[test]
    fn test_no_keys_keeps_player_still() {
        let mut game = game(MovementStats::default());
        let pose = *game.player.pose();

        game.update(1.0);

        assert_eq!(*game.player.pose(), pose);
    }

    #[test]
    fn test_camera_follows_player_and_zooms() {
        let mut game = game(MovementStats::default());
        let mut camera = Camera::new(Vec2::ZERO, 1024.0, 768.0);

        game.input_mut().process_mouse_wheel(winit::event::MouseScrollDelta::LineDelta(0.0, 1.0));
        game.update_camera(&mut camera);

        // Start location (2048, 176) at the default 2.5 scale
        assert_relative_eq!(camera.position.x, 5120.0);
        assert_relative_eq!(camera.position.y, 440.0);
        assert_relative_eq!(camera.zoom, 1.2);
    }

    #[test]
    fn test_quit_requested_for_one_frame() {
        let mut game = game(MovementStats::default());
        game.input_mut().press(Action::Quit);
        assert!(game.quit_requested());

        game.end_frame();
        assert!(!game.quit_requested());
    }
}
