// Movement and animation settings for the player character

use super::state::DirectionTable;
use crate::game::config::MAP_CELL_SIZE;
use glam::Vec2;

/// How much of the walk cycle the character plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    /// Direction input only turns the character in place
    FacingOnly,
    /// Direction input turns, walks, and alternates steps
    #[default]
    Stepping,
}

/// Movement tuning for the player character
#[derive(Debug, Clone, PartialEq)]
pub struct MovementStats {
    /// Walking speed in each direction (world units/second)
    pub speed: DirectionTable<f32>,
    /// Step changes per second while walking, counted in right/left pairs
    pub steps_per_second: f64,
    /// Where the character stands when the game starts
    pub start_location: Vec2,
    pub mode: AnimationMode,
}

/// Centre of the 8th map on the bottom row of the overworld
pub const START_LOCATION: Vec2 = Vec2::new(MAP_CELL_SIZE.x as f32 * 8.0, MAP_CELL_SIZE.y as f32);

pub const BASE_STATS: MovementStats = MovementStats {
    speed: DirectionTable::new(100.0, 100.0, 100.0, 100.0),
    steps_per_second: 4.0,
    start_location: START_LOCATION,
    mode: AnimationMode::Stepping,
};

impl Default for MovementStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl MovementStats {
    pub fn with_mode(mut self, mode: AnimationMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::state::Direction;

    #[test]
    fn test_default_stats() {
        let stats = MovementStats::default();
        for direction in Direction::ALL {
            assert_eq!(stats.speed[direction], 100.0);
        }
        assert_eq!(stats.steps_per_second, 4.0);
        assert_eq!(stats.mode, AnimationMode::Stepping);
    }

    #[test]
    fn test_start_location() {
        assert_eq!(START_LOCATION, Vec2::new(2048.0, 176.0));
    }

    #[test]
    fn test_with_mode_keeps_other_settings() {
        let stats = MovementStats::default().with_mode(AnimationMode::FacingOnly);

        assert_eq!(stats.mode, AnimationMode::FacingOnly);
        assert_eq!(stats.start_location, START_LOCATION);
        assert_eq!(stats.speed, BASE_STATS.speed);
    }
}
