// Character animation: facing, step cycling, and movement

use super::state::{CharacterPose, Direction, Step};
use super::stats::{AnimationMode, MovementStats};
use crate::core::math::{fract, round_half_up};

/// Drives a character's pose from direction intent and elapsed time
///
/// The walk cycle is tracked as a continuously growing phase. The fractional
/// part of the phase, rounded half-up, picks the step: below one half is
/// `Right`, one half and above is `Left`. That gives two step changes per
/// phase unit.
#[derive(Debug, Clone)]
pub struct CharacterAnimator {
    pose: CharacterPose,
    raw_step_phase: f64,
    stats: MovementStats,
}

impl CharacterAnimator {
    /// Create an animator standing at the configured start location
    pub fn new(stats: MovementStats) -> Self {
        Self {
            pose: CharacterPose::at(stats.start_location),
            raw_step_phase: 0.0,
            stats,
        }
    }

    /// Face `direction`, advance the walk cycle and move for `dt` seconds
    pub fn advance(&mut self, direction: Direction, dt: f32) {
        debug_assert!(dt >= 0.0, "delta time must be non-negative");

        self.pose.facing = direction;

        self.raw_step_phase += self.stats.steps_per_second * dt as f64;
        self.pose.step = step_for_phase(self.raw_step_phase);

        self.pose.position += direction.unit_vector() * self.stats.speed[direction] * dt;
    }

    /// Face `direction` in place, back in the standing pose
    ///
    /// Position and walk phase are left alone, so walking resumes where it
    /// stopped.
    pub fn turn_only(&mut self, direction: Direction) {
        self.pose.facing = direction;
        self.pose.step = Step::REST;
    }

    /// Apply one tick of input
    ///
    /// No intent means the character is not moving and the pose is kept.
    pub fn update(&mut self, intent: Option<Direction>, dt: f32) {
        let Some(direction) = intent else {
            return;
        };

        match self.stats.mode {
            AnimationMode::FacingOnly => self.turn_only(direction),
            AnimationMode::Stepping => self.advance(direction, dt),
        }
    }

    pub fn pose(&self) -> &CharacterPose {
        &self.pose
    }
}

fn step_for_phase(phase: f64) -> Step {
    if round_half_up(fract(phase)) >= 1.0 {
        Step::Left
    } else {
        Step::Right
    }
}
