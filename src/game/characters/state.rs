// Character facing, walking steps, and pose

use glam::Vec2;
use std::ops::Index;

/// Which way a character is facing. South faces the camera.
///
/// ```text
///          North (back, up)
///                ^
///                |
/// West  <--- character --->  East
///                |
///                v
///          South (front, down)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    North,
    East,
    #[default]
    South,
    West,
}

impl Direction {
    pub const COUNT: usize = 4;
    pub const ALL: [Direction; Direction::COUNT] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Unit vector pointing this way in world space (y up)
    pub fn unit_vector(self) -> Vec2 {
        match self {
            Direction::North => Vec2::Y,
            Direction::East => Vec2::X,
            Direction::South => Vec2::NEG_Y,
            Direction::West => Vec2::NEG_X,
        }
    }
}

/// A value for every direction
///
/// Indexing with a `Direction` can never miss, so tables keyed this way need
/// no runtime bounds handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionTable<T>([T; Direction::COUNT]);

impl<T> DirectionTable<T> {
    /// Build a table in `Direction::ALL` order: north, east, south, west
    pub const fn new(north: T, east: T, south: T, west: T) -> Self {
        Self([north, east, south, west])
    }

    /// Build a table by evaluating `f` for each direction in order,
    /// stopping at the first error
    pub fn try_from_fn<E>(mut f: impl FnMut(Direction) -> Result<T, E>) -> Result<Self, E> {
        let [north, east, south, west] = Direction::ALL;
        Ok(Self::new(f(north)?, f(east)?, f(south)?, f(west)?))
    }
}

impl<T> Index<Direction> for DirectionTable<T> {
    type Output = T;

    fn index(&self, direction: Direction) -> &T {
        &self.0[direction.index()]
    }
}

/// Alternating walking frame. `Right` is also the standing pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    Right,
    Left,
}

impl Step {
    pub const COUNT: usize = 2;

    /// Pose used when standing still
    pub const REST: Step = Step::Right;

    pub(crate) fn index(self) -> usize {
        match self {
            Step::Right => 0,
            Step::Left => 1,
        }
    }
}

/// Everything needed to draw a character this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPose {
    /// Position in world units
    pub position: Vec2,
    pub facing: Direction,
    pub step: Step,
}

impl CharacterPose {
    /// Standing at `position`, facing the camera
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            facing: Direction::South,
            step: Step::REST,
        }
    }
}
