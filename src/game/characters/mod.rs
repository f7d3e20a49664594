// Player character
//
// - Direction and step enums plus the pose they make up
// - Movement tuning
// - Animator driving the pose from input and time
// - Sprite table and drawing

pub mod animation;
pub mod character;
pub mod state;
pub mod stats;

pub use character::{CharacterSheet, Player, LINK_SHEET};
pub use state::Direction;
pub use stats::{AnimationMode, MovementStats};
