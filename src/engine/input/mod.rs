// Input handling
//
// - `action`: game actions and default key bindings
// - `manager`: tracks held keys and wheel movement between frames
//
// Direction keys are resolved "last pressed wins", so holding Up and then
// tapping Right turns east and falls back to north on release.

pub mod action;
pub mod manager;

pub use action::Action;
pub use manager::InputManager;
