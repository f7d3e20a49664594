// Game action definitions and mappings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveNorth,
    MoveEast,
    MoveSouth,
    MoveWest,

    // Meta actions
    Quit,
}

impl Action {
    /// Whether this action steers the player
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            Action::MoveNorth | Action::MoveEast | Action::MoveSouth | Action::MoveWest
        )
    }
}

/// Represents an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings: arrow keys and WASD both walk
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowUp), Action::MoveNorth),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveEast),
        (InputSource::key(KeyCode::ArrowDown), Action::MoveSouth),
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveWest),
        (InputSource::key(KeyCode::KeyW), Action::MoveNorth),
        (InputSource::key(KeyCode::KeyD), Action::MoveEast),
        (InputSource::key(KeyCode::KeyS), Action::MoveSouth),
        (InputSource::key(KeyCode::KeyA), Action::MoveWest),
        (InputSource::key(KeyCode::Escape), Action::Quit),
    ]
}
