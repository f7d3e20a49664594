// Input manager - turns window events into actions for the game

use super::action::{default_bindings, Action, InputSource};
use std::collections::{HashMap, HashSet};
use winit::event::{ElementState, KeyEvent, MouseScrollDelta};
use winit::keyboard::PhysicalKey;

/// Pixel-precise scroll deltas are converted to "lines" at this rate
const PIXELS_PER_SCROLL_LINE: f64 = 40.0;

/// Keyboard and mouse-wheel state for the local player
#[derive(Debug)]
pub struct InputManager {
    /// Mapping from input sources to actions
    bindings: HashMap<InputSource, Action>,

    /// Held movement actions, most recently pressed last
    held_movement: Vec<Action>,

    /// Actions that were just pressed this frame
    just_pressed: HashSet<Action>,

    /// Wheel movement accumulated since the last `take_scroll`
    scroll: f32,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Create an input manager with the default key bindings
    pub fn new() -> Self {
        Self::from_bindings(default_bindings())
    }

    /// Create an input manager from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            held_movement: Vec::with_capacity(4),
            just_pressed: HashSet::new(),
            scroll: 0.0,
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };

        let Some(&action) = self.bindings.get(&InputSource::key(key_code)) else {
            return;
        };

        match event.state {
            ElementState::Pressed => {
                if !event.repeat {
                    self.press(action);
                }
            }
            ElementState::Released => self.release(action),
        }
    }

    /// Process a mouse wheel event from winit
    pub fn process_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_SCROLL_LINE) as f32,
        };
    }

    /// Register an action press
    pub(crate) fn press(&mut self, action: Action) {
        self.just_pressed.insert(action);

        if action.is_movement() {
            self.held_movement.retain(|a| *a != action);
            self.held_movement.push(action);
        }
    }

    /// Register an action release
    pub(crate) fn release(&mut self, action: Action) {
        self.held_movement.retain(|a| *a != action);
    }

    /// Call once per frame after the frame's events have been consumed
    pub fn update(&mut self) {
        self.just_pressed.clear();
    }

    /// The movement the player is asking for, if any
    ///
    /// When several direction keys are held, the one pressed last wins.
    pub fn movement(&self) -> Option<Action> {
        self.held_movement.last().copied()
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Wheel movement since the last call, in lines (positive = away from the user)
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    /// Forget every held key, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.held_movement.clear();
        self.just_pressed.clear();
        self.scroll = 0.0;
    }
}
