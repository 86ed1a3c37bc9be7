//! Input management system
//!
//! `InputState` is fed raw key and mouse transitions by whatever platform
//! layer owns the window, and answers "held" and "pressed this frame"
//! questions for the simulation. Call `begin_frame` once per frame before
//! feeding that frame's events.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Digit 1
    Digit1,
    /// Digit 2
    Digit2,
    /// Digit 3
    Digit3,
    /// Space bar
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// F1 function key
    F1,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Per-frame keyboard and mouse state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
    mouse_held: HashSet<MouseButton>,
    mouse_clicked: Vec<(MouseButton, Vec2)>,
    mouse_position: Vec2,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget last frame's edge transitions
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.mouse_clicked.clear();
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyCode, down: bool) {
        if down {
            // Auto-repeat reports keys that are already held; only the first counts
            if self.held.insert(key) {
                self.pressed.insert(key);
            }
        } else if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    /// Handle mouse button input at the current cursor position
    pub fn handle_mouse_button(&mut self, button: MouseButton, down: bool) {
        if down {
            if self.mouse_held.insert(button) {
                self.mouse_clicked.push((button, self.mouse_position));
            }
        } else {
            self.mouse_held.remove(&button);
        }
    }

    /// Handle mouse movement
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
    }

    /// Whether a key is currently held
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Whether a key went down this frame
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether a key went up this frame
    pub fn was_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    /// Whether a mouse button is currently held
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Clicks that happened this frame, with the cursor position at the time
    pub fn clicks(&self) -> &[(MouseButton, Vec2)] {
        &self.mouse_clicked
    }

    /// Current cursor position
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_edge_triggered() {
        let mut input = InputState::new();
        input.begin_frame();
        input.handle_key(KeyCode::W, true);
        assert!(input.is_held(KeyCode::W));
        assert!(input.was_pressed(KeyCode::W));

        input.begin_frame();
        input.handle_key(KeyCode::W, true);
        assert!(input.is_held(KeyCode::W));
        assert!(!input.was_pressed(KeyCode::W));

        input.begin_frame();
        input.handle_key(KeyCode::W, false);
        assert!(!input.is_held(KeyCode::W));
        assert!(input.was_released(KeyCode::W));
    }

    #[test]
    fn test_click_records_cursor_position() {
        let mut input = InputState::new();
        input.handle_mouse_move(120.0, 45.0);
        input.handle_mouse_button(MouseButton::Left, true);
        assert_eq!(input.clicks(), &[(MouseButton::Left, Vec2::new(120.0, 45.0))]);
        assert!(input.is_mouse_held(MouseButton::Left));

        input.begin_frame();
        assert!(input.clicks().is_empty());
    }
}
