//! Action bindings and per-frame input snapshot

use serde::{Deserialize, Serialize};
use survivor_engine::foundation::math::{normalize_or_zero, Vec2};
use survivor_engine::input::{InputState, KeyCode, MouseButton};

/// Game actions a key can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move toward negative y
    MoveUp,
    /// Move toward positive y
    MoveDown,
    /// Move toward negative x
    MoveLeft,
    /// Move toward positive x
    MoveRight,
    /// Toggle pause, or back out of a menu
    Pause,
    /// Confirm the highlighted entry
    Confirm,
    /// Pick the first card
    Choose1,
    /// Pick the second card
    Choose2,
    /// Pick the third card
    Choose3,
    /// Toggle the debug overlay
    ToggleDebug,
    /// Abandon the run
    Quit,
}

/// One key-to-action mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Physical key
    pub key: KeyCode,
    /// Action it triggers
    pub action: Action,
}

/// Key bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindings {
    /// All mappings; several keys may share an action
    pub bindings: Vec<Binding>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let pairs = [
            (KeyCode::W, Action::MoveUp),
            (KeyCode::Up, Action::MoveUp),
            (KeyCode::S, Action::MoveDown),
            (KeyCode::Down, Action::MoveDown),
            (KeyCode::A, Action::MoveLeft),
            (KeyCode::Left, Action::MoveLeft),
            (KeyCode::D, Action::MoveRight),
            (KeyCode::Right, Action::MoveRight),
            (KeyCode::Escape, Action::Pause),
            (KeyCode::Enter, Action::Confirm),
            (KeyCode::Space, Action::Confirm),
            (KeyCode::Digit1, Action::Choose1),
            (KeyCode::Digit2, Action::Choose2),
            (KeyCode::Digit3, Action::Choose3),
            (KeyCode::F1, Action::ToggleDebug),
            (KeyCode::Q, Action::Quit),
        ];
        Self {
            bindings: pairs
                .into_iter()
                .map(|(key, action)| Binding { key, action })
                .collect(),
        }
    }
}

impl InputBindings {
    fn keys_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |b| b.action == action)
            .map(|b| b.key)
    }

    /// Whether any key bound to `action` is held
    pub fn held(&self, state: &InputState, action: Action) -> bool {
        self.keys_for(action).any(|key| state.is_held(key))
    }

    /// Whether any key bound to `action` went down this frame
    pub fn pressed(&self, state: &InputState, action: Action) -> bool {
        self.keys_for(action).any(|key| state.was_pressed(key))
    }

    /// Translate raw device state into this frame's game input
    ///
    /// `card_at` maps a cursor position to an upgrade card index, if the
    /// caller draws cards.
    pub fn read(&self, state: &InputState, card_at: impl Fn(Vec2) -> Option<usize>) -> FrameInput {
        let axis = |neg: Action, pos: Action| {
            f32::from(u8::from(self.held(state, pos))) - f32::from(u8::from(self.held(state, neg)))
        };
        let movement = Vec2::new(
            axis(Action::MoveLeft, Action::MoveRight),
            axis(Action::MoveUp, Action::MoveDown),
        );

        let choice = [Action::Choose1, Action::Choose2, Action::Choose3]
            .into_iter()
            .position(|action| self.pressed(state, action))
            .or_else(|| {
                state
                    .clicks()
                    .iter()
                    .filter(|(button, _)| *button == MouseButton::Left)
                    .find_map(|(_, pos)| card_at(*pos))
            });

        let mut nav = 0;
        if self.pressed(state, Action::MoveUp) {
            nav -= 1;
        }
        if self.pressed(state, Action::MoveDown) {
            nav += 1;
        }

        FrameInput {
            movement: normalize_or_zero(movement),
            nav,
            choice,
            confirm: self.pressed(state, Action::Confirm),
            pause: self.pressed(state, Action::Pause),
            toggle_debug: self.pressed(state, Action::ToggleDebug),
            quit: self.pressed(state, Action::Quit),
        }
    }
}

/// Game input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Unit movement direction, or zero when idle
    pub movement: Vec2,
    /// Menu navigation steps (-1 up, +1 down)
    pub nav: i32,
    /// Card picked directly by number key or click
    pub choice: Option<usize>,
    /// Confirm pressed
    pub confirm: bool,
    /// Pause pressed
    pub pause: bool,
    /// Debug toggle pressed
    pub toggle_debug: bool,
    /// Quit pressed
    pub quit: bool,
}

impl FrameInput {
    /// Input that only moves in `direction`
    pub fn moving(direction: Vec2) -> Self {
        Self {
            movement: normalize_or_zero(direction),
            ..Self::default()
        }
    }

    /// Input that only picks card `index`
    pub fn choosing(index: usize) -> Self {
        Self {
            choice: Some(index),
            ..Self::default()
        }
    }
}
