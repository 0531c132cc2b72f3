use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Restart,
    Quit,
    /// Any other key. Still releases a paused game.
    Other,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' | 'i' => KeyAction::Steer(Direction::Up),
                's' | 'k' => KeyAction::Steer(Direction::Down),
                'a' | 'j' | '[' => KeyAction::Steer(Direction::Left),
                'd' | 'l' | ']' => KeyAction::Steer(Direction::Right),
                ' ' | 'r' => KeyAction::Restart,
                'q' => KeyAction::Quit,
                _ => KeyAction::Other,
            },

            KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::Other,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
