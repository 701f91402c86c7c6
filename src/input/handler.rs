use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

/// What a key means while the snake is on screen
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    GameAction(Action),
    /// End the session and return to the sign-in screen
    SignOut,
    Quit,
    None,
}

/// What a key means while a text field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Insert(char),
    Backspace,
    Submit,
    /// Leave the field for the screen's secondary action
    Next,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_ctrl_c(&key) {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Header buttons
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                KeyAction::GameAction(Action::TogglePause)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::GameAction(Action::Reload),
            KeyCode::Char('l') | KeyCode::Char('L') => KeyAction::SignOut,

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    pub fn handle_text_key(&self, key: KeyEvent) -> TextKey {
        if is_ctrl_c(&key) {
            return TextKey::Quit;
        }

        match key.code {
            KeyCode::Char(c) if !c.is_control() => TextKey::Insert(c),
            KeyCode::Backspace => TextKey::Backspace,
            KeyCode::Enter => TextKey::Submit,
            KeyCode::Tab => TextKey::Next,
            KeyCode::Esc => TextKey::Quit,
            _ => TextKey::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn turn(direction: Direction) -> KeyAction {
    KeyAction::GameAction(Action::Turn(direction))
}

/// Apply a text key to a bounded single-line buffer; true if the buffer changed
pub fn edit_line(buffer: &mut String, key: TextKey, max_chars: usize) -> bool {
    match key {
        TextKey::Insert(c) if buffer.chars().count() < max_chars => {
            buffer.push(c);
            true
        }
        TextKey::Backspace => buffer.pop().is_some(),
        _ => false,
    }
}
