use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Axis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Axis, i32),
    TogglePause,
    Quit,
    None,
}

pub fn translate_key(key: &KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    if is_ctrl_c(key) {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Up => KeyAction::Turn(Axis::Y, -1),
        KeyCode::Down => KeyAction::Turn(Axis::Y, 1),
        KeyCode::Left => KeyAction::Turn(Axis::X, -1),
        KeyCode::Right => KeyAction::Turn(Axis::X, 1),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => KeyAction::Turn(Axis::Y, -1),
            's' => KeyAction::Turn(Axis::Y, 1),
            'a' => KeyAction::Turn(Axis::X, -1),
            'd' => KeyAction::Turn(Axis::X, 1),
            'p' => KeyAction::TogglePause,
            'q' => KeyAction::Quit,
            _ => KeyAction::None,
        },
        KeyCode::Esc => KeyAction::TogglePause,
        _ => KeyAction::None,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
