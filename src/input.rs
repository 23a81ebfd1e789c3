//! Translate terminal events into game intents
//!
//! Every configured key name maps to one intent; a key bound to several
//! intents (Enter starts and resumes by default) yields all of them and the
//! game ignores whichever doesn't fit its state.

use blockfall::settings::KeyBindings;
use blockfall::Intent;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode, MouseButton,
    MouseEventKind,
};

/// Key bindings resolved to key codes
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyCode, Intent)>,
}

/// Parse a key name from the settings file
fn parse_key(s: &str) -> Option<KeyCode> {
    let code = match s.to_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "esc" | "escape" => KeyCode::Esc,
        "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

impl KeyMap {
    pub fn from_settings(keys: &KeyBindings) -> Self {
        let table: [(&[String], Intent); 11] = [
            (keys.left.as_slice(), Intent::Left),
            (keys.right.as_slice(), Intent::Right),
            (keys.down.as_slice(), Intent::Down),
            (keys.soft_down.as_slice(), Intent::SoftDown),
            (keys.rotate.as_slice(), Intent::Rotate),
            (keys.drop.as_slice(), Intent::Drop),
            (keys.pause.as_slice(), Intent::Pause),
            (keys.resume.as_slice(), Intent::Resume),
            (keys.start.as_slice(), Intent::Start),
            (keys.restart.as_slice(), Intent::Restart),
            (keys.quit.as_slice(), Intent::Quit),
        ];

        let mut bindings = Vec::new();
        for (names, intent) in table {
            for name in names {
                match parse_key(name) {
                    Some(code) => bindings.push((code, intent)),
                    None => tracing::warn!("unknown key {:?} bound to {:?}", name, intent),
                }
            }
        }
        Self { bindings }
    }

    /// Intents produced by one terminal event
    pub fn translate(&self, event: &Event) -> Vec<Intent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.key_down(key),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                vec![Intent::Click]
            }
            _ => Vec::new(),
        }
    }

    fn key_down(&self, key: &KeyEvent) -> Vec<Intent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Intent::Quit];
        }

        let code = normalize_key(key.code);
        self.bindings
            .iter()
            .filter(|(bound, _)| *bound == code)
            .map(|&(_, intent)| intent)
            .collect()
    }
}
