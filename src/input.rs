//! Key bindings: terminal key events to game commands

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

/// What a key press asks the front-end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Action),
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyCode, Command)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl KeyMap {
    /// Create keybindings from settings; unknown key names are skipped
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        let groups = [
            (&keys.move_left, Command::Play(Action::MoveLeft)),
            (&keys.move_right, Command::Play(Action::MoveRight)),
            (&keys.soft_drop, Command::Play(Action::SoftDrop)),
            (&keys.hard_drop, Command::Play(Action::HardDrop)),
            (&keys.rotate_cw, Command::Play(Action::RotateCW)),
            (&keys.rotate_ccw, Command::Play(Action::RotateCCW)),
            (&keys.pause, Command::Play(Action::Pause)),
            (&keys.quit, Command::Quit),
        ];

        let mut bindings = Vec::new();
        for (names, command) in groups {
            for name in names {
                match parse_key(name) {
                    Some(code) => bindings.push((code, command)),
                    None => warn!("unknown key name {:?} in bindings", name),
                }
            }
        }
        Self { bindings }
    }

    /// Resolve a key event; releases and unbound keys give `None`
    pub fn resolve(&self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }
        let code = normalize_key(key.code);
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|&(_, command)| command)
    }
}

/// Parse a key string into KeyCode
fn parse_key(s: &str) -> Option<KeyCode> {
    let lower = s.to_lowercase();
    let code = match lower.as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let map = KeyMap::default();
        assert_eq!(map.resolve(press(KeyCode::Left)), Some(Command::Play(Action::MoveLeft)));
        assert_eq!(map.resolve(press(KeyCode::Char(' '))), Some(Command::Play(Action::HardDrop)));
        assert_eq!(map.resolve(press(KeyCode::Char('X'))), Some(Command::Play(Action::RotateCW)));
        assert_eq!(map.resolve(press(KeyCode::Up)), Some(Command::Play(Action::RotateCW)));
        assert_eq!(map.resolve(press(KeyCode::Esc)), Some(Command::Play(Action::Pause)));
        assert_eq!(map.resolve(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(map.resolve(press(KeyCode::Char('k'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let map = KeyMap::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map.resolve(key), Some(Command::Quit));
    }

    #[test]
    fn test_release_is_ignored() {
        let map = KeyMap::default();
        let mut key = press(KeyCode::Left);
        key.kind = KeyEventKind::Release;
        assert_eq!(map.resolve(key), None);
    }

    #[test]
    fn test_custom_and_unknown_names() {
        let mut settings = Settings::default();
        settings.keys.move_left = vec!["A".to_string(), "bogus".to_string()];
        let map = KeyMap::from_settings(&settings);
        assert_eq!(map.resolve(press(KeyCode::Char('a'))), Some(Command::Play(Action::MoveLeft)));
        assert_eq!(map.resolve(press(KeyCode::Left)), None);
        assert_eq!(parse_key("bogus"), None);
    }
}
