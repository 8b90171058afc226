//! Key-to-action mapping for the labeling session.

use crate::display::Key;
use crate::model::MAX_LABEL;

/// What the operator asked for with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Show the next item
    Forward,
    /// Show the previous item
    Backward,
    /// Assign a digit label to the current item and advance
    Label(u8),
    /// End the session
    Quit,
    /// Remove the most recent measurement line
    Undo,
    /// Key without a binding
    Unknown,
}

/// Keybinding configuration for the labeling session.
///
/// Digit keys always map to their label; numpad digits arrive as the same
/// characters while NumLock is on.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: Vec<Key>,
    pub backward: Vec<Key>,
    pub quit: Vec<Key>,
    pub undo: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![Key::Right, Key::Up],
            backward: vec![Key::Left, Key::Down],
            quit: vec![Key::Escape, Key::Char('q')],
            undo: vec![Key::Char('z'), Key::Backspace],
        }
    }
}

impl KeyBindings {
    /// Get the action that corresponds to a key press.
    pub fn action_for(&self, key: Key) -> Action {
        if let Key::Char(c) = key {
            if let Some(digit) = c.to_digit(10) {
                let label = digit as u8;
                if label <= MAX_LABEL {
                    return Action::Label(label);
                }
            }
        }

        if self.forward.contains(&key) {
            Action::Forward
        } else if self.backward.contains(&key) {
            Action::Backward
        } else if self.quit.contains(&key) {
            Action::Quit
        } else if self.undo.contains(&key) {
            Action::Undo
        } else {
            Action::Unknown
        }
    }

    /// One-line navigation help shown above each image.
    pub fn help_line(&self) -> String {
        format!(
            "NEXT: {} | PREVIOUS: {} | LABEL: 0-9 | UNDO LINE: {} | QUIT: {}",
            keys_to_string(&self.forward),
            keys_to_string(&self.backward),
            keys_to_string(&self.undo),
            keys_to_string(&self.quit),
        )
    }
}

/// Convert a key to a display string.
pub fn key_to_string(key: Key) -> String {
    match key {
        Key::Char(c) => c.to_ascii_uppercase().to_string(),
        Key::Escape => "ESC".to_string(),
        Key::Backspace => "BACKSPACE".to_string(),
        Key::Enter => "ENTER".to_string(),
        Key::Up => "UP".to_string(),
        Key::Down => "DOWN".to_string(),
        Key::Left => "LEFT".to_string(),
        Key::Right => "RIGHT".to_string(),
        Key::Other => "?".to_string(),
    }
}

fn keys_to_string(keys: &[Key]) -> String {
    keys.iter()
        .map(|k| key_to_string(*k))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_navigation_keys() {
        let kb = KeyBindings::default();
        assert_eq!(kb.action_for(Key::Right), Action::Forward);
        assert_eq!(kb.action_for(Key::Up), Action::Forward);
        assert_eq!(kb.action_for(Key::Left), Action::Backward);
        assert_eq!(kb.action_for(Key::Down), Action::Backward);
        assert_eq!(kb.action_for(Key::Escape), Action::Quit);
        assert_eq!(kb.action_for(Key::Char('q')), Action::Quit);
        assert_eq!(kb.action_for(Key::Char('z')), Action::Undo);
        assert_eq!(kb.action_for(Key::Backspace), Action::Undo);
    }

    #[test]
    fn test_digits_map_to_labels() {
        let kb = KeyBindings::default();
        for d in 0..=9u8 {
            let c = char::from(b'0' + d);
            assert_eq!(kb.action_for(Key::Char(c)), Action::Label(d));
        }
    }

    #[test]
    fn test_unbound_keys_are_unknown() {
        let kb = KeyBindings::default();
        assert_eq!(kb.action_for(Key::Char('a')), Action::Unknown);
        assert_eq!(kb.action_for(Key::Enter), Action::Unknown);
        assert_eq!(kb.action_for(Key::Other), Action::Unknown);
    }

    #[test]
    fn test_help_line_lists_bindings() {
        let help = KeyBindings::default().help_line();
        assert!(help.starts_with("NEXT: RIGHT/UP | PREVIOUS: LEFT/DOWN"));
        assert!(help.contains("QUIT: ESC/Q"));
    }
}
