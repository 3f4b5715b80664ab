//! Terminal key events reduced to the token set the editor dispatches on.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Esc,
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

/// Map a crossterm key event to a [`Key`]. Returns `None` for release events
/// and key codes the editor does not react to.
pub fn map_key_event(event: &KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Esc => Key::Esc,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn event(code: KeyCode, mods: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: mods,
            kind,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn maps_plain_char() {
        let ev = event(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(map_key_event(&ev), Some(Key::Char('x')));
    }

    #[test]
    fn maps_ctrl_chord_case_insensitive() {
        let ev = event(KeyCode::Char('W'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(map_key_event(&ev), Some(Key::Ctrl('w')));
    }

    #[test]
    fn ignores_release_events() {
        let ev = event(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(map_key_event(&ev), None);
    }

    #[test]
    fn maps_named_keys() {
        for (code, key) in [
            (KeyCode::Esc, Key::Esc),
            (KeyCode::Enter, Key::Enter),
            (KeyCode::Backspace, Key::Backspace),
            (KeyCode::Tab, Key::Tab),
        ] {
            let ev = event(code, KeyModifiers::NONE, KeyEventKind::Press);
            assert_eq!(map_key_event(&ev), Some(key));
        }
    }
}
