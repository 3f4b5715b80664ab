#![allow(dead_code)] // Shared across test binaries; each uses a subset.

use core_actions::Editor;
use core_input::Key;
use core_state::Options;
use core_text::{Backend, Position};

/// Editor over an untitled document seeded with `lines`.
pub fn editor_with(lines: &[&str]) -> Editor {
    editor_with_backend(Backend::Vector, lines)
}

pub fn editor_with_backend(backend: Backend, lines: &[&str]) -> Editor {
    let mut ed = Editor::new(backend, Options::default(), None);
    ed.ws
        .doc()
        .borrow_mut()
        .store
        .init(lines.iter().map(|s| s.to_string()).collect());
    ed
}

/// Feed a key string. `\x1b` is Escape, `\n` is Enter, `\x7f` is Backspace,
/// `\t` is Tab; everything else is a plain character key.
pub fn feed(ed: &mut Editor, keys: &str) {
    for ch in keys.chars() {
        let key = match ch {
            '\x1b' => Key::Esc,
            '\n' => Key::Enter,
            '\x7f' => Key::Backspace,
            '\t' => Key::Tab,
            c => Key::Char(c),
        };
        ed.handle_key(key);
    }
}

pub fn press(ed: &mut Editor, key: Key) {
    ed.handle_key(key);
}

pub fn buffer_text(ed: &Editor) -> Vec<String> {
    ed.ws.doc().borrow().store.snapshot()
}

pub fn cursor(ed: &Editor) -> Position {
    ed.ws.pane().cursor
}

pub fn set_cursor(ed: &mut Editor, row: usize, col: usize) {
    ed.ws.pane_mut().cursor = Position::new(row, col);
}
