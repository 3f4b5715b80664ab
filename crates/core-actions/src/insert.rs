//! Insert mode and its write-through line buffer.
//!
//! Keystrokes mutate a mirror of the current line so the store is written
//! once per key without re-reading, while each keystroke still logs its own
//! `InsertChar`/`DeleteChar` op for character-granular undo. Leaving the
//! line (Escape, Enter, a join) commits the mirror: a reconciling
//! `ReplaceLine` is pushed only if the store diverged from the mirror.
//!
//! The whole insert session lives in one undo group opened by the entering
//! command (`i`, `a`, `o`, `O`); Enter closes the group at the line split
//! and opens a fresh one, so multi-line typing undoes line by line.

use core_input::Key;
use core_state::{insert_char_at, remove_byte_at, Mode, Operation};

use crate::{edit, Editor};

pub fn handle_insert_key(ed: &mut Editor, key: Key) {
    match key {
        Key::Esc => {
            commit_insert_buffer(ed);
            ed.commit_group();
            ed.mode = Mode::Normal;
        }
        Key::Backspace => apply_backspace(ed),
        Key::Tab => {
            let n = ed.options.tab_width.max(1);
            for _ in 0..n {
                apply_insert_char(ed, ' ');
            }
        }
        Key::Enter => {
            let indent = if ed.options.auto_indent {
                compute_indent_for_line(ed, ed.cursor().row)
            } else {
                String::new()
            };
            ed.begin_group();
            commit_insert_buffer(ed);
            edit::split_line_at_cursor(ed);
            if ed.options.auto_indent {
                apply_indent_to_newline(ed, &indent);
            }
            ed.commit_group();
            ed.begin_group();
            begin_insert_buffer(ed);
        }
        Key::Char(c @ ('(' | '[' | '{')) if ed.options.auto_pair => insert_pair(ed, c),
        Key::Char(c @ (')' | ']' | '}')) if ed.options.auto_pair && closer_ahead(ed, c) => {
            // The matching closer is already there; step over it.
            let mut cur = ed.cursor();
            cur.col += 1;
            ed.set_cursor(cur);
        }
        Key::Char(c) if (' '..='~').contains(&c) => apply_insert_char(ed, c),
        _ => {}
    }
}

/// `o`: open an indented empty line below and enter Insert.
pub fn open_line_below(ed: &mut Editor) {
    let indent = if ed.options.auto_indent {
        compute_indent_for_line(ed, ed.cursor().row)
    } else {
        String::new()
    };
    let row = ed.cursor().row + 1;
    ed.begin_group();
    insert_empty_line(ed, row);
    if !indent.is_empty() {
        apply_indent_to_newline(ed, &indent);
    }
    ed.mode = Mode::Insert;
}

/// `O`: open an indented empty line above and enter Insert.
pub fn open_line_above(ed: &mut Editor) {
    let indent = if ed.options.auto_indent {
        compute_indent_for_line(ed, ed.cursor().row)
    } else {
        String::new()
    };
    let row = ed.cursor().row;
    ed.begin_group();
    insert_empty_line(ed, row);
    if !indent.is_empty() {
        apply_indent_to_newline(ed, &indent);
    }
    ed.mode = Mode::Insert;
}

fn insert_empty_line(ed: &mut Editor, row: usize) {
    let doc = ed.ws.doc();
    {
        let mut d = doc.borrow_mut();
        d.store.insert_line(row, "");
        d.push_op(Operation::InsertLine { row, text: String::new() });
        d.dirty = true;
        d.log.clear_redo();
    }
    ed.set_cursor(core_text::Position::new(row, 0));
}

pub(crate) fn begin_insert_buffer(ed: &mut Editor) {
    let cur = ed.cursor();
    ed.insert_active = true;
    ed.insert_row = cur.row;
    ed.insert_line = ed.ws.doc().borrow().store.get(cur.row);
}

fn buffer_current(ed: &mut Editor) {
    if !ed.insert_active || ed.insert_row != ed.cursor().row {
        begin_insert_buffer(ed);
    }
}

fn apply_insert_char(ed: &mut Editor, ch: char) {
    buffer_current(ed);
    ed.begin_group();
    let mut cur = ed.cursor();
    cur.col = cur.col.min(ed.insert_line.len());
    ed.insert_line = insert_char_at(&ed.insert_line, cur.col, ch);
    let (row, line) = (ed.insert_row, ed.insert_line.clone());
    {
        let doc = ed.ws.doc();
        let mut d = doc.borrow_mut();
        d.store.replace_line(row, &line);
        d.push_op(Operation::InsertChar { row, col: cur.col, ch });
        d.dirty = true;
        d.log.clear_redo();
    }
    cur.col += 1;
    ed.set_cursor(cur);
}

fn apply_backspace(ed: &mut Editor) {
    buffer_current(ed);
    let mut cur = ed.cursor();
    if cur.col > 0 {
        ed.begin_group();
        let ch = ed.insert_line.as_bytes()[cur.col - 1] as char;
        ed.insert_line = remove_byte_at(&ed.insert_line, cur.col - 1);
        let (row, line) = (ed.insert_row, ed.insert_line.clone());
        {
            let doc = ed.ws.doc();
            let mut d = doc.borrow_mut();
            d.store.replace_line(row, &line);
            d.push_op(Operation::DeleteChar { row, col: cur.col - 1, ch });
            d.dirty = true;
            d.log.clear_redo();
        }
        cur.col -= 1;
        ed.set_cursor(cur);
    } else {
        // Column 0: fall back to the join primitive, then re-mirror the
        // merged line.
        commit_insert_buffer(ed);
        edit::backspace(ed);
        begin_insert_buffer(ed);
    }
}

/// Reconcile the mirror with the store. Because every keystroke writes
/// through, the two normally agree and nothing is logged; a divergence
/// (out-of-band change) is captured as one `ReplaceLine`.
pub(crate) fn commit_insert_buffer(ed: &mut Editor) {
    if !ed.insert_active {
        return;
    }
    let row = ed.insert_row;
    let mirrored = std::mem::take(&mut ed.insert_line);
    ed.insert_active = false;
    let doc = ed.ws.doc();
    let mut d = doc.borrow_mut();
    let old = d.store.get(row);
    if old != mirrored {
        let col = ed.ws.pane().cursor.col;
        d.store.replace_line(row, &mirrored);
        d.push_op(Operation::ReplaceLine { row, col, old, new: mirrored });
        d.log.clear_redo();
    }
}

fn closer_ahead(ed: &Editor, closer: char) -> bool {
    let cur = ed.cursor();
    if ed.insert_active && ed.insert_row == cur.row {
        ed.insert_line.as_bytes().get(cur.col) == Some(&(closer as u8))
    } else {
        let line = ed.ws.doc().borrow().store.get(cur.row);
        line.as_bytes().get(cur.col) == Some(&(closer as u8))
    }
}

fn insert_pair(ed: &mut Editor, opening: char) {
    let closing = match opening {
        '(' => ')',
        '[' => ']',
        _ => '}',
    };
    buffer_current(ed);
    apply_insert_char(ed, opening);
    let cur = ed.cursor();
    let already_closed = ed.insert_line.as_bytes().get(cur.col) == Some(&(closing as u8));
    if !already_closed {
        apply_insert_char(ed, closing);
        let mut cur = ed.cursor();
        cur.col = cur.col.saturating_sub(1);
        ed.set_cursor(cur);
    }
}

/// Leading run of spaces and tabs of `row`.
pub(crate) fn compute_indent_for_line(ed: &Editor, row: usize) -> String {
    let line = ed.ws.doc().borrow().store.get(row);
    let end = line
        .bytes()
        .position(|b| b != b' ' && b != b'\t')
        .unwrap_or(line.len());
    line[..end].to_string()
}

/// Prepend `indent` to the cursor's line (unless already present) and land
/// the cursor at the end of the indent.
pub(crate) fn apply_indent_to_newline(ed: &mut Editor, indent: &str) {
    if indent.is_empty() {
        return;
    }
    let mut cur = ed.cursor();
    let doc = ed.ws.doc();
    {
        let mut d = doc.borrow_mut();
        if cur.row >= d.store.count() {
            return;
        }
        let line = d.store.get(cur.row);
        if line.starts_with(indent) {
            cur.col = indent.len().min(d.max_col(cur.row, true));
        } else {
            let new = format!("{indent}{line}");
            d.store.replace_line(cur.row, &new);
            d.push_op(Operation::ReplaceLine {
                row: cur.row,
                col: 0,
                old: line,
                new: new.clone(),
            });
            d.dirty = true;
            cur.col = indent.len().min(new.len());
        }
    }
    ed.set_cursor(cur);
}
