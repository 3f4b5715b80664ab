//! Cursor movement over the active pane.
//!
//! Horizontal limits honor the `onemore` option through
//! [`Editor::max_col`]; vertical moves re-clamp the column against the
//! destination row. Out-of-range targets clamp silently.

use core_text::motion as text_motion;

use crate::Editor;

pub fn move_left(ed: &mut Editor) {
    let mut cur = ed.cursor();
    if cur.col > 0 {
        cur.col -= 1;
        ed.set_cursor(cur);
    }
}

pub fn move_right(ed: &mut Editor) {
    let mut cur = ed.cursor();
    cur.col = (cur.col + 1).min(ed.max_col(cur.row));
    ed.set_cursor(cur);
}

pub fn move_up(ed: &mut Editor) {
    let mut cur = ed.cursor();
    if cur.row > 0 {
        cur.row -= 1;
        cur.col = cur.col.min(ed.max_col(cur.row));
        ed.set_cursor(cur);
    }
}

pub fn move_down(ed: &mut Editor) {
    let mut cur = ed.cursor();
    let count = ed.ws.doc().borrow().line_count();
    if cur.row + 1 < count {
        cur.row += 1;
        cur.col = cur.col.min(ed.max_col(cur.row));
        ed.set_cursor(cur);
    }
}

pub fn move_to_line_start(ed: &mut Editor) {
    let mut cur = ed.cursor();
    cur.col = 0;
    ed.set_cursor(cur);
}

pub fn move_to_line_end(ed: &mut Editor) {
    let mut cur = ed.cursor();
    cur.col = ed.max_col(cur.row);
    ed.set_cursor(cur);
}

pub fn move_to_top(ed: &mut Editor) {
    let mut cur = ed.cursor();
    cur.row = 0;
    cur.col = cur.col.min(ed.max_col(0));
    ed.set_cursor(cur);
}

pub fn move_to_bottom(ed: &mut Editor) {
    let mut cur = ed.cursor();
    cur.row = ed.ws.doc().borrow().line_count().saturating_sub(1);
    cur.col = cur.col.min(ed.max_col(cur.row));
    ed.set_cursor(cur);
}

/// `{n}gg` / `{n}G`: absolute jump to a zero-based row, clamped.
pub fn jump_to_line(ed: &mut Editor, target: usize) {
    let mut cur = ed.cursor();
    let doc = ed.ws.doc();
    let doc = doc.borrow();
    cur.row = target.min(doc.line_count().saturating_sub(1));
    cur.col = cur.col.min(doc.store.line_len(cur.row));
    drop(doc);
    ed.set_cursor(cur);
}

pub fn word_forward(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    text_motion::word_forward(&doc.borrow().store, &mut cur);
    ed.set_cursor(cur);
}

pub fn word_end(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    text_motion::word_end(&doc.borrow().store, &mut cur);
    ed.set_cursor(cur);
}

pub fn word_backward(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    text_motion::word_backward(&doc.borrow().store, &mut cur);
    ed.set_cursor(cur);
}

/// Ctrl-D: shift viewport and cursor down half the text height.
pub fn scroll_half_page_down(ed: &mut Editor) {
    let half = (ed.last_text_height / 2).max(1);
    let line_count = ed.ws.doc().borrow().line_count();
    let max_top = line_count.saturating_sub(ed.last_text_height.max(1));
    {
        let pane = ed.ws.pane_mut();
        pane.vp.top_line = (pane.vp.top_line + half).min(max_top);
    }
    let mut cur = ed.cursor();
    cur.row = (cur.row + half).min(line_count.saturating_sub(1));
    cur.col = cur.col.min(ed.max_col(cur.row));
    ed.set_cursor(cur);
}

/// Ctrl-U: shift viewport and cursor up half the text height.
pub fn scroll_half_page_up(ed: &mut Editor) {
    let half = (ed.last_text_height / 2).max(1);
    {
        let pane = ed.ws.pane_mut();
        pane.vp.top_line = pane.vp.top_line.saturating_sub(half);
    }
    let mut cur = ed.cursor();
    cur.row = cur.row.saturating_sub(half);
    cur.col = cur.col.min(ed.max_col(cur.row));
    ed.set_cursor(cur);
}
