//! Edit primitives.
//!
//! Every mutation here runs inside an undo group, logs its reversible
//! operation(s), marks the document dirty, and clears the redo stack. The
//! single-key actions open and commit their own group; helpers documented as
//! "caller wraps the group" are building blocks for composite actions.

use core_state::{insert_char_at, remove_byte_at, Operation};
use core_text::motion::{next_word_end_same_line, next_word_start_same_line};
use core_text::Position;

use crate::Editor;

/// `x`: delete the byte under the cursor. Silent no-op past end of line.
pub fn delete_char_under_cursor(ed: &mut Editor) {
    ed.begin_group();
    let doc = ed.ws.doc();
    let cur = ed.cursor();
    {
        let mut d = doc.borrow_mut();
        let line = d.store.get(cur.row);
        if cur.col < line.len() {
            let ch = line.as_bytes()[cur.col] as char;
            d.store.replace_line(cur.row, &remove_byte_at(&line, cur.col));
            d.push_op(Operation::DeleteChar { row: cur.row, col: cur.col, ch });
            d.dirty = true;
            d.log.clear_redo();
        }
    }
    ed.commit_group();
}

/// `dd` / `{n}dd`: remove whole lines into the register. Caller wraps the
/// group. Each removal is logged at the constant start row, which is the
/// position the erase actually happens at when the ops replay sequentially.
pub fn delete_lines_range(ed: &mut Editor, start_row: usize, count: usize) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    let mut yanked = Vec::new();
    {
        let mut d = doc.borrow_mut();
        let total = d.store.count();
        if count == 0 || start_row >= total {
            return;
        }
        let n = count.min(total - start_row);
        yanked.reserve(n);
        for i in 0..n {
            yanked.push(d.store.get(start_row + i));
        }
        d.store.erase_lines(start_row, start_row + n);
        for text in &yanked {
            d.push_op(Operation::DeleteLine { row: start_row, text: text.clone() });
        }
        cur.row = start_row.min(d.store.count().saturating_sub(1));
        cur.col = cur.col.min(d.store.line_len(cur.row));
        d.dirty = true;
        d.log.clear_redo();
    }
    ed.register.set_linewise(yanked);
    ed.set_cursor(cur);
}

/// `yy` / `{n}yy`: copy whole lines without mutating anything.
pub fn yank_lines(ed: &mut Editor, start_row: usize, count: usize) {
    let doc = ed.ws.doc();
    let d = doc.borrow();
    let mut lines = Vec::new();
    for i in 0..count {
        let row = start_row + i;
        if row >= d.store.count() {
            break;
        }
        lines.push(d.store.get(row));
    }
    drop(d);
    if !lines.is_empty() {
        ed.register.set_linewise(lines);
    }
}

/// `p`: paste the register below (linewise) or after the cursor (charwise).
pub fn paste_below(ed: &mut Editor) {
    if ed.register.is_empty() {
        return;
    }
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    let insert_row = cur.row + 1;
    ed.begin_group();
    if ed.register.linewise {
        let lines = ed.register.lines.clone();
        {
            let mut d = doc.borrow_mut();
            d.store.insert_lines(insert_row, &lines);
            for (i, text) in lines.iter().enumerate() {
                d.push_op(Operation::InsertLine { row: insert_row + i, text: text.clone() });
            }
            d.dirty = true;
            d.log.clear_redo();
        }
        cur = Position::new(insert_row, 0);
        ed.set_cursor(cur);
    } else {
        let text = ed.register.lines[0].clone();
        let parts: Vec<String> = text.split('\n').map(str::to_string).collect();
        let mut d = doc.borrow_mut();
        let line = d.store.get(cur.row);
        let pos = (cur.col + 1).min(line.len());
        if parts.len() == 1 {
            let mut new = line.clone();
            new.insert_str(pos, &parts[0]);
            d.store.replace_line(cur.row, &new);
            d.push_op(Operation::ReplaceLine { row: cur.row, col: pos, old: line, new });
        } else {
            // Split the current line at the paste point: the first fragment
            // extends the left half, interior fragments land as a block, and
            // the right half reattaches to the last inserted line.
            let left = line[..pos].to_string();
            let right = line[pos..].to_string();
            let first_new = format!("{left}{}", parts[0]);
            d.store.replace_line(cur.row, &first_new);
            d.push_op(Operation::ReplaceLine {
                row: cur.row,
                col: pos,
                old: line.clone(),
                new: first_new,
            });
            let tail = &parts[1..];
            let block = tail.join("\n");
            d.store.insert_lines(insert_row, tail);
            d.push_op(Operation::InsertLinesBlock { row: insert_row, block });
            let last_row = insert_row + tail.len() - 1;
            let last_old = tail[tail.len() - 1].clone();
            let last_new = format!("{last_old}{right}");
            d.store.replace_line(last_row, &last_new);
            d.push_op(Operation::ReplaceLine {
                row: last_row,
                col: 0,
                old: last_old,
                new: last_new,
            });
        }
        d.dirty = true;
        d.log.clear_redo();
    }
    ed.commit_group();
}

/// Split the current line at the cursor. Caller wraps the group.
pub fn split_line_at_cursor(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    {
        let mut d = doc.borrow_mut();
        let line = d.store.get(cur.row);
        let col = cur.col.min(line.len());
        let left = line[..col].to_string();
        let right = line[col..].to_string();
        d.store.replace_line(cur.row, &left);
        d.push_op(Operation::ReplaceLine {
            row: cur.row,
            col,
            old: line,
            new: left,
        });
        d.store.insert_line(cur.row + 1, &right);
        d.push_op(Operation::InsertLine { row: cur.row + 1, text: right });
        d.dirty = true;
        d.log.clear_redo();
    }
    cur.row += 1;
    cur.col = 0;
    ed.set_cursor(cur);
}

/// Backspace outside the insert buffer: in-line byte delete, or a join with
/// the previous line at column 0. Caller wraps the group.
pub fn backspace(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    let mut d = doc.borrow_mut();
    if cur.col > 0 {
        let line = d.store.get(cur.row);
        let ch = line.as_bytes()[cur.col - 1] as char;
        d.store.replace_line(cur.row, &remove_byte_at(&line, cur.col - 1));
        d.push_op(Operation::DeleteChar { row: cur.row, col: cur.col - 1, ch });
        cur.col -= 1;
    } else if cur.row > 0 {
        let prev = d.store.get(cur.row - 1);
        let curr = d.store.get(cur.row);
        let joined = format!("{prev}{curr}");
        d.store.replace_line(cur.row - 1, &joined);
        d.push_op(Operation::ReplaceLine {
            row: cur.row - 1,
            col: prev.len(),
            old: prev.clone(),
            new: joined,
        });
        d.store.erase_line(cur.row);
        d.push_op(Operation::DeleteLine { row: cur.row, text: curr });
        cur.row -= 1;
        cur.col = prev.len();
    } else {
        return;
    }
    d.dirty = true;
    d.log.clear_redo();
    drop(d);
    ed.set_cursor(cur);
}

/// `dw`: delete from the cursor to the next word start on this line.
pub fn delete_to_next_word(ed: &mut Editor) {
    delete_span_to(ed, next_word_start_same_line);
}

/// `de`: delete from the cursor through the end of the current/next run.
pub fn delete_to_word_end(ed: &mut Editor) {
    delete_span_to(ed, next_word_end_same_line);
}

fn delete_span_to(ed: &mut Editor, end_of: fn(&str, usize) -> usize) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    let line = doc.borrow().store.get(cur.row);
    let c0 = cur.col.min(line.len());
    let c1 = end_of(&line, cur.col).min(line.len());
    if c1 <= c0 {
        return;
    }
    ed.begin_group();
    {
        let mut d = doc.borrow_mut();
        let new = format!("{}{}", &line[..c0], &line[c1..]);
        d.store.replace_line(cur.row, &new);
        d.push_op(Operation::ReplaceLine { row: cur.row, col: c0, old: line.clone(), new });
        d.dirty = true;
        d.log.clear_redo();
    }
    ed.register.set_charwise(line[c0..c1].to_string());
    cur.col = c0;
    ed.set_cursor(cur);
    ed.commit_group();
}

/// `yw`: yank to the next word start, no mutation.
pub fn yank_to_next_word(ed: &mut Editor) {
    yank_span_to(ed, next_word_start_same_line);
}

/// `ye`: yank through the end of the current/next run.
pub fn yank_to_word_end(ed: &mut Editor) {
    yank_span_to(ed, next_word_end_same_line);
}

fn yank_span_to(ed: &mut Editor, end_of: fn(&str, usize) -> usize) {
    let doc = ed.ws.doc();
    let cur = ed.cursor();
    let line = doc.borrow().store.get(cur.row);
    let c0 = cur.col.min(line.len());
    let c1 = end_of(&line, cur.col).min(line.len());
    if c1 > c0 {
        ed.register.set_charwise(line[c0..c1].to_string());
    }
}

/// `>>`: prepend `tab_width` spaces to each of `count` rows. Caller wraps
/// the group.
pub fn indent_lines(ed: &mut Editor, start_row: usize, count: usize) {
    if count == 0 {
        return;
    }
    let pad = " ".repeat(ed.options.tab_width.max(1));
    let doc = ed.ws.doc();
    let mut d = doc.borrow_mut();
    let end = (start_row + count).min(d.store.count());
    for row in start_row..end {
        let old = d.store.get(row);
        let new = format!("{pad}{old}");
        d.store.replace_line(row, &new);
        d.push_op(Operation::ReplaceLine { row, col: 0, old, new });
        d.dirty = true;
    }
    d.log.clear_redo();
}

/// `<<`: strip up to `tab_width` leading columns. A space is one column; a
/// tab counts `tab_width` columns and ends the removal. Caller wraps the
/// group.
pub fn dedent_lines(ed: &mut Editor, start_row: usize, count: usize) {
    if count == 0 {
        return;
    }
    let max_cols = ed.options.tab_width.max(1);
    let doc = ed.ws.doc();
    let mut d = doc.borrow_mut();
    let end = (start_row + count).min(d.store.count());
    for row in start_row..end {
        let old = d.store.get(row);
        let bytes = old.as_bytes();
        let mut remove = 0usize;
        let mut cols = 0usize;
        while remove < bytes.len() && cols < max_cols {
            match bytes[remove] {
                b'\t' => {
                    remove += 1;
                    break;
                }
                b' ' => {
                    remove += 1;
                    cols += 1;
                }
                _ => break,
            }
        }
        if remove == 0 {
            continue;
        }
        let new = old[remove..].to_string();
        d.store.replace_line(row, &new);
        d.push_op(Operation::ReplaceLine { row, col: 0, old, new });
        d.dirty = true;
    }
    d.log.clear_redo();
}

/// `u`: pop one group. Cursor restores to the group's pre position, clamped
/// against the restored content.
pub fn undo(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    let applied = doc.borrow_mut().undo(&mut cur);
    if applied {
        clamp_cursor(ed, &mut cur);
        ed.set_cursor(cur);
    } else {
        ed.set_message("already at oldest change");
    }
}

/// Ctrl-R: replay one undone group forward.
pub fn redo(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    let applied = doc.borrow_mut().redo(&mut cur);
    if applied {
        clamp_cursor(ed, &mut cur);
        ed.set_cursor(cur);
    } else {
        ed.set_message("already at newest change");
    }
}

pub(crate) fn clamp_cursor(ed: &Editor, cur: &mut Position) {
    let doc = ed.ws.doc();
    let d = doc.borrow();
    cur.row = cur.row.min(d.store.count().saturating_sub(1));
    cur.col = cur.col.min(d.store.line_len(cur.row));
}
