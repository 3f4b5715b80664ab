//! Dot-repeat: replay the last committed change at the current cursor.
//!
//! Every op of the last change is re-applied forward with its anchor shifted
//! by the cursor's delta from the group's `pre` position. Rows clamp to the
//! existing range for ops that touch a row and to the appendable range for
//! inserts. The replay itself runs inside a fresh group, so `.` undoes as a
//! unit, and the shifted ops it pushes become the new last change.

use core_state::{block_line_count, split_block_lines, Operation};
use core_text::Position;

use crate::{edit, Editor};

fn shift(base: usize, delta: isize) -> isize {
    base as isize + delta
}

fn clamp_existing(row: isize, count: usize) -> usize {
    row.clamp(0, count.saturating_sub(1) as isize) as usize
}

fn clamp_insert(row: isize, count: usize) -> usize {
    row.clamp(0, count as isize) as usize
}

/// Apply one recorded op with a positional shift, pushing the shifted op
/// into the currently open group.
fn apply_operation_forward(ed: &mut Editor, op: &Operation, row_delta: isize, col_delta: isize) {
    let doc = ed.ws.doc();
    let mut d = doc.borrow_mut();
    match op {
        Operation::InsertChar { row, col, ch } => {
            let row = clamp_existing(shift(*row, row_delta), d.store.count());
            let line = d.store.get(row);
            let col = shift(*col, col_delta).clamp(0, line.len() as isize) as usize;
            d.store
                .replace_line(row, &core_state::insert_char_at(&line, col, *ch));
            d.push_op(Operation::InsertChar { row, col, ch: *ch });
            d.dirty = true;
        }
        Operation::DeleteChar { row, col, .. } => {
            let row = clamp_existing(shift(*row, row_delta), d.store.count());
            let line = d.store.get(row);
            if line.is_empty() {
                return;
            }
            let col = shift(*col, col_delta).clamp(0, line.len() as isize - 1) as usize;
            let removed = line.as_bytes()[col] as char;
            d.store.replace_line(row, &core_state::remove_byte_at(&line, col));
            d.push_op(Operation::DeleteChar { row, col, ch: removed });
            d.dirty = true;
        }
        Operation::InsertLine { row, text } => {
            let row = clamp_insert(shift(*row, row_delta), d.store.count());
            d.store.insert_line(row, text);
            d.push_op(Operation::InsertLine { row, text: text.clone() });
            d.dirty = true;
        }
        Operation::DeleteLine { row, .. } => {
            let row = clamp_existing(shift(*row, row_delta), d.store.count());
            let removed = d.store.get(row);
            d.store.erase_line(row);
            d.push_op(Operation::DeleteLine { row, text: removed });
            d.dirty = true;
        }
        Operation::ReplaceLine { row, col, new, .. } => {
            let row = clamp_existing(shift(*row, row_delta), d.store.count());
            let old = d.store.get(row);
            d.store.replace_line(row, new);
            d.push_op(Operation::ReplaceLine {
                row,
                col: shift(*col, col_delta).max(0) as usize,
                old,
                new: new.clone(),
            });
            d.dirty = true;
        }
        Operation::InsertLinesBlock { row, block } => {
            let row = clamp_insert(shift(*row, row_delta), d.store.count());
            let lines = split_block_lines(block);
            d.store.insert_lines(row, &lines);
            d.push_op(Operation::InsertLinesBlock { row, block: block.clone() });
            d.dirty = true;
        }
        Operation::DeleteLinesBlock { row, block } => {
            let count = d.store.count();
            let row = clamp_existing(shift(*row, row_delta), count);
            if row >= count {
                return;
            }
            let span = block_line_count(block).max(1);
            let end = (row + span).min(count);
            if end <= row {
                return;
            }
            let removed = (row..end)
                .map(|r| d.store.get(r))
                .collect::<Vec<_>>()
                .join("\n");
            d.store.erase_lines(row, end);
            d.push_op(Operation::DeleteLinesBlock { row, block: removed });
            d.dirty = true;
        }
    }
}

/// `.`: replay `last_change` with the cursor delta, as one atomic group.
pub fn repeat_last_change(ed: &mut Editor) {
    let doc = ed.ws.doc();
    let Some(last) = doc.borrow().last_change.clone() else {
        ed.set_message("no last change");
        return;
    };
    if last.ops.is_empty() {
        ed.set_message("no last change");
        return;
    }
    let cur = ed.cursor();
    let row_delta = cur.row as isize - last.pre.row as isize;
    let col_delta = cur.col as isize - last.pre.col as isize;
    let target = (
        cur.row as isize + (last.post.row as isize - last.pre.row as isize),
        cur.col as isize + (last.post.col as isize - last.pre.col as isize),
    );
    ed.begin_group();
    for op in &last.ops {
        apply_operation_forward(ed, op, row_delta, col_delta);
    }
    doc.borrow_mut().log.clear_redo();
    // Land where the original change ended, shifted, clamped to the buffer.
    let mut cur = Position::new(target.0.max(0) as usize, target.1.max(0) as usize);
    edit::clamp_cursor(ed, &mut cur);
    let row = cur.row;
    cur.col = cur.col.min(ed.max_col(row));
    ed.set_cursor(cur);
    ed.commit_group();
}
