//! Visual and Visual-Line selections.
//!
//! The anchor is pinned when the mode is entered; the selection is always
//! the normalized range between anchor and cursor. Character selections are
//! inclusive of both endpoints (the exclusive end is anchor/cursor max + 1).

use core_state::{Mode, Operation};
use core_text::Position;

use crate::Editor;

pub fn enter_visual_char(ed: &mut Editor) {
    ed.decoder.pending_op = None;
    ed.visual_active = true;
    ed.visual_anchor = ed.cursor();
    ed.mode = Mode::Visual;
}

pub fn enter_visual_line(ed: &mut Editor) {
    ed.decoder.pending_op = None;
    ed.visual_active = true;
    ed.visual_anchor = Position::new(ed.cursor().row, 0);
    ed.mode = Mode::VisualLine;
}

pub fn exit_visual(ed: &mut Editor) {
    ed.decoder.pending_op = None;
    ed.visual_active = false;
    ed.mode = Mode::Normal;
}

/// Normalized selection as `(r0, r1, c0, c1)` with `r0 <= r1` and `c1`
/// exclusive. Line selections ignore the columns.
pub fn visual_range(ed: &Editor) -> (usize, usize, usize, usize) {
    let cur = ed.cursor();
    let anchor = ed.visual_anchor;
    let r0 = anchor.row.min(cur.row);
    let r1 = anchor.row.max(cur.row);
    if ed.mode == Mode::VisualLine {
        (r0, r1, 0, 0)
    } else {
        let c0 = anchor.col.min(cur.col);
        let c1 = anchor.col.max(cur.col) + 1;
        (r0, r1, c0, c1)
    }
}

/// `d` on a selection: yank it, then remove it as one undo group.
///
/// Linewise: a single `DeleteLinesBlock`. Charwise single row: one
/// `ReplaceLine`. Charwise multi row: `ReplaceLine` fusing the first row's
/// left half with the last row's right half, then one `DeleteLinesBlock`
/// covering the interior and tail rows.
pub fn delete_selection(ed: &mut Editor) {
    let (r0, r1, c0, c1) = visual_range(ed);
    ed.begin_group();
    yank_selection(ed);
    let doc = ed.ws.doc();
    let mut cur = ed.cursor();
    {
        let mut d = doc.borrow_mut();
        if ed.mode == Mode::VisualLine {
            let count = d.store.count();
            let last = r1.min(count.saturating_sub(1));
            let end = (r1 + 1).min(count);
            let block = (r0..=last)
                .map(|r| d.store.get(r))
                .collect::<Vec<_>>()
                .join("\n");
            if r0 < end {
                d.store.erase_lines(r0, end);
            }
            d.push_op(Operation::DeleteLinesBlock { row: r0, block });
            cur.row = r0.min(d.store.count().saturating_sub(1));
            cur.col = 0;
        } else if r0 == r1 {
            let line = d.store.get(r0);
            let c0 = c0.min(line.len());
            let c1 = c1.min(line.len());
            if c1 > c0 {
                let new = format!("{}{}", &line[..c0], &line[c1..]);
                d.store.replace_line(r0, &new);
                d.push_op(Operation::ReplaceLine { row: r0, col: c0, old: line, new });
            }
            cur = Position::new(r0, c0);
        } else {
            let first = d.store.get(r0);
            let last = d.store.get(r1);
            let c0 = c0.min(first.len());
            let c1 = c1.min(last.len());
            let left = &first[..c0];
            let new_first = format!("{left}{}", &last[c1..]);
            let block = (r0 + 1..=r1)
                .map(|r| d.store.get(r))
                .collect::<Vec<_>>()
                .join("\n");
            d.store.replace_line(r0, &new_first);
            d.push_op(Operation::ReplaceLine {
                row: r0,
                col: c0,
                old: first.clone(),
                new: new_first,
            });
            d.store.erase_lines(r0 + 1, r1 + 1);
            d.push_op(Operation::DeleteLinesBlock { row: r0 + 1, block });
            cur = Position::new(r0, c0);
        }
        d.dirty = true;
        d.log.clear_redo();
    }
    ed.set_cursor(cur);
    ed.commit_group();
}

/// `y` on a selection: register only, no mutation.
pub fn yank_selection(ed: &mut Editor) {
    let (r0, r1, c0, c1) = visual_range(ed);
    let doc = ed.ws.doc();
    let d = doc.borrow();
    if ed.mode == Mode::VisualLine {
        let last = r1.min(d.store.count().saturating_sub(1));
        let lines = (r0..=last).map(|r| d.store.get(r)).collect();
        drop(d);
        ed.register.set_linewise(lines);
    } else if r0 == r1 {
        let line = d.store.get(r0);
        let c0 = c0.min(line.len());
        let c1 = c1.min(line.len());
        let text = if c1 > c0 { line[c0..c1].to_string() } else { String::new() };
        drop(d);
        ed.register.set_charwise(text);
    } else {
        let first = d.store.get(r0);
        let last = d.store.get(r1);
        let c0 = c0.min(first.len());
        let c1 = c1.min(last.len());
        let mut out = String::new();
        out.push_str(&first[c0..]);
        out.push('\n');
        for r in r0 + 1..r1 {
            out.push_str(&d.store.get(r));
            out.push('\n');
        }
        out.push_str(&last[..c1]);
        drop(d);
        ed.register.set_charwise(out);
    }
}
