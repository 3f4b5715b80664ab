//! Pane lifecycle: opening documents (shared by canonical path), splits,
//! closing, focus movement, and mouse routing.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use core_state::{Document, Mode};
use core_model::{DocHandle, FocusDir, Orientation, Pane, PaneId};
use core_text::{Backend, Position};
use tracing::info;

use crate::{insert, io_ops, Editor, MouseGesture};

/// Read (or create empty) a document for `path`. Read failures leave an
/// empty document carrying the path so a later `:w` can create the file.
pub fn open_document(backend: Backend, path: Option<&Path>, message: &mut String) -> DocHandle {
    let doc = match path {
        Some(p) => match io_ops::read_lines(p) {
            Ok(lines) => {
                *message = format!("opened file: {}", p.display());
                Document::from_lines(backend, lines, Some(p.to_path_buf()))
            }
            Err(e) => {
                *message = e.to_string();
                Document::from_lines(backend, vec![String::new()], Some(p.to_path_buf()))
            }
        },
        None => Document::untitled(backend),
    };
    Rc::new(RefCell::new(doc))
}

/// Share a live document for `path` or open it fresh and register it.
pub fn open_or_share(ed: &mut Editor, path: &Path) -> DocHandle {
    if let Some(existing) = ed.ws.docs.lookup(path) {
        info!(target: "model.docs", path = %path.display(), "document_shared");
        return existing;
    }
    let mut message = String::new();
    let doc = open_document(ed.backend, Some(path), &mut message);
    ed.set_message(message);
    ed.ws.docs.register(path, &doc);
    doc
}

/// Switch the active pane, committing any in-flight insert mirror and
/// dropping per-pane transient state (latches, selection, search
/// highlights).
pub fn set_active_pane(ed: &mut Editor, id: PaneId) {
    if id == ed.ws.active_id() {
        return;
    }
    insert::commit_insert_buffer(ed);
    if !ed.ws.set_active(id) {
        return;
    }
    ed.decoder.reset();
    ed.visual_active = false;
    if matches!(ed.mode, Mode::Visual | Mode::VisualLine) {
        ed.mode = Mode::Normal;
    }
    ed.search_hits.clear();
}

/// `:vsplit` / `:hsplit`. Without a path the new pane shares the current
/// document (the multi-view case); with a path it opens or shares that file.
pub fn split(ed: &mut Editor, orient: Orientation, file: Option<&Path>) {
    let doc = match file {
        Some(path) => open_or_share(ed, path),
        None => ed.ws.doc(),
    };
    if let Some(new_id) = ed.ws.split_active(orient, Pane::new(doc)) {
        set_active_pane(ed, new_id);
    }
}

/// Close the active pane; refuses on the last one.
pub fn close_active_pane(ed: &mut Editor) -> bool {
    insert::commit_insert_buffer(ed);
    if !ed.ws.close_active() {
        return false;
    }
    ed.decoder.reset();
    ed.visual_active = false;
    ed.search_hits.clear();
    true
}

/// `:q` / `:q!` / the closing half of `:wq`. With several panes open this
/// closes the active one; the last pane quits the editor. An unsaved
/// document blocks both unless forced.
pub fn close_or_quit(ed: &mut Editor, force: bool) -> bool {
    let dirty = ed.ws.doc().borrow().dirty;
    if ed.ws.pane_count() > 1 {
        if !force && dirty {
            ed.set_message("have unsaved changes, use :q! or :w");
            return false;
        }
        if !close_active_pane(ed) {
            ed.set_message("cannot close pane");
            return false;
        }
        return true;
    }
    if !force && dirty {
        ed.set_message("have unsaved changes, use :q! or :w");
        return false;
    }
    ed.should_quit = true;
    true
}

/// `:edit` target into an existing pane: share by canonical path when the
/// file is already open elsewhere, else load it fresh.
pub fn open_path_in_pane(ed: &mut Editor, id: PaneId, path: &Path) {
    let doc = open_or_share(ed, path);
    if let Some(pane) = ed.ws.pane_by_id_mut(id) {
        pane.doc = doc;
        pane.cursor = Position::origin();
        pane.vp = Default::default();
    }
    if id == ed.ws.active_id() {
        ed.search_hits.clear();
    }
}

/// Ctrl-W w: round-robin focus over the layout traversal order.
pub fn focus_next(ed: &mut Editor) {
    let next = ed.ws.next_pane();
    set_active_pane(ed, next);
}

/// Ctrl-W h/j/k/l: nearest pane center on that side; falls back to cycling.
pub fn focus_direction(ed: &mut Editor, dir: char) {
    let rects = ed.ws.collect(ed.pane_area());
    if rects.len() <= 1 {
        return;
    }
    let dir = match dir {
        'h' => FocusDir::Left,
        'j' => FocusDir::Down,
        'k' => FocusDir::Up,
        _ => FocusDir::Right,
    };
    match core_model::focus_target(&rects, ed.ws.active_id(), dir) {
        Some(target) => set_active_pane(ed, target),
        None => focus_next(ed),
    }
}

/// Decode a mouse gesture against the pane geometry: clicks focus the pane
/// under the pointer and reposition the cursor (honoring the number gutter
/// and `onemore`); the wheel scrolls the viewport without moving the cursor.
pub fn handle_mouse(ed: &mut Editor, gesture: MouseGesture, row: u16, col: u16) {
    let rects = ed.ws.collect(ed.pane_area());
    let Some((pane_id, rect)) = rects
        .iter()
        .find(|(_, r)| r.contains(row, col))
        .copied()
    else {
        return;
    };
    set_active_pane(ed, pane_id);
    let text_rows = rect.height as usize;
    if text_rows == 0 {
        return;
    }
    match gesture {
        MouseGesture::WheelUp | MouseGesture::WheelDown => {
            let step = (text_rows / 6).max(1);
            let line_count = ed.ws.doc().borrow().line_count();
            let max_top = line_count.saturating_sub(text_rows);
            let pane = ed.ws.pane_mut();
            pane.vp.top_line = match gesture {
                MouseGesture::WheelUp => pane.vp.top_line.saturating_sub(step),
                _ => (pane.vp.top_line + step).min(max_top),
            };
        }
        MouseGesture::LeftClick => {
            let doc = ed.ws.doc();
            let line_count = doc.borrow().line_count();
            let gutter = if ed.options.show_numbers {
                let mut digits = 1;
                let mut total = line_count.max(1);
                while total >= 10 {
                    total /= 10;
                    digits += 1;
                }
                digits + 1
            } else {
                0
            };
            let screen_row = (row - rect.row) as usize;
            let screen_col = (col - rect.col) as usize;
            if screen_col < gutter {
                return;
            }
            let pane = ed.ws.pane();
            let buf_row = (pane.vp.top_line + screen_row).min(line_count.saturating_sub(1));
            let buf_col = pane.vp.left_col + (screen_col - gutter);
            let max_col = doc.borrow().max_col(buf_row, ed.options.onemore);
            ed.set_cursor(Position::new(buf_row, buf_col.min(max_col)));
        }
    }
}
