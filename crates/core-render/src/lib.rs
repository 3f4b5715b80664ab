//! Screen drawing over the terminal adapter.
//!
//! Stateless against the editor: each frame reads pane geometry, scrolls
//! viewports to keep cursors visible, and draws text, gutters, selection and
//! search highlights, the status line, and the command line. All layout math
//! is integer cell arithmetic; the adapter does the actual painting.

use core_actions::Editor;
use core_model::Rect;
use core_state::Mode;
use core_terminal::Terminal;

const WELCOME: [&str; 4] = [
    "V     V    I    X   X",
    " V   V     I     X X ",
    "  V V      I     X X ",
    "   V     III    X   X",
];

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "NORMAL",
        Mode::Insert => "INSERT",
        Mode::Command => "COMMAND",
        Mode::Visual => "VISUAL",
        Mode::VisualLine => "VISUAL-LINE",
    }
}

fn number_gutter(line_count: usize, enabled: bool) -> (usize, usize) {
    if !enabled {
        return (0, 0);
    }
    let mut digits = 1;
    let mut total = line_count.max(1);
    while total >= 10 {
        total /= 10;
        digits += 1;
    }
    (digits, digits + 1)
}

/// Draw one full frame and park the hardware cursor on the active pane's
/// cursor cell. Also records the active pane's text height back onto the
/// editor for the half-page motions.
pub fn render(term: &mut dyn Terminal, ed: &mut Editor) {
    term.set_background(ed.background);
    term.set_search_highlight(ed.search_color);
    term.clear();

    let (rows, cols) = term.size();
    ed.set_screen(rows, cols);
    let area = ed.pane_area();
    let rects = ed.ws.collect(area);
    let active = ed.ws.active_id();
    let mut cursor_cell = None;

    for (pane_id, rect) in &rects {
        let is_active = *pane_id == active;
        if is_active {
            ed.last_text_height = rect.height as usize;
        }
        if let Some(cell) = draw_pane(term, ed, *pane_id, *rect, is_active) {
            cursor_cell = Some(cell);
        }
    }

    draw_status_line(term, ed, rows, cols);
    if ed.mode == Mode::Command {
        // The command line owns the hardware cursor while active.
        let prompt_len = if ed.cmdline.starts_with('/') || ed.cmdline.starts_with('?') {
            ed.cmdline.len()
        } else {
            ed.cmdline.len() + 1
        };
        cursor_cell = Some((rows.saturating_sub(1), (prompt_len as u16).min(cols.saturating_sub(1))));
    }
    if let Some((row, col)) = cursor_cell {
        term.move_cursor(row, col);
    }
    term.refresh();
}

fn draw_pane(
    term: &mut dyn Terminal,
    ed: &mut Editor,
    pane_id: usize,
    rect: Rect,
    is_active: bool,
) -> Option<(u16, u16)> {
    let doc = ed.ws.pane_by_id(pane_id)?.doc.clone();
    let d = doc.borrow();
    let line_count = d.store.count();
    let (digits, gutter) = number_gutter(line_count, ed.options.show_numbers);
    let text_cols = (rect.width as usize).saturating_sub(gutter);
    let text_rows = rect.height as usize;
    if text_rows == 0 || text_cols == 0 {
        return None;
    }

    // Keep the pane's own cursor inside its viewport.
    let cur = ed.ws.pane_by_id(pane_id)?.cursor;
    {
        let pane = ed.ws.pane_by_id_mut(pane_id)?;
        if cur.row < pane.vp.top_line {
            pane.vp.top_line = cur.row;
        }
        if cur.row >= pane.vp.top_line + text_rows {
            pane.vp.top_line = cur.row + 1 - text_rows;
        }
        if cur.col < pane.vp.left_col {
            pane.vp.left_col = cur.col;
        }
        if cur.col >= pane.vp.left_col + text_cols {
            pane.vp.left_col = cur.col + 1 - text_cols;
        }
    }
    let vp = ed.ws.pane_by_id(pane_id)?.vp;

    let untitled_and_empty =
        d.path.is_none() && line_count == 1 && d.store.line_len(0) == 0 && !d.dirty;
    if untitled_and_empty && is_active && ed.ws.pane_count() == 1 {
        draw_welcome(term, rect);
        return Some((rect.row, rect.col));
    }

    let selection = if is_active && ed.visual_active {
        Some(core_actions::visual::visual_range(ed))
    } else {
        None
    };

    for i in 0..text_rows {
        let line_idx = vp.top_line + i;
        if line_idx >= line_count {
            break;
        }
        let screen_row = rect.row + i as u16;
        let line = d.store.get(line_idx);
        let start = vp.left_col.min(line.len());
        let end = (start + text_cols).min(line.len());
        let visible = &line[start..end];

        if ed.options.show_numbers {
            let shown = if ed.options.relative_numbers && line_idx != cur.row {
                line_idx.abs_diff(cur.row)
            } else {
                line_idx + 1
            };
            let num = format!("{shown:>digits$} ");
            term.draw_text(screen_row, rect.col, &num);
        }
        let text_col = rect.col + gutter as u16;

        let highlight = selection.and_then(|(r0, r1, c0, c1)| {
            if line_idx < r0 || line_idx > r1 {
                return None;
            }
            if ed.mode == Mode::VisualLine {
                return Some((0, visible.len()));
            }
            // Character selection: clip the inclusive span to this row and
            // the visible window.
            let row_start = if line_idx == r0 { c0 } else { 0 };
            let row_end = if line_idx == r1 { c1 } else { line.len() };
            let s = row_start.max(start).min(end) - start;
            let e = row_end.max(start).min(end) - start;
            (e > s).then_some((s, e - s))
        });

        if let Some((hl_start, hl_len)) = highlight {
            term.draw_highlighted(screen_row, text_col, visible, hl_start, hl_len);
        } else if is_active && !ed.search_hits.is_empty() {
            draw_with_search_hits(term, ed, screen_row, text_col, line_idx, visible, start);
        } else {
            term.draw_text(screen_row, text_col, visible);
        }
    }

    if !is_active {
        return None;
    }
    let screen_row = rect.row + (cur.row - vp.top_line) as u16;
    let screen_col = rect.col + gutter as u16 + cur.col.saturating_sub(vp.left_col) as u16;
    Some((screen_row, screen_col.min(rect.col + rect.width.saturating_sub(1))))
}

fn draw_with_search_hits(
    term: &mut dyn Terminal,
    ed: &Editor,
    screen_row: u16,
    text_col: u16,
    line_idx: usize,
    visible: &str,
    window_start: usize,
) {
    let mut drawn = false;
    for hit in ed.search_hits.iter().filter(|h| h.row == line_idx) {
        let s = hit.col.max(window_start);
        let e = (hit.col + hit.len).min(window_start + visible.len());
        if e <= s {
            continue;
        }
        if !drawn {
            term.draw_highlighted(screen_row, text_col, visible, s - window_start, e - s);
            drawn = true;
        } else {
            // Further hits on the same row only need their span restyled.
            let span = &visible[s - window_start..e - window_start];
            term.draw_highlighted(screen_row, text_col + (s - window_start) as u16, span, 0, span.len());
        }
    }
    if !drawn {
        term.draw_text(screen_row, text_col, visible);
    }
}

fn draw_welcome(term: &mut dyn Terminal, rect: Rect) {
    let art_rows = WELCOME.len() as u16;
    let start_row = rect.row + rect.height.saturating_sub(art_rows) / 2;
    for (i, line) in WELCOME.iter().enumerate() {
        let width = line.len() as u16;
        let start_col = rect.col + rect.width.saturating_sub(width) / 2;
        if start_row + (i as u16) < rect.row + rect.height {
            term.draw_text(start_row + i as u16, start_col, line);
        }
    }
}

fn draw_status_line(term: &mut dyn Terminal, ed: &Editor, rows: u16, cols: u16) {
    if rows == 0 {
        return;
    }
    let row = rows - 1;
    let status = if ed.mode == Mode::Command {
        if ed.cmdline.starts_with('/') || ed.cmdline.starts_with('?') {
            ed.cmdline.clone()
        } else {
            format!(":{}", ed.cmdline)
        }
    } else {
        let doc = ed.ws.doc();
        let d = doc.borrow();
        let name = d
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[no file]".to_string());
        let cur = ed.ws.pane().cursor;
        let mut s = format!(
            "{}  {}{}  row:{} col:{}",
            mode_label(ed.mode),
            name,
            if d.dirty { " [+]" } else { "" },
            cur.row + 1,
            cur.col + 1
        );
        if !ed.message.is_empty() {
            s.push_str("  | ");
            s.push_str(&ed.message);
        }
        s
    };
    let clipped: String = status.chars().take(cols as usize).collect();
    term.draw_text(row, 0, &clipped);
    term.clear_to_eol(row, clipped.len() as u16);
}
