//! Word-class motion primitives.
//!
//! Bytes fall into three classes: whitespace, word (alphanumeric plus
//! underscore), and symbol (everything else). Motions walk class runs,
//! wrapping across lines; on entering a new line the column resets to 0 and
//! the class logic re-enters from there.

use crate::{Position, Store};

pub fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace()
}

pub fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub fn is_symbol(b: u8) -> bool {
    !is_space(b) && !is_word(b)
}

/// Advance to the last byte of the class run starting at `col`.
fn run_end(bytes: &[u8], mut col: usize) -> usize {
    let len = bytes.len();
    let same: fn(u8) -> bool = if is_word(bytes[col]) { is_word } else { is_symbol };
    while col + 1 < len && same(bytes[col + 1]) {
        col += 1;
    }
    col
}

/// Column where the next word (or symbol run) starts on this line, or the
/// line length when the run reaches the end. Used by the `dw`/`yw` operators,
/// which never cross lines.
pub fn next_word_start_same_line(line: &str, col: usize) -> usize {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut col = col.min(len);
    if col >= len {
        return len;
    }
    if is_space(bytes[col]) {
        while col < len && is_space(bytes[col]) {
            col += 1;
        }
        return col;
    }
    col = run_end(bytes, col);
    (col + 1).min(len)
}

/// Column one past the end of the current (or next) class run on this line.
/// Used by the `de`/`ye` operators.
pub fn next_word_end_same_line(line: &str, col: usize) -> usize {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut col = col.min(len);
    if col >= len {
        return len;
    }
    if is_space(bytes[col]) {
        while col < len && is_space(bytes[col]) {
            col += 1;
        }
        if col >= len {
            return len;
        }
    }
    col = run_end(bytes, col);
    (col + 1).min(len)
}

/// `w`: advance past the current class run to the start of the next
/// non-space run, wrapping lines.
pub fn word_forward(store: &Store, pos: &mut Position) {
    loop {
        let line = store.get(pos.row);
        let bytes = line.as_bytes();
        let len = bytes.len();
        if pos.col >= len {
            if pos.row + 1 >= store.count() {
                pos.col = len;
                return;
            }
            pos.row += 1;
            pos.col = 0;
            continue;
        }
        if is_space(bytes[pos.col]) {
            while pos.col < len && is_space(bytes[pos.col]) {
                pos.col += 1;
            }
            if pos.col < len {
                return;
            }
        } else {
            pos.col = run_end(bytes, pos.col);
            if pos.col + 1 < len {
                pos.col += 1;
                while pos.col < len && is_space(bytes[pos.col]) {
                    pos.col += 1;
                }
                if pos.col < len {
                    return;
                }
            }
        }
        if pos.row + 1 >= store.count() {
            pos.col = len;
            return;
        }
        pos.row += 1;
        pos.col = 0;
    }
}

/// `e`: advance to the last byte of the current or next class run, wrapping
/// lines when the run ends at a line boundary.
pub fn word_end(store: &Store, pos: &mut Position) {
    loop {
        let line = store.get(pos.row);
        let bytes = line.as_bytes();
        let len = bytes.len();
        if pos.col >= len {
            if pos.row + 1 >= store.count() {
                pos.col = len;
                return;
            }
            pos.row += 1;
            pos.col = 0;
            continue;
        }
        let c = bytes[pos.col];
        if is_space(c) {
            while pos.col < len && is_space(bytes[pos.col]) {
                pos.col += 1;
            }
            if pos.col >= len {
                if pos.row + 1 >= store.count() {
                    pos.col = len;
                    return;
                }
                pos.row += 1;
                pos.col = 0;
                continue;
            }
            pos.col = run_end(bytes, pos.col);
            return;
        }
        if is_word(c) {
            if pos.col + 1 < len && is_word(bytes[pos.col + 1]) {
                pos.col = run_end(bytes, pos.col);
                return;
            }
            if pos.col + 1 < len && is_symbol(bytes[pos.col + 1]) {
                pos.col += 1;
                return;
            }
            // Already at the end of a word run: seek the next run's end.
            pos.col += 1;
            while pos.col < len && is_space(bytes[pos.col]) {
                pos.col += 1;
            }
            if pos.col >= len {
                if pos.row + 1 >= store.count() {
                    pos.col = len;
                    return;
                }
                pos.row += 1;
                pos.col = 0;
                let next = store.get(pos.row);
                let nb = next.as_bytes();
                let nlen = nb.len();
                while pos.col < nlen && is_space(nb[pos.col]) {
                    pos.col += 1;
                }
                if pos.col < nlen {
                    pos.col = run_end(nb, pos.col);
                }
                return;
            }
            pos.col = run_end(bytes, pos.col);
            return;
        }
        // Symbol under the cursor.
        if pos.col + 1 < len && is_symbol(bytes[pos.col + 1]) {
            pos.col = run_end(bytes, pos.col);
            return;
        }
        pos.col += 1;
    }
}

/// `b`: mirror of `w`, moving left to the start of the previous class run.
pub fn word_backward(store: &Store, pos: &mut Position) {
    loop {
        let line = store.get(pos.row);
        let bytes = line.as_bytes();
        let len = bytes.len();
        if pos.col == 0 {
            if pos.row == 0 {
                return;
            }
            pos.row -= 1;
            pos.col = store.line_len(pos.row);
            continue;
        }
        pos.col -= 1;
        let cc = if pos.col < len { bytes[pos.col] } else { b' ' };
        if is_space(cc) {
            while pos.col > 0 && is_space(bytes[pos.col]) {
                pos.col -= 1;
            }
            if pos.col == 0 {
                return;
            }
            if is_word(bytes[pos.col]) {
                while pos.col > 0 && is_word(bytes[pos.col - 1]) {
                    pos.col -= 1;
                }
            } else {
                while pos.col > 0 && is_symbol(bytes[pos.col - 1]) {
                    pos.col -= 1;
                }
            }
            return;
        }
        if is_word(cc) {
            while pos.col > 0 && is_word(bytes[pos.col - 1]) {
                pos.col -= 1;
            }
        } else {
            while pos.col > 0 && is_symbol(bytes[pos.col - 1]) {
                pos.col -= 1;
            }
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Backend;

    fn store(lines: &[&str]) -> Store {
        Store::from_lines(Backend::Vector, lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn word_forward_classes() {
        // Word run, space run, word, symbol, word. Expected stops: 9, 12, 13.
        let s = store(&["foo_bar  baz(qux)"]);
        let mut pos = Position::origin();
        word_forward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 9));
        word_forward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 12));
        word_forward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 13));
    }

    #[test]
    fn word_end_lands_on_last_byte_of_run() {
        let s = store(&["foo_bar  baz(qux)"]);
        let mut pos = Position::origin();
        word_end(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 6));
    }

    #[test]
    fn word_forward_wraps_lines() {
        let s = store(&["abc", "  def ghi"]);
        let mut pos = Position::new(0, 2);
        word_forward(&s, &mut pos);
        // Column resets to 0 on the new line and re-enters the class logic:
        // leading spaces are skipped, landing on the first run.
        assert_eq!(pos, Position::new(1, 2));
    }

    #[test]
    fn word_forward_stops_at_buffer_end() {
        let s = store(&["abc"]);
        let mut pos = Position::new(0, 1);
        word_forward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 3));
        word_forward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 3));
    }

    #[test]
    fn word_backward_over_runs() {
        let s = store(&["foo_bar  baz(qux)"]);
        let mut pos = Position::new(0, 13);
        word_backward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 12));
        word_backward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 9));
        word_backward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 0));
    }

    #[test]
    fn word_backward_wraps_to_previous_line() {
        let s = store(&["tail", "head"]);
        let mut pos = Position::new(1, 0);
        word_backward(&s, &mut pos);
        assert_eq!(pos, Position::new(0, 0));
    }

    #[test]
    fn same_line_operator_spans() {
        let line = "foo_bar  baz(qux)";
        assert_eq!(next_word_start_same_line(line, 0), 7);
        assert_eq!(next_word_start_same_line(line, 7), 9);
        assert_eq!(next_word_end_same_line(line, 0), 7);
        assert_eq!(next_word_end_same_line(line, 7), 12);
        assert_eq!(next_word_end_same_line(line, 17), 17);
    }
}
