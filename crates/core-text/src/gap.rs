//! Gap backend: the whole text in one byte array with a movable gap, plus a
//! two-level line index mapping row -> byte offset of line start.
//!
//! Every mutation moves the gap to the edit site, grows it when free capacity
//! is short (by double the deficit), applies the byte edit, and rebuilds the
//! line index from scratch. The rebuild is O(text size); the trade is byte
//! level flexibility for per-edit cost.

use crate::LineStore;

const INDEX_BLOCK_ROWS: usize = 1024;

#[derive(Debug, Default, Clone)]
struct GapBuffer {
    buf: Vec<u8>,
    gap_start: usize,
    gap_end: usize,
}

impl GapBuffer {
    fn len(&self) -> usize {
        self.buf.len() - (self.gap_end - self.gap_start)
    }

    fn init_from_lines(&mut self, lines: &[String]) {
        let mut total = 0;
        if !lines.is_empty() {
            total = lines.iter().map(String::len).sum::<usize>() + lines.len() - 1;
        }
        self.buf = Vec::with_capacity(total);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.buf.push(b'\n');
            }
            self.buf.extend_from_slice(line.as_bytes());
        }
        self.gap_start = self.buf.len();
        self.gap_end = self.buf.len();
    }

    /// Grow the gap so at least `need` free bytes are available. New capacity
    /// adds twice the deficit so repeated inserts amortize.
    fn ensure_gap(&mut self, need: usize) {
        let avail = self.gap_end - self.gap_start;
        if avail >= need {
            return;
        }
        let grow = need - avail;
        let mut nb = vec![0u8; self.buf.len() + 2 * grow];
        nb[..self.gap_start].copy_from_slice(&self.buf[..self.gap_start]);
        let new_gap_end = self.gap_start + avail + 2 * grow;
        nb[new_gap_end..].copy_from_slice(&self.buf[self.gap_end..]);
        self.buf = nb;
        self.gap_end = new_gap_end;
    }

    /// Move the gap so it starts at logical position `pos`.
    fn move_gap_to(&mut self, pos: usize) {
        if pos == self.gap_start {
            return;
        }
        if pos < self.gap_start {
            let delta = self.gap_start - pos;
            self.buf.copy_within(pos..self.gap_start, self.gap_end - delta);
            self.gap_start -= delta;
            self.gap_end -= delta;
        } else {
            let delta = pos - self.gap_start;
            self.buf
                .copy_within(self.gap_end..self.gap_end + delta, self.gap_start);
            self.gap_start += delta;
            self.gap_end += delta;
        }
    }

    fn insert_text(&mut self, text: &[u8]) {
        self.ensure_gap(text.len());
        self.buf[self.gap_start..self.gap_start + text.len()].copy_from_slice(text);
        self.gap_start += text.len();
    }

    fn erase_range(&mut self, pos: usize, len: usize) {
        self.move_gap_to(pos);
        self.gap_end = (self.gap_end + len).min(self.buf.len());
    }

    fn slice(&self, pos: usize, len: usize) -> String {
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let p = pos + i;
            let phys = if p < self.gap_start {
                p
            } else {
                p + (self.gap_end - self.gap_start)
            };
            out.push(self.buf[phys]);
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    fn logical_byte(&self, i: usize) -> u8 {
        if i < self.gap_start {
            self.buf[i]
        } else {
            self.buf[i + (self.gap_end - self.gap_start)]
        }
    }
}

/// Row -> line-start offsets, stored as fixed-size blocks of relative offsets
/// against a per-block base. Lookup is two levels: find the block, then index
/// into its relatives.
#[derive(Debug, Default, Clone)]
struct LineIndex {
    blocks: Vec<LineBlock>,
}

#[derive(Debug, Clone)]
struct LineBlock {
    base_offset: usize,
    rel: Vec<usize>,
}

impl LineIndex {
    fn rebuild(&mut self, gb: &GapBuffer) {
        self.blocks.clear();
        let len = gb.len();
        let mut starts = vec![0usize];
        for i in 0..len {
            if gb.logical_byte(i) == b'\n' {
                starts.push(i + 1);
            }
        }
        for chunk in starts.chunks(INDEX_BLOCK_ROWS) {
            let base_offset = chunk[0];
            self.blocks.push(LineBlock {
                base_offset,
                rel: chunk.iter().map(|s| s - base_offset).collect(),
            });
        }
    }

    fn line_count(&self) -> usize {
        self.blocks.iter().map(|b| b.rel.len()).sum()
    }

    fn line_start(&self, row: usize) -> usize {
        let mut acc = 0;
        for b in &self.blocks {
            if row < acc + b.rel.len() {
                return b.base_offset + b.rel[row - acc];
            }
            acc += b.rel.len();
        }
        match self.blocks.last() {
            Some(b) => b.base_offset + b.rel.last().copied().unwrap_or(0),
            None => 0,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct GapStore {
    gb: GapBuffer,
    index: LineIndex,
}

impl GapStore {
    fn rebuild(&mut self) {
        self.index.rebuild(&self.gb);
    }

    /// Byte range `[start, end)` covering rows `[start_row, end_row)`. An
    /// erase reaching the last row consumes the newline before it instead of
    /// the one after, so no phantom empty line is left behind.
    fn row_range(&self, start_row: usize, end_row: usize) -> (usize, usize) {
        let count = self.index.line_count();
        if end_row < count {
            (self.index.line_start(start_row), self.index.line_start(end_row))
        } else if start_row == 0 {
            (0, self.gb.len())
        } else {
            (self.index.line_start(start_row) - 1, self.gb.len())
        }
    }
}

impl LineStore for GapStore {
    fn init(&mut self, lines: Vec<String>) {
        self.gb.init_from_lines(&lines);
        self.rebuild();
    }

    fn count(&self) -> usize {
        self.index.line_count()
    }

    fn get(&self, r: usize) -> String {
        let count = self.index.line_count();
        if r >= count {
            return String::new();
        }
        let start = self.index.line_start(r);
        let end = if r + 1 < count {
            self.index.line_start(r + 1)
        } else {
            self.gb.len()
        };
        let mut len = end.saturating_sub(start);
        if r + 1 < count && len > 0 {
            len -= 1; // drop the separating newline
        }
        self.gb.slice(start, len)
    }

    fn insert_line(&mut self, r: usize, s: &str) {
        let count = self.index.line_count();
        let r = r.min(count);
        if count == 0 {
            self.gb.move_gap_to(0);
            self.gb.insert_text(s.as_bytes());
        } else if r < count {
            let pos = self.index.line_start(r);
            self.gb.move_gap_to(pos);
            let mut ins = s.as_bytes().to_vec();
            ins.push(b'\n');
            self.gb.insert_text(&ins);
        } else {
            let pos = self.gb.len();
            self.gb.move_gap_to(pos);
            let mut ins = vec![b'\n'];
            ins.extend_from_slice(s.as_bytes());
            self.gb.insert_text(&ins);
        }
        self.rebuild();
    }

    fn insert_lines(&mut self, r: usize, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let count = self.index.line_count();
        let r = r.min(count);
        let mut joined = lines.join("\n").into_bytes();
        if count == 0 {
            self.gb.move_gap_to(0);
            self.gb.insert_text(&joined);
        } else if r < count {
            let pos = self.index.line_start(r);
            self.gb.move_gap_to(pos);
            joined.push(b'\n');
            self.gb.insert_text(&joined);
        } else {
            let pos = self.gb.len();
            self.gb.move_gap_to(pos);
            let mut ins = vec![b'\n'];
            ins.append(&mut joined);
            self.gb.insert_text(&ins);
        }
        self.rebuild();
    }

    fn erase_line(&mut self, r: usize) {
        self.erase_lines(r, r + 1);
    }

    fn erase_lines(&mut self, start: usize, end: usize) {
        let count = self.index.line_count();
        let end = end.max(start).min(count);
        if start >= count || start == end {
            return;
        }
        let (byte_start, byte_end) = self.row_range(start, end);
        self.gb.erase_range(byte_start, byte_end - byte_start);
        self.rebuild();
    }

    fn replace_line(&mut self, r: usize, s: &str) {
        let count = self.index.line_count();
        if r >= count {
            return;
        }
        let start = self.index.line_start(r);
        let end = if r + 1 < count {
            self.index.line_start(r + 1)
        } else {
            self.gb.len()
        };
        let len = end - start;
        let content_len = if r + 1 < count && len > 0 { len - 1 } else { len };
        self.gb.move_gap_to(start);
        self.gb.erase_range(start, content_len);
        self.gb.insert_text(s.as_bytes());
        self.rebuild();
    }

    fn name(&self) -> &'static str {
        "gap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(lines: &[&str]) -> GapStore {
        let mut s = GapStore::default();
        s.init(lines.iter().map(|l| l.to_string()).collect());
        s
    }

    fn snapshot(s: &GapStore) -> Vec<String> {
        (0..s.count()).map(|r| s.get(r)).collect()
    }

    #[test]
    fn init_and_get() {
        let s = store(&["alpha", "beta", ""]);
        assert_eq!(s.count(), 3);
        assert_eq!(s.get(0), "alpha");
        assert_eq!(s.get(1), "beta");
        assert_eq!(s.get(2), "");
    }

    #[test]
    fn insert_middle_and_append() {
        let mut s = store(&["a", "c"]);
        s.insert_line(1, "b");
        assert_eq!(snapshot(&s), ["a", "b", "c"]);
        s.insert_line(3, "d");
        assert_eq!(snapshot(&s), ["a", "b", "c", "d"]);
    }

    #[test]
    fn erase_last_line_consumes_separator() {
        let mut s = store(&["a", "b"]);
        s.erase_line(1);
        assert_eq!(snapshot(&s), ["a"]);
    }

    #[test]
    fn erase_all_rows() {
        let mut s = store(&["a", "b", "c"]);
        s.erase_lines(0, 3);
        // The raw backend represents empty text as one empty line.
        assert_eq!(snapshot(&s), [""]);
    }

    #[test]
    fn replace_keeps_neighbors() {
        let mut s = store(&["one", "two", "three"]);
        s.replace_line(1, "longer than before");
        assert_eq!(snapshot(&s), ["one", "longer than before", "three"]);
        s.replace_line(2, "x");
        assert_eq!(snapshot(&s), ["one", "longer than before", "x"]);
    }

    #[test]
    fn gap_growth_survives_many_inserts() {
        let mut s = store(&[""]);
        for i in 0..300 {
            s.insert_line(s.count(), &format!("line {i} with some padding text"));
        }
        assert_eq!(s.count(), 301);
        assert_eq!(s.get(300), "line 299 with some padding text");
    }

    #[test]
    fn index_spans_multiple_blocks() {
        let lines: Vec<String> = (0..3000).map(|i| format!("row{i}")).collect();
        let mut s = GapStore::default();
        s.init(lines);
        assert_eq!(s.count(), 3000);
        assert_eq!(s.get(0), "row0");
        assert_eq!(s.get(1024), "row1024");
        assert_eq!(s.get(2999), "row2999");
    }
}
