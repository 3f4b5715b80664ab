//! Operation-log undo/redo.
//!
//! Edits are logged as minimal reversible [`Operation`]s, aggregated into
//! [`UndoGroup`]s bounded by `begin`/`commit`. A group undoes as a unit by
//! applying each op's inverse in reverse order; redo replays the ops forward
//! in their original order. The most recently committed group doubles as the
//! payload for the dot-repeat action, so its ops must stay self-contained
//! (full payloads, no references into the store).
//!
//! Contract notes:
//! * `begin` is idempotent while a group is open.
//! * `push` outside an open group is ignored. This lets low-level edit
//!   primitives be called both standalone and from composite actions.
//! * `commit` drops empty groups; a committed group clears the redo stack.
//! * `clear_redo` must be called by every direct edit that is not itself an
//!   undo or redo.

use core_text::{Position, Store};
use tracing::trace;

/// One reversible mutation, anchored at a row (and column for char ops).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    InsertChar { row: usize, col: usize, ch: char },
    DeleteChar { row: usize, col: usize, ch: char },
    InsertLine { row: usize, text: String },
    DeleteLine { row: usize, text: String },
    /// `col` is an advisory cursor hint, not a replay anchor.
    ReplaceLine { row: usize, col: usize, old: String, new: String },
    /// `block` is the newline-joined payload; its line count (newlines + 1)
    /// defines the inverse erase range.
    InsertLinesBlock { row: usize, block: String },
    DeleteLinesBlock { row: usize, block: String },
}

/// Split a newline-joined block back into its lines. An empty block is one
/// empty line, matching the newline-count + 1 convention.
pub fn split_block_lines(block: &str) -> Vec<String> {
    block.split('\n').map(str::to_string).collect()
}

/// Number of lines a block payload represents.
pub fn block_line_count(block: &str) -> usize {
    block.matches('\n').count() + 1
}

/// Line with the byte at `at` removed (no-op when out of range).
pub fn remove_byte_at(line: &str, at: usize) -> String {
    let mut bytes = line.as_bytes().to_vec();
    if at < bytes.len() {
        bytes.remove(at);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Line with `ch` spliced in at byte offset `at` (clamped to the end).
pub fn insert_char_at(line: &str, at: usize, ch: char) -> String {
    let mut bytes = line.as_bytes().to_vec();
    let at = at.min(bytes.len());
    let mut buf = [0u8; 4];
    let encoded = ch.encode_utf8(&mut buf);
    for (i, b) in encoded.bytes().enumerate() {
        bytes.insert(at + i, b);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Apply one operation forward, exactly as it was originally recorded.
pub fn apply_forward(store: &mut Store, op: &Operation) {
    match op {
        Operation::InsertChar { row, col, ch } => {
            let line = store.get(*row);
            if *col <= line.len() {
                store.replace_line(*row, &insert_char_at(&line, *col, *ch));
            }
        }
        Operation::DeleteChar { row, col, .. } => {
            let line = store.get(*row);
            if *col < line.len() {
                store.replace_line(*row, &remove_byte_at(&line, *col));
            }
        }
        Operation::InsertLine { row, text } => {
            store.insert_line(*row, text);
        }
        Operation::DeleteLine { row, .. } => {
            if *row < store.count() {
                store.erase_line(*row);
            }
        }
        Operation::ReplaceLine { row, new, .. } => {
            if *row < store.count() {
                store.replace_line(*row, new);
            }
        }
        Operation::InsertLinesBlock { row, block } => {
            store.insert_lines(*row, &split_block_lines(block));
        }
        Operation::DeleteLinesBlock { row, block } => {
            let n = block_line_count(block);
            if row + n <= store.count() {
                store.erase_lines(*row, row + n);
            }
        }
    }
}

/// Apply the inverse of one operation.
pub fn apply_inverse(store: &mut Store, op: &Operation) {
    match op {
        Operation::InsertChar { row, col, .. } => {
            let line = store.get(*row);
            if *col < line.len() {
                store.replace_line(*row, &remove_byte_at(&line, *col));
            }
        }
        Operation::DeleteChar { row, col, ch } => {
            let line = store.get(*row);
            if *col <= line.len() {
                store.replace_line(*row, &insert_char_at(&line, *col, *ch));
            }
        }
        Operation::InsertLine { row, .. } => {
            if *row < store.count() {
                store.erase_line(*row);
            }
        }
        Operation::DeleteLine { row, text } => {
            store.insert_line(*row, text);
        }
        Operation::ReplaceLine { row, old, .. } => {
            if *row < store.count() {
                store.replace_line(*row, old);
            }
        }
        Operation::InsertLinesBlock { row, block } => {
            let n = block_line_count(block);
            if row + n <= store.count() {
                store.erase_lines(*row, row + n);
            }
        }
        Operation::DeleteLinesBlock { row, block } => {
            store.insert_lines(*row, &split_block_lines(block));
        }
    }
}

/// All operations of one user action plus the cursor at group start (`pre`)
/// and commit (`post`).
#[derive(Debug, Clone, Default)]
pub struct UndoGroup {
    pub ops: Vec<Operation>,
    pub pre: Position,
    pub post: Position,
}

#[derive(Default)]
pub struct UndoLog {
    undo: Vec<UndoGroup>,
    redo: Vec<UndoGroup>,
    grouping: bool,
    current: UndoGroup,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a group with the current cursor; a no-op if one is already open.
    pub fn begin(&mut self, pre: Position) {
        if !self.grouping {
            self.grouping = true;
            self.current.ops.clear();
            self.current.pre = pre;
        }
    }

    /// Append to the open group. Ignored when no group is open.
    pub fn push(&mut self, op: Operation) {
        if self.grouping {
            self.current.ops.push(op);
        }
    }

    /// Close the group. Empty groups are dropped; committed groups clear the
    /// redo stack. Returns true when a group was actually recorded.
    pub fn commit(&mut self, post: Position) -> bool {
        if !self.grouping {
            return false;
        }
        self.grouping = false;
        self.current.post = post;
        if self.current.ops.is_empty() {
            return false;
        }
        let group = std::mem::take(&mut self.current);
        trace!(target: "state.undo", ops = group.ops.len(), depth = self.undo.len() + 1, "commit_group");
        self.undo.push(group);
        self.redo.clear();
        true
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Most recently committed group, if any.
    pub fn last_entry(&self) -> Option<&UndoGroup> {
        self.undo.last()
    }

    /// Pop one group, apply each op's inverse in reverse order, restore the
    /// cursor to the group's `pre`, and move the group to the redo stack.
    pub fn undo(&mut self, store: &mut Store, cursor: &mut Position) -> bool {
        let Some(group) = self.undo.pop() else {
            return false;
        };
        for op in group.ops.iter().rev() {
            apply_inverse(store, op);
        }
        *cursor = group.pre;
        trace!(target: "state.undo", undo_depth = self.undo.len(), redo_depth = self.redo.len() + 1, "undo_pop");
        self.redo.push(group);
        true
    }

    /// Pop one group from redo, replay it forward, restore `post`, and move
    /// it back to the undo stack.
    pub fn redo(&mut self, store: &mut Store, cursor: &mut Position) -> bool {
        let Some(group) = self.redo.pop() else {
            return false;
        };
        for op in &group.ops {
            apply_forward(store, op);
        }
        *cursor = group.post;
        trace!(target: "state.undo", undo_depth = self.undo.len() + 1, redo_depth = self.redo.len(), "redo_pop");
        self.undo.push(group);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Backend;

    fn store(lines: &[&str]) -> Store {
        Store::from_lines(Backend::Vector, lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn push_outside_group_is_ignored() {
        let mut log = UndoLog::new();
        log.push(Operation::InsertLine { row: 0, text: "x".into() });
        assert!(!log.can_undo());
        log.begin(Position::origin());
        log.push(Operation::InsertLine { row: 0, text: "x".into() });
        assert!(log.commit(Position::origin()));
        assert!(log.can_undo());
    }

    #[test]
    fn empty_group_is_dropped() {
        let mut log = UndoLog::new();
        log.begin(Position::origin());
        assert!(!log.commit(Position::origin()));
        assert!(!log.can_undo());
    }

    #[test]
    fn begin_is_idempotent_while_open() {
        let mut log = UndoLog::new();
        log.begin(Position::new(1, 1));
        log.push(Operation::InsertLine { row: 0, text: "a".into() });
        // A second begin must not reset the staged ops or the pre cursor.
        log.begin(Position::new(5, 5));
        log.push(Operation::InsertLine { row: 1, text: "b".into() });
        assert!(log.commit(Position::new(2, 0)));
        assert_eq!(log.last_entry().unwrap().ops.len(), 2);
        assert_eq!(log.last_entry().unwrap().pre, Position::new(1, 1));
    }

    #[test]
    fn undo_reverses_group_in_reverse_order() {
        let mut s = store(&["alpha", "beta"]);
        let mut log = UndoLog::new();
        let mut cursor = Position::new(1, 0);

        log.begin(cursor);
        s.erase_line(1);
        log.push(Operation::DeleteLine { row: 1, text: "beta".into() });
        s.insert_line(1, "gamma");
        log.push(Operation::InsertLine { row: 1, text: "gamma".into() });
        cursor = Position::new(1, 0);
        log.commit(cursor);

        assert!(log.undo(&mut s, &mut cursor));
        assert_eq!(s.snapshot(), ["alpha", "beta"]);
        assert_eq!(cursor, Position::new(1, 0));
    }

    #[test]
    fn undo_then_redo_restores_bytes_and_cursor() {
        let mut s = store(&["one", "two", "three"]);
        let mut log = UndoLog::new();
        let mut cursor = Position::new(0, 0);

        for round in 0..3 {
            log.begin(cursor);
            let old = s.get(round);
            let new = format!("{old}!");
            s.replace_line(round, &new);
            log.push(Operation::ReplaceLine { row: round, col: 0, old, new });
            cursor = Position::new(round, 0);
            log.commit(cursor);
        }
        let final_snapshot = s.snapshot();
        let final_cursor = cursor;

        for _ in 0..3 {
            assert!(log.undo(&mut s, &mut cursor));
        }
        assert_eq!(s.snapshot(), ["one", "two", "three"]);
        for _ in 0..3 {
            assert!(log.redo(&mut s, &mut cursor));
        }
        assert_eq!(s.snapshot(), final_snapshot);
        assert_eq!(cursor, final_cursor);
    }

    #[test]
    fn commit_clears_redo() {
        let mut s = store(&["a"]);
        let mut log = UndoLog::new();
        let mut cursor = Position::origin();

        log.begin(cursor);
        s.insert_line(1, "b");
        log.push(Operation::InsertLine { row: 1, text: "b".into() });
        log.commit(cursor);
        assert!(log.undo(&mut s, &mut cursor));
        assert!(log.can_redo());

        log.begin(cursor);
        s.insert_line(1, "c");
        log.push(Operation::InsertLine { row: 1, text: "c".into() });
        log.commit(cursor);
        assert!(!log.can_redo(), "redo must be cleared by a new commit");
        assert!(!log.redo(&mut s, &mut cursor));
    }

    #[test]
    fn block_inverse_counts_lines_from_payload() {
        let mut s = store(&["top", "bottom"]);
        let mut log = UndoLog::new();
        let mut cursor = Position::origin();

        log.begin(cursor);
        let block = "m1\nm2\nm3";
        s.insert_lines(1, &split_block_lines(block));
        log.push(Operation::InsertLinesBlock { row: 1, block: block.into() });
        log.commit(cursor);
        assert_eq!(s.count(), 5);

        assert!(log.undo(&mut s, &mut cursor));
        assert_eq!(s.snapshot(), ["top", "bottom"]);
        assert!(log.redo(&mut s, &mut cursor));
        assert_eq!(s.snapshot(), ["top", "m1", "m2", "m3", "bottom"]);
    }

    #[test]
    fn char_ops_round_trip() {
        let mut s = store(&["hllo"]);
        let mut log = UndoLog::new();
        let mut cursor = Position::new(0, 1);

        log.begin(cursor);
        let line = s.get(0);
        s.replace_line(0, &format!("{}e{}", &line[..1], &line[1..]));
        log.push(Operation::InsertChar { row: 0, col: 1, ch: 'e' });
        cursor = Position::new(0, 2);
        log.commit(cursor);
        assert_eq!(s.get(0), "hello");

        assert!(log.undo(&mut s, &mut cursor));
        assert_eq!(s.get(0), "hllo");
        assert_eq!(cursor, Position::new(0, 1));
        assert!(log.redo(&mut s, &mut cursor));
        assert_eq!(s.get(0), "hello");
        assert_eq!(cursor, Position::new(0, 2));
    }
}
