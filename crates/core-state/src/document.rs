//! One editable buffer: a line store, its undo log, the file it came from,
//! and the most recently committed change group (the dot-repeat payload).

use std::path::PathBuf;

use core_text::{Backend, Position, Store};
use tracing::trace;

use crate::undo::{UndoGroup, UndoLog};

pub struct Document {
    pub store: Store,
    pub log: UndoLog,
    /// Deep copy of the last committed group, kept per document so `.` in one
    /// pane replays the right history even with several documents open.
    pub last_change: Option<UndoGroup>,
    pub path: Option<PathBuf>,
    pub dirty: bool,
}

impl Document {
    /// Untitled document with a single empty line.
    pub fn untitled(backend: Backend) -> Self {
        Self {
            store: Store::new(backend),
            log: UndoLog::new(),
            last_change: None,
            path: None,
            dirty: false,
        }
    }

    pub fn from_lines(backend: Backend, lines: Vec<String>, path: Option<PathBuf>) -> Self {
        Self {
            store: Store::from_lines(backend, lines),
            log: UndoLog::new(),
            last_change: None,
            path,
            dirty: false,
        }
    }

    pub fn line(&self, r: usize) -> String {
        self.store.get(r)
    }

    pub fn line_count(&self) -> usize {
        self.store.count()
    }

    /// Highest column the cursor may rest on in row `r`. With `onemore` the
    /// virtual end-of-line column is reachable.
    pub fn max_col(&self, r: usize, onemore: bool) -> usize {
        if r >= self.store.count() {
            return 0;
        }
        let len = self.store.line_len(r);
        if onemore {
            len
        } else {
            len.saturating_sub(1)
        }
    }

    pub fn begin_group(&mut self, pre: Position) {
        self.log.begin(pre);
    }

    pub fn push_op(&mut self, op: crate::undo::Operation) {
        self.log.push(op);
    }

    /// Close the open group and, if it recorded anything, stamp it as the
    /// document's last change.
    pub fn commit_group(&mut self, post: Position) {
        if self.log.commit(post) {
            self.last_change = self.log.last_entry().cloned();
            trace!(target: "state.undo", has_last_change = true, "last_change_stamped");
        }
    }

    pub fn undo(&mut self, cursor: &mut Position) -> bool {
        let applied = self.log.undo(&mut self.store, cursor);
        if applied {
            self.dirty = true;
        }
        applied
    }

    pub fn redo(&mut self, cursor: &mut Position) -> bool {
        let applied = self.log.redo(&mut self.store, cursor);
        if applied {
            self.dirty = true;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::undo::Operation;

    #[test]
    fn untitled_has_one_empty_line() {
        let doc = Document::untitled(Backend::Vector);
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line(0), "");
        assert!(!doc.dirty);
        assert!(doc.path.is_none());
    }

    #[test]
    fn commit_stamps_last_change() {
        let mut doc = Document::from_lines(Backend::Vector, vec!["a".into()], None);
        doc.begin_group(Position::origin());
        doc.store.insert_line(1, "b");
        doc.push_op(Operation::InsertLine { row: 1, text: "b".into() });
        doc.commit_group(Position::new(1, 0));
        let last = doc.last_change.as_ref().expect("last change recorded");
        assert_eq!(last.ops.len(), 1);
        assert_eq!(last.post, Position::new(1, 0));
    }

    #[test]
    fn empty_commit_keeps_previous_last_change() {
        let mut doc = Document::from_lines(Backend::Vector, vec!["a".into()], None);
        doc.begin_group(Position::origin());
        doc.store.insert_line(1, "b");
        doc.push_op(Operation::InsertLine { row: 1, text: "b".into() });
        doc.commit_group(Position::new(1, 0));
        doc.begin_group(Position::origin());
        doc.commit_group(Position::origin());
        assert!(doc.last_change.is_some());
        assert_eq!(doc.last_change.as_ref().unwrap().ops.len(), 1);
    }

    #[test]
    fn max_col_respects_onemore() {
        let doc = Document::from_lines(Backend::Vector, vec!["abc".into(), "".into()], None);
        assert_eq!(doc.max_col(0, false), 2);
        assert_eq!(doc.max_col(0, true), 3);
        assert_eq!(doc.max_col(1, false), 0);
        assert_eq!(doc.max_col(1, true), 0);
        assert_eq!(doc.max_col(9, true), 0);
    }
}
