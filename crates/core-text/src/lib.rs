//! Line-oriented text storage with interchangeable backends.
//!
//! The editor addresses text as an ordered sequence of lines without stored
//! terminators; the newline is an implicit separator between adjacent rows.
//! Three backends implement the same [`LineStore`] contract with different
//! asymptotic profiles:
//!
//! * [`VecStore`]  - a plain vector of strings; O(1) reads, O(n) edits.
//! * [`GapStore`]  - one byte array with a movable gap plus a block line index.
//! * [`RopeStore`] - an AVL tree whose leaves hold up to 128 lines.
//!
//! The backend is chosen once at startup (see [`Backend`]); [`Store`] is the
//! dispatch wrapper the rest of the editor talks to. The wrapper also enforces
//! the one invariant backends do not: the store never reaches a zero-line
//! state through the public API. Any erase that would empty the store re-seeds
//! a single empty line.

use std::str::FromStr;

mod gap;
pub mod motion;
mod rope;
mod vec;

pub use gap::GapStore;
pub use rope::RopeStore;
pub use vec::VecStore;

/// A cursor location as (row, byte column). `col` may equal the line length
/// (the insertion point past the last byte); whether Normal mode may rest
/// there is an editor option, not a store concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Common contract satisfied by every backend.
///
/// Out-of-range rows are silently clamped: `get` returns an empty string,
/// erases trim their range to the valid portion, inserts append when `row`
/// equals the current line count.
pub trait LineStore {
    /// Replace the entire content. Row indices start at 0.
    fn init(&mut self, lines: Vec<String>);
    /// Number of lines currently stored.
    fn count(&self) -> usize;
    /// Byte-exact content of row `r`, or empty when out of range.
    fn get(&self, r: usize) -> String;
    /// Insert a single line before row `r`; `r == count()` appends.
    fn insert_line(&mut self, r: usize, s: &str);
    /// Insert a block of lines before row `r`.
    fn insert_lines(&mut self, r: usize, lines: &[String]);
    /// Remove row `r` if it exists.
    fn erase_line(&mut self, r: usize);
    /// Remove the half-open row range `[start, end)`, clamped.
    fn erase_lines(&mut self, start: usize, end: usize);
    /// Replace exactly one existing row.
    fn replace_line(&mut self, r: usize, s: &str);
    /// Static backend name reported by `:backend`.
    fn name(&self) -> &'static str;
}

/// Backend selection, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    Vector,
    Gap,
    #[default]
    Rope,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown store backend `{0}` (expected vector, gap, or rope)")]
pub struct UnknownBackend(String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vector" | "vec" => Ok(Backend::Vector),
            "gap" => Ok(Backend::Gap),
            "rope" => Ok(Backend::Rope),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

/// Config-time dispatch over the three backends.
///
/// Kept as a sum type rather than a trait object so the choice is a value,
/// clones stay possible, and call sites monomorphize per match arm.
pub enum Store {
    Vector(VecStore),
    Gap(GapStore),
    Rope(RopeStore),
}

impl Store {
    pub fn new(backend: Backend) -> Self {
        Self::from_lines(backend, vec![String::new()])
    }

    pub fn from_lines(backend: Backend, lines: Vec<String>) -> Self {
        let lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        let mut store = match backend {
            Backend::Vector => Store::Vector(VecStore::default()),
            Backend::Gap => Store::Gap(GapStore::default()),
            Backend::Rope => Store::Rope(RopeStore::default()),
        };
        store.as_store_mut().init(lines);
        store
    }

    fn as_store(&self) -> &dyn LineStore {
        match self {
            Store::Vector(s) => s,
            Store::Gap(s) => s,
            Store::Rope(s) => s,
        }
    }

    fn as_store_mut(&mut self) -> &mut dyn LineStore {
        match self {
            Store::Vector(s) => s,
            Store::Gap(s) => s,
            Store::Rope(s) => s,
        }
    }

    /// Re-seed a single empty line if an erase drained the store.
    fn ensure_not_empty(&mut self) {
        if self.as_store().count() == 0 {
            self.as_store_mut().insert_line(0, "");
        }
    }

    pub fn init(&mut self, lines: Vec<String>) {
        let lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        self.as_store_mut().init(lines);
    }

    pub fn count(&self) -> usize {
        self.as_store().count()
    }

    pub fn get(&self, r: usize) -> String {
        self.as_store().get(r)
    }

    /// Byte length of row `r` (0 when out of range).
    pub fn line_len(&self, r: usize) -> usize {
        self.as_store().get(r).len()
    }

    pub fn insert_line(&mut self, r: usize, s: &str) {
        self.as_store_mut().insert_line(r, s);
    }

    pub fn insert_lines(&mut self, r: usize, lines: &[String]) {
        self.as_store_mut().insert_lines(r, lines);
    }

    pub fn erase_line(&mut self, r: usize) {
        self.as_store_mut().erase_line(r);
        self.ensure_not_empty();
    }

    pub fn erase_lines(&mut self, start: usize, end: usize) {
        self.as_store_mut().erase_lines(start, end);
        self.ensure_not_empty();
    }

    pub fn replace_line(&mut self, r: usize, s: &str) {
        self.as_store_mut().replace_line(r, s);
    }

    pub fn backend_name(&self) -> &'static str {
        self.as_store().name()
    }

    /// All lines in order; used by the writer and by tests.
    pub fn snapshot(&self) -> Vec<String> {
        (0..self.count()).map(|r| self.get(r)).collect()
    }
}
