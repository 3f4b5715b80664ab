//! Vector backend: a dynamic array of owned lines.
//!
//! Reads are O(1); inserting or erasing at row `r` shifts the tail. The right
//! default for small files and read-dominated sessions.

use crate::LineStore;

#[derive(Debug, Default, Clone)]
pub struct VecStore {
    lines: Vec<String>,
}

impl LineStore for VecStore {
    fn init(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    fn count(&self) -> usize {
        self.lines.len()
    }

    fn get(&self, r: usize) -> String {
        self.lines.get(r).cloned().unwrap_or_default()
    }

    fn insert_line(&mut self, r: usize, s: &str) {
        let at = r.min(self.lines.len());
        self.lines.insert(at, s.to_string());
    }

    fn insert_lines(&mut self, r: usize, lines: &[String]) {
        let at = r.min(self.lines.len());
        self.lines.splice(at..at, lines.iter().cloned());
    }

    fn erase_line(&mut self, r: usize) {
        if r < self.lines.len() {
            self.lines.remove(r);
        }
    }

    fn erase_lines(&mut self, start: usize, end: usize) {
        let start = start.min(self.lines.len());
        let end = end.max(start).min(self.lines.len());
        self.lines.drain(start..end);
    }

    fn replace_line(&mut self, r: usize, s: &str) {
        if let Some(line) = self.lines.get_mut(r) {
            *line = s.to_string();
        }
    }

    fn name(&self) -> &'static str {
        "vector"
    }
}
