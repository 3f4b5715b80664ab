//! Literal-substring search (Knuth-Morris-Pratt), no wraparound.
//!
//! Forward search starts one column past the cursor on the current row, then
//! scans subsequent rows from column 0; backward search mirrors that. An
//! explicit search also recomputes the per-document match set used for
//! highlighting.

use crate::Editor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub row: usize,
    pub col: usize,
    pub len: usize,
}

fn kmp_build(pat: &[u8]) -> Vec<usize> {
    let mut pi = vec![0usize; pat.len()];
    let mut j = 0;
    for i in 1..pat.len() {
        while j > 0 && pat[i] != pat[j] {
            j = pi[j - 1];
        }
        if pat[i] == pat[j] {
            j += 1;
        }
        pi[i] = j;
    }
    pi
}

/// First match of `pat` in `s` at or after byte `start`.
pub fn kmp_find_first_from(s: &str, pat: &str, start: usize) -> Option<usize> {
    if pat.is_empty() {
        return None;
    }
    let (s, pat) = (s.as_bytes(), pat.as_bytes());
    let pi = kmp_build(pat);
    let mut j = 0;
    for i in start..s.len() {
        while j > 0 && s[i] != pat[j] {
            j = pi[j - 1];
        }
        if s[i] == pat[j] {
            j += 1;
        }
        if j == pat.len() {
            return Some(i + 1 - pat.len());
        }
    }
    None
}

/// All match positions of `pat` in `s` (overlaps restart at the failure
/// link, matching the forward scanner).
pub fn kmp_find_all(s: &str, pat: &str) -> Vec<usize> {
    let mut out = Vec::new();
    if pat.is_empty() {
        return out;
    }
    let (s, pat) = (s.as_bytes(), pat.as_bytes());
    let pi = kmp_build(pat);
    let mut j = 0;
    for i in 0..s.len() {
        while j > 0 && s[i] != pat[j] {
            j = pi[j - 1];
        }
        if s[i] == pat[j] {
            j += 1;
        }
        if j == pat.len() {
            out.push(i + 1 - pat.len());
            j = pi[j - 1];
        }
    }
    out
}

/// `/pat` or `n`: move to the next match after the cursor. No wrap; reports
/// "not found pattern" at the end of the buffer.
pub fn search_forward(ed: &mut Editor, pattern: &str) {
    if pattern.is_empty() {
        ed.set_message("pattern empty");
        return;
    }
    let doc = ed.ws.doc();
    let d = doc.borrow();
    let mut cur = ed.cursor();
    let line = d.store.get(cur.row);
    let start = (cur.col + 1).min(line.len());
    if let Some(col) = kmp_find_first_from(&line, pattern, start) {
        cur.col = col;
        drop(d);
        ed.set_cursor(cur);
        return;
    }
    for row in cur.row + 1..d.store.count() {
        if let Some(col) = kmp_find_first_from(&d.store.get(row), pattern, 0) {
            cur.row = row;
            cur.col = col;
            drop(d);
            ed.set_cursor(cur);
            return;
        }
    }
    drop(d);
    ed.set_message("not found pattern");
}

/// `?pat` or `N`: move to the previous match before the cursor.
pub fn search_backward(ed: &mut Editor, pattern: &str) {
    if pattern.is_empty() {
        ed.set_message("pattern empty");
        return;
    }
    let doc = ed.ws.doc();
    let d = doc.borrow();
    let mut cur = ed.cursor();
    let line = d.store.get(cur.row);
    let before: Vec<usize> = kmp_find_all(&line, pattern)
        .into_iter()
        .filter(|col| *col < cur.col)
        .collect();
    if let Some(col) = before.last() {
        cur.col = *col;
        drop(d);
        ed.set_cursor(cur);
        return;
    }
    for row in (0..cur.row).rev() {
        let hits = kmp_find_all(&d.store.get(row), pattern);
        if let Some(col) = hits.last() {
            cur.row = row;
            cur.col = *col;
            drop(d);
            ed.set_cursor(cur);
            return;
        }
    }
    drop(d);
    ed.set_message("not found pattern");
}

pub fn repeat_last_search(ed: &mut Editor, forward: bool) {
    if ed.last_search.is_empty() {
        ed.set_message("no last search");
        return;
    }
    let pattern = ed.last_search.clone();
    let before = ed.cursor();
    if forward {
        search_forward(ed, &pattern);
    } else {
        search_backward(ed, &pattern);
    }
    // Refresh highlights only on a hit so a failed repeat keeps its
    // "not found" report instead of the match summary.
    if ed.cursor() != before {
        recompute_search_hits(ed, &pattern);
    }
}

/// Rebuild the highlight set and report the match count plus the next match
/// at or after the cursor.
pub fn recompute_search_hits(ed: &mut Editor, pattern: &str) {
    ed.search_hits.clear();
    if pattern.is_empty() {
        return;
    }
    let doc = ed.ws.doc();
    let d = doc.borrow();
    for row in 0..d.store.count() {
        for col in kmp_find_all(&d.store.get(row), pattern) {
            ed.search_hits.push(SearchHit { row, col, len: pattern.len() });
        }
    }
    drop(d);
    if ed.search_hits.is_empty() {
        ed.set_message("not found pattern");
        return;
    }
    let cur = ed.cursor();
    let next = ed
        .search_hits
        .iter()
        .find(|h| h.row > cur.row || (h.row == cur.row && h.col >= cur.col))
        .or_else(|| ed.search_hits.first())
        .copied();
    if let Some(h) = next {
        let msg = format!(
            "matches:{} next {}:{}",
            ed.search_hits.len(),
            h.row + 1,
            h.col + 1
        );
        ed.set_message(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kmp_finds_first_and_all() {
        assert_eq!(kmp_find_first_from("abcabcabc", "cab", 0), Some(2));
        assert_eq!(kmp_find_first_from("abcabcabc", "cab", 3), Some(5));
        assert_eq!(kmp_find_first_from("abcabcabc", "zzz", 0), None);
        assert_eq!(kmp_find_all("aaaa", "aa"), vec![0, 1, 2]);
        assert_eq!(kmp_find_all("hello", ""), Vec::<usize>::new());
    }

    #[test]
    fn kmp_periodic_pattern() {
        assert_eq!(kmp_find_all("ababab", "abab"), vec![0, 2]);
        assert_eq!(kmp_find_first_from("aabaabaab", "aabaab", 0), Some(0));
    }
}
