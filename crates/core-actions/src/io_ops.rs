//! File reading and atomic writing for documents.
//!
//! Reads normalize CRLF to LF at line boundaries and represent an empty file
//! as a single empty line. Writes are atomic: content goes to `<path>.tmp`,
//! is synced to disk, then renamed over the target. On a write failure the
//! document stays dirty and the temp file may remain.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use core_state::Document;
use tracing::{error, info};

/// Read `path` into lines. CRLF sequences are normalized to LF; an empty
/// file yields one empty line.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("can not open file: {}", path.display()))?;
    if bytes.is_empty() {
        return Ok(vec![String::new()]);
    }
    let mut lines = Vec::new();
    let mut start = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'\n' {
            let mut end = i;
            if end > start && bytes[end - 1] == b'\r' {
                end -= 1;
            }
            lines.push(String::from_utf8_lossy(&bytes[start..end]).into_owned());
            start = i + 1;
        }
    }
    let mut end = bytes.len();
    if end > start && bytes[end - 1] == b'\r' {
        end -= 1;
    }
    lines.push(String::from_utf8_lossy(&bytes[start..end]).into_owned());
    if lines.is_empty() {
        lines.push(String::new());
    }
    info!(target: "io", path = %path.display(), lines = lines.len(), "file_read");
    Ok(lines)
}

/// Serialize `lines` joined by LF with no trailing newline, atomically.
pub fn write_file(lines: &[String], path: &Path) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    let content = lines.join("\n");
    let result = (|| -> Result<()> {
        let mut file =
            File::create(tmp).with_context(|| format!("write file failed: {}", tmp.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("write file failed: {}", tmp.display()))?;
        file.sync_data()
            .with_context(|| format!("write file failed: {}", tmp.display()))?;
        drop(file);
        std::fs::rename(tmp, path)
            .with_context(|| format!("rename failed: {}", path.display()))?;
        Ok(())
    })();
    match &result {
        Ok(()) => info!(target: "io", path = %path.display(), bytes = content.len(), "file_written"),
        Err(e) => error!(target: "io", path = %path.display(), error = %e, "file_write_error"),
    }
    result
}

/// Write a document to `target` (or its own path), clearing `dirty` only on
/// success. Returns the status-line message.
pub fn write_document(doc: &mut Document, target: Option<&Path>) -> (bool, String) {
    let path = match target.or(doc.path.as_deref()) {
        Some(p) => p.to_path_buf(),
        None => return (false, "don't have path, use :w <path>".to_string()),
    };
    let lines = doc.store.snapshot();
    match write_file(&lines, &path) {
        Ok(()) => {
            doc.dirty = false;
            (true, format!("written: {}", path.display()))
        }
        Err(e) => (false, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Backend;

    #[test]
    fn read_normalizes_crlf_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        std::fs::write(&path, b"one\r\ntwo\nthree\r\n").unwrap();
        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, ["one", "two", "three", ""]);

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, b"").unwrap();
        assert_eq!(read_lines(&empty).unwrap(), [""]);
    }

    #[test]
    fn write_joins_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        write_file(&lines, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\nc");
        assert!(!dir.path().join("out.txt.tmp").exists(), "tmp file renamed away");
    }

    #[test]
    fn round_trip_preserves_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.txt");
        let lines = vec!["alpha".to_string(), "".to_string(), "gamma".to_string()];
        write_file(&lines, &path).unwrap();
        assert_eq!(read_lines(&path).unwrap(), lines);
    }

    #[test]
    fn write_document_clears_dirty_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let mut doc = Document::from_lines(
            Backend::Vector,
            vec!["x".into()],
            Some(path.clone()),
        );
        doc.dirty = true;
        let (ok, msg) = write_document(&mut doc, None);
        assert!(ok, "{msg}");
        assert!(!doc.dirty);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn write_document_without_path_refuses() {
        let mut doc = Document::untitled(Backend::Vector);
        doc.dirty = true;
        let (ok, msg) = write_document(&mut doc, None);
        assert!(!ok);
        assert!(msg.contains(":w <path>"));
        assert!(doc.dirty, "dirty unchanged when nothing was written");
    }
}
