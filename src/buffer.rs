//! Buffer representation - the lines of the document being proofread

use std::path::Path;

use crate::error::Result;
use crate::line::Line;
use crate::text::{Position, Snapshot};

/// A buffer containing text and metadata
#[derive(Debug)]
pub struct Buffer {
    /// Lines of text
    lines: Vec<Line>,
    /// Buffer name (file name, or "*scratch*")
    name: String,
    /// Whether the in-memory text differs from the file
    modified: bool,
}

impl Buffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![Line::new()], // Always have at least one line
            name: name.into(),
            modified: false,
        }
    }

    /// Create an unnamed buffer holding `text`
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut buffer = Self::new(name);
        buffer.lines = split_lines(text);
        buffer
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        Ok(Self {
            lines: split_lines(&content),
            name,
            modified: false,
        })
    }

    /// Get buffer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Char count of a line (0 past the end)
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, |l| l.char_count())
    }

    /// Read-only view of the buffer for the highlighter
    pub fn snapshot(&self, cursor: Position) -> Snapshot<'_> {
        Snapshot::new(&self.lines, cursor)
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, pos: Position, ch: char) {
        if let Some(line) = self.lines.get_mut(pos.line) {
            line.insert_char(pos.col, ch);
            self.modified = true;
        }
    }

    /// Insert a newline, splitting the line at `pos`
    pub fn insert_newline(&mut self, pos: Position) {
        if let Some(line) = self.lines.get_mut(pos.line) {
            let new_line = line.split_off(pos.col);
            self.lines.insert(pos.line + 1, new_line);
            self.modified = true;
        }
    }

    /// Delete the character at position, joining with the next line at end of line
    pub fn delete_char(&mut self, pos: Position) -> bool {
        let line_len = self.line_len(pos.line);
        if pos.col < line_len {
            if let Some(line) = self.lines.get_mut(pos.line) {
                line.delete_char(pos.col);
                self.modified = true;
                return true;
            }
        } else if pos.line + 1 < self.lines.len() {
            let next_line = self.lines.remove(pos.line + 1);
            self.lines[pos.line].append(next_line);
            self.modified = true;
            return true;
        }
        false
    }

    /// Delete backward (backspace), returns the new cursor position
    pub fn delete_backward(&mut self, pos: Position) -> Option<Position> {
        if pos.col > 0 {
            let prev = Position::new(pos.line, pos.col - 1);
            return self.delete_char(prev).then_some(prev);
        }
        if pos.line > 0 && pos.line < self.lines.len() {
            let current_line = self.lines.remove(pos.line);
            let prev_line = &mut self.lines[pos.line - 1];
            let join_col = prev_line.char_count();
            prev_line.append(current_line);
            self.modified = true;
            return Some(Position::new(pos.line - 1, join_col));
        }
        None
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("*scratch*")
    }
}

/// Split text into lines, always producing at least one line
fn split_lines(content: &str) -> Vec<Line> {
    let lines: Vec<Line> = content.lines().map(Line::from).collect();
    if lines.is_empty() {
        vec![Line::new()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextSnapshot;

    #[test]
    fn test_from_text_keeps_one_line_minimum() {
        let buffer = Buffer::from_text("t", "");
        assert_eq!(buffer.line_count(), 1);
        assert!(!buffer.is_modified());

        let buffer = Buffer::from_text("t", "one\ntwo\r\nthree\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(1).map(|l| l.text()), Some("two"));
    }

    #[test]
    fn test_insert_and_split() {
        let mut buffer = Buffer::from_text("t", "a(b)c");
        buffer.insert_char(Position::new(0, 2), '[');
        assert_eq!(buffer.line(0).map(|l| l.text()), Some("a([b)c"));

        buffer.insert_newline(Position::new(0, 3));
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(1).map(|l| l.text()), Some("b)c"));
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_delete_backward_joins_lines() {
        let mut buffer = Buffer::from_text("t", "“ab\ncd”");
        let pos = buffer.delete_backward(Position::new(1, 0));
        assert_eq!(pos, Some(Position::new(0, 3)));
        assert_eq!(buffer.line(0).map(|l| l.text()), Some("“abcd”"));

        assert_eq!(buffer.delete_backward(Position::new(0, 0)), None);
        assert_eq!(buffer.delete_backward(Position::new(0, 1)), Some(Position::new(0, 0)));
        assert_eq!(buffer.line(0).map(|l| l.text()), Some("abcd”"));
    }

    #[test]
    fn test_delete_char_at_end_joins_next() {
        let mut buffer = Buffer::from_text("t", "ab\ncd");
        assert!(buffer.delete_char(Position::new(0, 2)));
        assert_eq!(buffer.line(0).map(|l| l.text()), Some("abcd"));
        assert!(!buffer.delete_char(Position::new(0, 4)));
    }

    #[test]
    fn test_snapshot_reads_buffer() {
        let buffer = Buffer::from_text("t", "x\ny");
        let snap = buffer.snapshot(Position::new(1, 1));
        assert_eq!(snap.line_count(), 2);
        assert_eq!(snap.cursor(), Position::new(1, 1));
        assert_eq!(snap.line(1), Some("y"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.txt");
        std::fs::write(&path, "first\nsecond").unwrap();

        let buffer = Buffer::from_file(&path).unwrap();
        assert_eq!(buffer.name(), "page.txt");
        assert_eq!(buffer.line_count(), 2);

        assert!(Buffer::from_file(&dir.path().join("missing.txt")).is_err());
    }
}
