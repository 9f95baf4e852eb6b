//! Line representation and char-column text operations
//!
//! Highlight positions address characters, so every mutating operation
//! here takes a char column and converts to a byte offset internally.

use unicode_width::UnicodeWidthChar;

/// A single line of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// The text content (without trailing newline)
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Create a line from a string
    pub fn from_string(s: String) -> Self {
        Self { text: s }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of chars on the line
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display width of the first `col` chars (for terminal cursor placement)
    pub fn width_to(&self, col: usize) -> usize {
        self.text
            .chars()
            .take(col)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
            .sum()
    }

    /// Insert a character at a char column
    pub fn insert_char(&mut self, col: usize, ch: char) {
        let pos = char_to_byte(&self.text, col);
        self.text.insert(pos, ch);
    }

    /// Delete the char at a column, returning it
    pub fn delete_char(&mut self, col: usize) -> Option<char> {
        let pos = char_to_byte(&self.text, col);
        if pos >= self.text.len() {
            return None;
        }
        Some(self.text.remove(pos))
    }

    /// Split the line at a char column, returning the remainder
    pub fn split_off(&mut self, col: usize) -> Line {
        let pos = char_to_byte(&self.text, col);
        Line::from_string(self.text.split_off(pos))
    }

    /// Append another line's content to this line
    pub fn append(&mut self, other: Line) {
        self.text.push_str(other.text());
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::from_string(s.to_string())
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

/// Byte offset of char column `col` in `text`; columns past the end map to its length
pub fn char_to_byte(text: &str, col: usize) -> usize {
    text.char_indices().nth(col).map_or(text.len(), |(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_line_operations() {
        let mut line = Line::from("Hello");
        assert_eq!(line.text(), "Hello");
        assert_eq!(line.char_count(), 5);
        assert!(!line.is_empty());

        line.insert_char(5, '!');
        assert_eq!(line.text(), "Hello!");
    }

    #[test]
    fn test_curly_quotes_are_single_columns() {
        let mut line = Line::from("“Yes,” she said");
        assert_eq!(line.char_count(), 15);
        assert_eq!(char_to_byte(line.text(), 1), 3);
        assert_eq!(char_to_byte(line.text(), 99), line.text().len());

        line.insert_char(1, '—');
        assert_eq!(line.text(), "“—Yes,” she said");
    }

    #[test]
    fn test_width_to_wide_chars() {
        let line = Line::from("你好 ok");
        assert_eq!(line.width_to(0), 0);
        assert_eq!(line.width_to(2), 4);
        assert_eq!(line.width_to(4), 6);
    }

    #[test]
    fn test_delete_char() {
        let mut line = Line::from("a‘b");
        assert_eq!(line.delete_char(1), Some('‘'));
        assert_eq!(line.text(), "ab");
        assert_eq!(line.delete_char(2), None);
    }

    #[test]
    fn test_split_off_and_append() {
        let mut line = Line::from("Hello World");
        let remainder = line.split_off(6);
        assert_eq!(line.text(), "Hello ");
        assert_eq!(remainder.text(), "World");

        line.append(remainder);
        assert_eq!(line.text(), "Hello World");
    }
}
