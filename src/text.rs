//! Positions, ranges and read-only text snapshots
//!
//! The highlight engine never owns text. Every recomputation reads a
//! `TextSnapshot` supplied by whatever is displaying the document.

use std::ops;

use crate::line::Line;

/// A cursor position between characters
///
/// `line` and `col` are zero-based; `col` counts chars, not bytes.
/// Ordering is by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// The position one character to the right on the same line
    pub fn next_col(self) -> Self {
        Self::new(self.line, self.col + 1)
    }
}

/// A half-open span of text, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, swapping the endpoints if they are reversed
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A range covering the single character at `pos`
    pub fn single(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos.next_col(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the character at `pos` lies inside this range
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Column bounds of this range on `line`, given the line's char count
    ///
    /// Returns `None` if the range does not touch the line.
    pub fn columns_on_line(&self, line: usize, line_len: usize) -> Option<(usize, usize)> {
        if line < self.start.line || line > self.end.line {
            return None;
        }
        let start = if line == self.start.line { self.start.col } else { 0 };
        let end = if line == self.end.line { self.end.col } else { line_len };
        let start = start.min(line_len);
        let end = end.min(line_len);
        if start < end {
            Some((start, end))
        } else {
            None
        }
    }
}

/// Read access to the text being highlighted
///
/// Implementors expose line-indexed text plus the cursor, selection and
/// visible window of the view that is being decorated.
pub trait TextSnapshot {
    /// Number of lines in the document
    fn line_count(&self) -> usize;

    /// Text of a line, without its newline
    fn line(&self, idx: usize) -> Option<&str>;

    /// Current insert cursor
    fn cursor(&self) -> Position;

    /// Selected ranges, empty if nothing is selected
    fn selection(&self) -> Vec<Range> {
        Vec::new()
    }

    /// Lines that recomputation is bounded to
    fn visible_lines(&self) -> ops::Range<usize> {
        0..self.line_count()
    }

    /// Number of chars on a line (0 for lines past the end)
    fn line_len(&self, idx: usize) -> usize {
        self.line(idx).map_or(0, |l| l.chars().count())
    }

    /// The character immediately after `pos`, if any
    fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line)?.chars().nth(pos.col)
    }

    /// Clamp a position into the document
    fn clamp(&self, pos: Position) -> Position {
        let count = self.line_count();
        if count == 0 {
            return Position::default();
        }
        let line = pos.line.min(count - 1);
        Position::new(line, pos.col.min(self.line_len(line)))
    }
}

/// A borrowed view of a list of lines plus view state
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    lines: &'a [Line],
    cursor: Position,
    selection: Option<Range>,
    visible: Option<ops::Range<usize>>,
}

impl<'a> Snapshot<'a> {
    pub fn new(lines: &'a [Line], cursor: Position) -> Self {
        Self {
            lines,
            cursor,
            selection: None,
            visible: None,
        }
    }

    /// Builder: set the selected range (ignored if empty)
    pub fn with_selection(mut self, selection: Option<Range>) -> Self {
        self.selection = selection.filter(|r| !r.is_empty());
        self
    }

    /// Builder: bound recomputation to a window of lines
    pub fn with_visible(mut self, visible: ops::Range<usize>) -> Self {
        self.visible = Some(visible);
        self
    }
}

impl TextSnapshot for Snapshot<'_> {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(|l| l.text())
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn selection(&self) -> Vec<Range> {
        self.selection.into_iter().collect()
    }

    fn visible_lines(&self) -> ops::Range<usize> {
        let count = self.lines.len();
        match &self.visible {
            Some(v) => v.start.min(count)..v.end.min(count),
            None => 0..count,
        }
    }

    fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, |l| l.char_count())
    }
}
