//! Window representation - a viewport into a buffer

use std::ops;

use proofmark::buffer::Buffer;
use proofmark::text::{Position, Range};

/// The visible part of the buffer, with cursor and mark
#[derive(Debug)]
pub struct Window {
    /// First visible line in the window
    top_line: usize,
    /// Cursor position in chars
    cursor: Position,
    /// Mark position (for the selection)
    mark: Option<Position>,
    /// Selection in force when the mark was last cleared
    last_selection: Option<Range>,
    /// Number of text rows in window (excluding mode line)
    height: u16,
    /// Goal column for vertical movement
    goal_col: usize,
}

impl Window {
    pub fn new(height: u16) -> Self {
        Self {
            top_line: 0,
            cursor: Position::default(),
            mark: None,
            last_selection: None,
            height,
            goal_col: 0,
        }
    }

    /// Get the top visible line
    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Set cursor position, also resetting the goal column
    pub fn set_cursor(&mut self, cursor: Position) {
        self.cursor = cursor;
        self.goal_col = cursor.col;
    }

    /// Set mark at current cursor position
    pub fn set_mark(&mut self) {
        if let Some(range) = self.selection() {
            self.last_selection = Some(range);
        }
        self.mark = Some(self.cursor);
    }

    /// Drop the mark, remembering a non-empty selection
    pub fn clear_mark(&mut self) {
        if let Some(range) = self.selection() {
            self.last_selection = Some(range);
        }
        self.mark = None;
    }

    /// The selection before the mark was last cleared
    pub fn last_selection(&self) -> Option<Range> {
        self.last_selection
    }

    /// Text between mark and cursor, if the mark is set
    pub fn selection(&self) -> Option<Range> {
        self.mark
            .map(|mark| Range::new(mark, self.cursor))
            .filter(|range| !range.is_empty())
    }

    /// Set window height
    pub fn set_height(&mut self, height: u16) {
        self.height = height;
    }

    /// Buffer lines currently on screen
    pub fn visible_lines(&self) -> ops::Range<usize> {
        self.top_line..self.top_line + self.height as usize
    }

    /// Ensure cursor is visible, adjusting top_line if needed
    pub fn ensure_cursor_visible(&mut self) {
        let height = (self.height as usize).max(1);
        if self.cursor.line < self.top_line {
            self.top_line = self.cursor.line;
        } else if self.cursor.line >= self.top_line + height {
            self.top_line = self.cursor.line + 1 - height;
        }
    }

    pub fn move_left(&mut self, buffer: &Buffer) {
        if self.cursor.col > 0 {
            self.set_cursor(Position::new(self.cursor.line, self.cursor.col - 1));
        } else if self.cursor.line > 0 {
            let line = self.cursor.line - 1;
            self.set_cursor(Position::new(line, buffer.line_len(line)));
        }
    }

    pub fn move_right(&mut self, buffer: &Buffer) {
        if self.cursor.col < buffer.line_len(self.cursor.line) {
            self.set_cursor(self.cursor.next_col());
        } else if self.cursor.line + 1 < buffer.line_count() {
            self.set_cursor(Position::new(self.cursor.line + 1, 0));
        }
    }

    pub fn move_up(&mut self, buffer: &Buffer) {
        if self.cursor.line > 0 {
            self.move_to_line(self.cursor.line - 1, buffer);
        }
    }

    pub fn move_down(&mut self, buffer: &Buffer) {
        if self.cursor.line + 1 < buffer.line_count() {
            self.move_to_line(self.cursor.line + 1, buffer);
        }
    }

    pub fn move_to_bol(&mut self) {
        self.set_cursor(Position::new(self.cursor.line, 0));
    }

    pub fn move_to_eol(&mut self, buffer: &Buffer) {
        let line = self.cursor.line;
        self.set_cursor(Position::new(line, buffer.line_len(line)));
    }

    pub fn page_down(&mut self, buffer: &Buffer) {
        let page = (self.height as usize).saturating_sub(2).max(1);
        let last = buffer.line_count().saturating_sub(1);
        self.top_line = (self.top_line + page).min(last);
        self.move_to_line((self.cursor.line + page).min(last), buffer);
    }

    pub fn page_up(&mut self, buffer: &Buffer) {
        let page = (self.height as usize).saturating_sub(2).max(1);
        self.top_line = self.top_line.saturating_sub(page);
        self.move_to_line(self.cursor.line.saturating_sub(page), buffer);
    }

    /// Vertical move keeping the goal column
    fn move_to_line(&mut self, line: usize, buffer: &Buffer) {
        self.cursor = Position::new(line, self.goal_col.min(buffer.line_len(line)));
    }
}
