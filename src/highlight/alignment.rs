//! Alignment column tracking
//!
//! Once started, the tracker holds a fixed char column. Every firing
//! recomputes which lines currently have a character in that column; the
//! column itself never follows edits or cursor moves.

use std::collections::BTreeSet;

use tracing::debug;

use crate::text::{Position, Range, TextSnapshot};

/// Tracks the alignment column, if one is active
#[derive(Debug, Clone, Default)]
pub struct AlignmentColumnTracker {
    column: Option<usize>,
}

impl AlignmentColumnTracker {
    pub fn new() -> Self {
        Self { column: None }
    }

    /// Begin highlighting `column`, replacing any previous column
    pub fn start(&mut self, column: usize) {
        debug!(column, "alignment column started");
        self.column = Some(column);
    }

    /// Stop highlighting; returns whether a column was active
    pub fn stop(&mut self) -> bool {
        let was_active = self.column.take().is_some();
        if was_active {
            debug!("alignment column stopped");
        }
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some()
    }

    pub fn column(&self) -> Option<usize> {
        self.column
    }

    /// One single-character range per visible line long enough to reach the column
    pub fn compute_ranges<T: TextSnapshot + ?Sized>(&self, text: &T) -> BTreeSet<Range> {
        let Some(column) = self.column else {
            return BTreeSet::new();
        };

        text.visible_lines()
            .filter(|&idx| text.line_len(idx) > column)
            .map(|idx| Range::single(Position::new(idx, column)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    const PAGE: &str = "Name      Age\n\
                        Alice     30\n\
                        Bo\n\
                        \n\
                        Christopher 41";

    #[test]
    fn test_inactive_tracker_has_no_ranges() {
        let buffer = Buffer::from_text("t", PAGE);
        let tracker = AlignmentColumnTracker::new();
        assert!(!tracker.is_active());
        assert!(tracker.compute_ranges(&buffer.snapshot(Position::default())).is_empty());
    }

    #[test]
    fn test_one_range_per_long_enough_line() {
        let buffer = Buffer::from_text("t", PAGE);
        let mut tracker = AlignmentColumnTracker::new();
        tracker.start(5);

        let ranges = tracker.compute_ranges(&buffer.snapshot(Position::default()));
        let lines: Vec<usize> = ranges.iter().map(|r| r.start.line).collect();
        assert_eq!(lines, vec![0, 1, 4]);
        for range in &ranges {
            assert_eq!(range.start.col, 5);
            assert_eq!(range.end, range.start.next_col());
        }
    }

    #[test]
    fn test_line_of_exactly_column_length_is_skipped() {
        let buffer = Buffer::from_text("t", "12345\n123456");
        let mut tracker = AlignmentColumnTracker::new();
        tracker.start(5);
        let ranges = tracker.compute_ranges(&buffer.snapshot(Position::default()));
        assert_eq!(ranges.len(), 1);
        assert!(ranges.contains(&Range::single(Position::new(1, 5))));
    }

    #[test]
    fn test_column_survives_cursor_moves_and_edits() {
        let mut buffer = Buffer::from_text("t", PAGE);
        let mut tracker = AlignmentColumnTracker::new();
        tracker.start(5);

        let _ = tracker.compute_ranges(&buffer.snapshot(Position::new(4, 11)));
        assert_eq!(tracker.column(), Some(5));

        // Bo grows past the column; the highlight follows the text, not the column
        buffer.insert_char(Position::new(2, 2), 'b');
        buffer.insert_char(Position::new(2, 3), 'b');
        buffer.insert_char(Position::new(2, 4), 'y');
        buffer.insert_char(Position::new(2, 5), '!');
        let ranges = tracker.compute_ranges(&buffer.snapshot(Position::new(0, 0)));
        assert_eq!(tracker.column(), Some(5));
        assert!(ranges.contains(&Range::single(Position::new(2, 5))));
        assert_eq!(ranges.len(), 4);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let buffer = Buffer::from_text("t", "“ab”\nabcd");
        let mut tracker = AlignmentColumnTracker::new();
        tracker.start(3);
        let ranges = tracker.compute_ranges(&buffer.snapshot(Position::default()));
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn test_visible_window_limits_lines() {
        let buffer = Buffer::from_text("t", PAGE);
        let mut tracker = AlignmentColumnTracker::new();
        tracker.start(0);
        let snap = buffer.snapshot(Position::default()).with_visible(1..3);
        let ranges = tracker.compute_ranges(&snap);
        let lines: Vec<usize> = ranges.iter().map(|r| r.start.line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_stop_clears_column() {
        let mut tracker = AlignmentColumnTracker::new();
        assert!(!tracker.stop());
        tracker.start(2);
        tracker.start(7);
        assert_eq!(tracker.column(), Some(7));
        assert!(tracker.stop());
        assert_eq!(tracker.column(), None);
        assert!(!tracker.is_active());
    }
}
