//! Surrounding quote and bracket matching
//!
//! Given a cursor, finds every bracket pair that encloses it (not just the
//! innermost) and, for each quote kind, the quote pair the cursor sits in.
//! Unbalanced or ambiguous text simply yields fewer pairs.

use std::collections::BTreeSet;

use tracing::trace;

use super::pair::{GlyphRole, PairKind};
use crate::text::{Position, Range, TextSnapshot};

/// An open/close glyph pair enclosing the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurroundingPair {
    pub kind: PairKind,
    /// Position of the opening glyph
    pub open: Position,
    /// Position of the closing glyph
    pub close: Position,
}

impl SurroundingPair {
    /// The span from the opening glyph through the closing glyph
    pub fn range(&self) -> Range {
        Range::new(self.open, self.close.next_col())
    }

    /// Single-character ranges over the two glyphs
    pub fn markers(&self) -> [Range; 2] {
        [Range::single(self.open), Range::single(self.close)]
    }
}

/// Surround highlighting state: on/off plus the kinds to look for
#[derive(Debug, Clone)]
pub struct Matcher {
    enabled: bool,
    kinds: Vec<PairKind>,
}

impl Matcher {
    /// A disabled matcher for every pair kind
    pub fn new() -> Self {
        Self {
            enabled: false,
            kinds: PairKind::ALL.to_vec(),
        }
    }

    /// A disabled matcher restricted to `kinds`
    pub fn with_kinds(kinds: &[PairKind]) -> Self {
        Self {
            enabled: false,
            kinds: kinds.to_vec(),
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn kinds(&self) -> &[PairKind] {
        &self.kinds
    }

    /// Pairs around the snapshot's cursor, empty while disabled
    pub fn compute<T: TextSnapshot + ?Sized>(&self, text: &T) -> BTreeSet<SurroundingPair> {
        if !self.enabled {
            return BTreeSet::new();
        }
        pairs_for_kinds(text, text.cursor(), &self.kinds)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Every surrounding pair of every kind for `cursor`
pub fn compute_surrounding_pairs<T: TextSnapshot + ?Sized>(
    text: &T,
    cursor: Position,
) -> BTreeSet<SurroundingPair> {
    pairs_for_kinds(text, cursor, &PairKind::ALL)
}

fn pairs_for_kinds<T: TextSnapshot + ?Sized>(
    text: &T,
    cursor: Position,
    kinds: &[PairKind],
) -> BTreeSet<SurroundingPair> {
    let mut pairs = BTreeSet::new();
    if text.line_count() == 0 {
        return pairs;
    }

    let cursor = text.clamp(cursor);
    let with_quotes = kinds.iter().any(|kind| !kind.is_nesting());
    let region = ScanRegion::load(text, cursor, with_quotes);

    for &kind in kinds {
        if kind.is_nesting() {
            pairs.extend(bracket_pairs(&region, cursor, kind));
        } else if let Some(pair) = quote_pair(&region, cursor, kind) {
            pairs.insert(pair);
        }
    }

    trace!(
        line = cursor.line,
        col = cursor.col,
        found = pairs.len(),
        "computed surrounding pairs"
    );
    pairs
}

/// All enclosing pairs of a nesting kind, innermost first
fn bracket_pairs(region: &ScanRegion, cursor: Position, kind: PairKind) -> Vec<SurroundingPair> {
    let (top, bottom) = region.window;

    let openers = unmatched(region.before(cursor, top), kind, GlyphRole::Open);
    if openers.is_empty() {
        return Vec::new();
    }
    let closers = unmatched(region.after(cursor, bottom), kind, GlyphRole::Close);

    openers
        .into_iter()
        .zip(closers)
        .map(|(open, close)| SurroundingPair { kind, open, close })
        .collect()
}

/// Glyphs with role `seek` that are not balanced by a nearer opposite glyph
fn unmatched(
    chars: impl Iterator<Item = (Position, char)>,
    kind: PairKind,
    seek: GlyphRole,
) -> Vec<Position> {
    let mut depth = 0usize;
    let mut found = Vec::new();
    for (pos, ch) in chars {
        match kind.role(ch) {
            Some(role) if role == seek => {
                if depth == 0 {
                    found.push(pos);
                } else {
                    depth -= 1;
                }
            }
            Some(_) => depth += 1,
            None => {}
        }
    }
    found
}

/// The quote pair of a non-nesting kind that the cursor sits inside
///
/// Quotes are paired left to right within the cursor's paragraph, so an odd
/// number of quote glyphs before the cursor means the nearest one opened a
/// quotation that the nearest one after the cursor closes.
fn quote_pair(region: &ScanRegion, cursor: Position, kind: PairKind) -> Option<SurroundingPair> {
    let (top, bottom) = region.paragraph(cursor.line)?;
    let is_quote = |&(pos, ch): &(Position, char)| {
        kind.role(ch).is_some() && !(kind == PairKind::SingleQuote && region.is_apostrophe(pos))
    };

    let mut before = region.before(cursor, top).filter(is_quote);
    let (open, open_ch) = before.next()?;
    if before.count() % 2 != 0 {
        // Even number of glyphs before the cursor; it is between quotations
        return None;
    }

    let (close, close_ch) = region.after(cursor, bottom).find(is_quote)?;
    if kind.role(open_ch) == Some(GlyphRole::Close) || kind.role(close_ch) == Some(GlyphRole::Open) {
        return None;
    }

    Some(SurroundingPair { kind, open, close })
}

/// The lines a single computation may look at, decoded to chars
struct ScanRegion {
    first_line: usize,
    lines: Vec<Vec<char>>,
    /// Bracket search bounds `(top, bottom)`: the visible window plus the cursor line
    window: (usize, usize),
}

impl ScanRegion {
    /// Load the visible window, widened to include the cursor line
    ///
    /// With `whole_paragraph` the load also covers the cursor's entire
    /// paragraph, since quote parity depends on every glyph in it.
    fn load<T: TextSnapshot + ?Sized>(text: &T, cursor: Position, whole_paragraph: bool) -> Self {
        let visible = text.visible_lines();
        let top = visible.start.min(cursor.line);
        let bottom = visible.end.max(cursor.line + 1).min(text.line_count());

        let (first_line, end) = if whole_paragraph {
            let (para_top, para_bottom) = paragraph_bounds(text, cursor.line);
            (top.min(para_top), bottom.max(para_bottom))
        } else {
            (top, bottom)
        };

        let lines = (first_line..end)
            .map(|idx| text.line(idx).unwrap_or("").chars().collect())
            .collect();
        Self {
            first_line,
            lines,
            window: (top, bottom),
        }
    }

    /// One past the last loaded line
    fn end_line(&self) -> usize {
        self.first_line + self.lines.len()
    }

    fn line(&self, idx: usize) -> &[char] {
        &self.lines[idx - self.first_line]
    }

    fn is_blank(&self, idx: usize) -> bool {
        self.line(idx).iter().all(|c| c.is_whitespace())
    }

    /// Chars before `cursor`, nearest first, stopping at line `top`
    fn before(&self, cursor: Position, top: usize) -> impl Iterator<Item = (Position, char)> + '_ {
        (top..=cursor.line).rev().flat_map(move |idx| {
            let chars = self.line(idx);
            let end = if idx == cursor.line {
                cursor.col.min(chars.len())
            } else {
                chars.len()
            };
            chars[..end]
                .iter()
                .enumerate()
                .rev()
                .map(move |(col, &ch)| (Position::new(idx, col), ch))
        })
    }

    /// Chars at and after `cursor`, nearest first, stopping before line `bottom`
    fn after(&self, cursor: Position, bottom: usize) -> impl Iterator<Item = (Position, char)> + '_ {
        (cursor.line..bottom).flat_map(move |idx| {
            let chars = self.line(idx);
            let start = if idx == cursor.line {
                cursor.col.min(chars.len())
            } else {
                0
            };
            chars[start..]
                .iter()
                .enumerate()
                .map(move |(offset, &ch)| (Position::new(idx, start + offset), ch))
        })
    }

    /// Bounds `(top, bottom)` of the non-blank block holding `line`
    ///
    /// `bottom` is exclusive. `None` when `line` itself is blank.
    fn paragraph(&self, line: usize) -> Option<(usize, usize)> {
        if self.is_blank(line) {
            return None;
        }
        let mut top = line;
        while top > self.first_line && !self.is_blank(top - 1) {
            top -= 1;
        }
        let mut bottom = line + 1;
        while bottom < self.end_line() && !self.is_blank(bottom) {
            bottom += 1;
        }
        Some((top, bottom))
    }

    /// A straight or right single quote between two letters/digits, as in "don't"
    fn is_apostrophe(&self, pos: Position) -> bool {
        let chars = self.line(pos.line);
        if pos.col == 0 || !matches!(chars.get(pos.col).copied(), Some('\'' | '’')) {
            return false;
        }
        let prev = chars[pos.col - 1];
        let next = chars.get(pos.col + 1).copied();
        prev.is_alphanumeric() && next.is_some_and(|c| c.is_alphanumeric())
    }
}

/// Lines `(top, bottom)` of the non-blank run around `line`, read from the full text
fn paragraph_bounds<T: TextSnapshot + ?Sized>(text: &T, line: usize) -> (usize, usize) {
    let blank = |idx: usize| text.line(idx).map_or(true, |l| l.trim().is_empty());
    if blank(line) {
        return (line, line + 1);
    }
    let mut top = line;
    while top > 0 && !blank(top - 1) {
        top -= 1;
    }
    let mut bottom = line + 1;
    while bottom < text.line_count() && !blank(bottom) {
        bottom += 1;
    }
    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn pairs_at(text: &str, line: usize, col: usize) -> Vec<SurroundingPair> {
        let buffer = Buffer::from_text("t", text);
        let snap = buffer.snapshot(Position::new(line, col));
        compute_surrounding_pairs(&snap, snap.cursor()).into_iter().collect()
    }

    fn of_kind(pairs: &[SurroundingPair], kind: PairKind) -> Vec<(Position, Position)> {
        pairs
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| (p.open, p.close))
            .collect()
    }

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    #[test]
    fn test_reports_all_enclosing_brackets() {
        // a(b[c]d)e with the cursor either side of `c`
        for col in [4, 5] {
            let pairs = pairs_at("a(b[c]d)e", 0, col);
            assert_eq!(of_kind(&pairs, PairKind::Paren), vec![(p(0, 1), p(0, 7))]);
            assert_eq!(of_kind(&pairs, PairKind::Bracket), vec![(p(0, 3), p(0, 5))]);
            assert_eq!(pairs.len(), 2);
        }
    }

    #[test]
    fn test_unbalanced_bracket_is_no_match() {
        let pairs = pairs_at("a(b", 0, 3);
        assert!(of_kind(&pairs, PairKind::Paren).is_empty());

        let pairs = pairs_at("a)b", 0, 1);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_nested_same_kind() {
        let pairs = pairs_at("((x) (y))", 0, 2);
        let mut parens = of_kind(&pairs, PairKind::Paren);
        parens.sort();
        assert_eq!(parens, vec![(p(0, 0), p(0, 8)), (p(0, 1), p(0, 3))]);
    }

    #[test]
    fn test_sibling_pairs_are_skipped() {
        // Cursor between "(a)" and "(b)" inside an outer brace
        let pairs = pairs_at("{(a) x (b)}", 0, 5);
        assert!(of_kind(&pairs, PairKind::Paren).is_empty());
        assert_eq!(of_kind(&pairs, PairKind::Brace), vec![(p(0, 0), p(0, 10))]);
    }

    #[test]
    fn test_extra_openers_pair_innermost() {
        // Only one closer is available for two openers
        let pairs = pairs_at("((a)", 0, 3);
        assert_eq!(of_kind(&pairs, PairKind::Paren), vec![(p(0, 1), p(0, 3))]);
    }

    #[test]
    fn test_brackets_across_lines() {
        let pairs = pairs_at("[Footnote A:\nSome text\n(see p. 4)]", 1, 3);
        assert_eq!(of_kind(&pairs, PairKind::Bracket), vec![(p(0, 0), p(2, 10))]);
        assert!(of_kind(&pairs, PairKind::Paren).is_empty());
    }

    #[test]
    fn test_cursor_before_opening_bracket_is_outside() {
        let pairs = pairs_at("(a)", 0, 0);
        assert!(pairs.is_empty());
        let pairs = pairs_at("(a)", 0, 3);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_double_quote_pair() {
        let pairs = pairs_at("He said \"hi\" ok", 0, 10);
        let quotes: Vec<_> = pairs
            .iter()
            .filter(|p| p.kind == PairKind::DoubleQuote)
            .collect();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].range(), Range::new(p(0, 8), p(0, 12)));
        assert_eq!(
            quotes[0].markers(),
            [Range::single(p(0, 8)), Range::single(p(0, 11))]
        );
    }

    #[test]
    fn test_cursor_between_quotations() {
        let pairs = pairs_at("\"a\" x \"b\"", 0, 4);
        assert!(of_kind(&pairs, PairKind::DoubleQuote).is_empty());

        let pairs = pairs_at("\"a\" x \"b\"", 0, 7);
        assert_eq!(of_kind(&pairs, PairKind::DoubleQuote), vec![(p(0, 6), p(0, 8))]);
    }

    #[test]
    fn test_curly_quotes_respect_direction() {
        let pairs = pairs_at("“Hello,” she said", 0, 3);
        assert_eq!(of_kind(&pairs, PairKind::DoubleQuote), vec![(p(0, 0), p(0, 7))]);

        let pairs = pairs_at("”wrong“", 0, 3);
        assert!(of_kind(&pairs, PairKind::DoubleQuote).is_empty());
    }

    #[test]
    fn test_apostrophes_are_not_quotes() {
        let pairs = pairs_at("‘don’t’", 0, 2);
        assert_eq!(of_kind(&pairs, PairKind::SingleQuote), vec![(p(0, 0), p(0, 6))]);

        let pairs = pairs_at("It’s John's", 0, 6);
        assert!(of_kind(&pairs, PairKind::SingleQuote).is_empty());
    }

    #[test]
    fn test_quotes_stop_at_paragraph_break() {
        let text = "\"Unclosed opening\n\nnew paragraph\" here";
        let pairs = pairs_at(text, 2, 4);
        assert!(of_kind(&pairs, PairKind::DoubleQuote).is_empty());

        let pairs = pairs_at(text, 1, 0);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_quote_spanning_lines_in_paragraph() {
        let pairs = pairs_at("She wrote, “I will\ncome tomorrow.”", 1, 2);
        assert_eq!(of_kind(&pairs, PairKind::DoubleQuote), vec![(p(0, 11), p(1, 14))]);
    }

    #[test]
    fn test_odd_quotes_do_not_panic() {
        let pairs = pairs_at("\"a\" \"b", 0, 5);
        assert!(of_kind(&pairs, PairKind::DoubleQuote).is_empty());
    }

    #[test]
    fn test_empty_document_and_edges() {
        assert!(pairs_at("", 0, 0).is_empty());
        assert!(pairs_at("(x)", 0, 0).is_empty());
        assert!(pairs_at("(x)", 5, 50).is_empty());

        let lines: Vec<crate::line::Line> = Vec::new();
        let snap = crate::text::Snapshot::new(&lines, p(0, 0));
        assert!(compute_surrounding_pairs(&snap, p(0, 0)).is_empty());
    }

    #[test]
    fn test_cursor_past_line_end_is_clamped() {
        let pairs = pairs_at("(abc\n)", 0, 99);
        assert_eq!(of_kind(&pairs, PairKind::Paren), vec![(p(0, 0), p(1, 0))]);
    }

    #[test]
    fn test_visible_window_bounds_the_scan() {
        let buffer = Buffer::from_text("t", "(\na\nb\nc\n)");
        let snap = buffer.snapshot(p(2, 0)).with_visible(1..4);
        assert!(compute_surrounding_pairs(&snap, p(2, 0)).is_empty());

        let snap = buffer.snapshot(p(2, 0));
        assert_eq!(compute_surrounding_pairs(&snap, p(2, 0)).len(), 1);
    }

    #[test]
    fn test_quote_parity_counts_paragraph_above_window() {
        // Cursor sits between the close of one quotation and the open of the next
        let buffer = Buffer::from_text("t", "He said \"one\nand two\" then \"three\nfour\" ok");
        let cursor = p(1, 12);

        let whole = buffer.snapshot(cursor);
        assert!(compute_surrounding_pairs(&whole, cursor).is_empty());

        let scrolled = buffer.snapshot(cursor).with_visible(1..3);
        assert!(compute_surrounding_pairs(&scrolled, cursor).is_empty());
    }

    #[test]
    fn test_quote_pair_found_across_window_edges() {
        let buffer = Buffer::from_text("t", "“Long\nspeech\ngoes on”\n\nnext");
        let snap = buffer.snapshot(p(1, 2)).with_visible(1..2);
        let pairs: Vec<SurroundingPair> = compute_surrounding_pairs(&snap, p(1, 2)).into_iter().collect();
        assert_eq!(of_kind(&pairs, PairKind::DoubleQuote), vec![(p(0, 0), p(2, 7))]);
    }

    #[test]
    fn test_matcher_toggle_and_kinds() {
        let buffer = Buffer::from_text("t", "(\"[x]\")");
        let snap = buffer.snapshot(p(0, 3));

        let mut matcher = Matcher::new();
        assert!(matcher.compute(&snap).is_empty());

        matcher.enable();
        assert_eq!(matcher.compute(&snap).len(), 3);

        let mut brackets_only = Matcher::with_kinds(&[PairKind::Bracket]);
        brackets_only.enable();
        let pairs = brackets_only.compute(&snap);
        assert_eq!(pairs.len(), 1);
        assert!(pairs.iter().all(|p| p.kind == PairKind::Bracket));

        matcher.disable();
        assert!(!matcher.is_enabled());
        assert!(matcher.compute(&snap).is_empty());
    }
}
