//! Character, string and regex highlighting
//!
//! Finds matches of a query inside the selection (or the whole document)
//! one line at a time, and locates quote marks for the "highlight quotes
//! in selection" actions.

use regex::{Regex, RegexBuilder};

use super::pair::QuoteKind;
use crate::error::{ProofmarkError, Result};
use crate::line::char_to_byte;
use crate::text::{Position, Range, TextSnapshot};

/// How the pattern text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Exact,
    Regex,
}

/// Where to look for matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    Selection,
    /// A selection that has since been cleared
    PreviousSelection(Range),
    WholeDocument,
}

/// A highlight search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub pattern: String,
    pub mode: MatchMode,
    pub nocase: bool,
    pub wholeword: bool,
}

impl SearchQuery {
    /// Case-sensitive exact string query
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mode: MatchMode::Exact,
            nocase: false,
            wholeword: false,
        }
    }

    /// Case-sensitive regex query
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            mode: MatchMode::Regex,
            ..Self::exact(pattern)
        }
    }

    pub fn with_nocase(mut self) -> Self {
        self.nocase = true;
        self
    }

    pub fn with_wholeword(mut self) -> Self {
        self.wholeword = true;
        self
    }

    /// Build the regex for this query
    pub fn compile(&self) -> Result<Regex> {
        if self.pattern.is_empty() {
            return Err(ProofmarkError::EmptyPattern);
        }
        let body = match self.mode {
            MatchMode::Exact => regex::escape(&self.pattern),
            MatchMode::Regex => self.pattern.clone(),
        };
        let source = if self.wholeword {
            format!(r"\b(?:{})\b", body)
        } else {
            body
        };
        Ok(RegexBuilder::new(&source)
            .case_insensitive(self.nocase)
            .build()?)
    }
}

/// The ranges a scope covers in the current snapshot
///
/// An empty result means there is nothing to search (no selection).
pub fn scope_ranges<T: TextSnapshot + ?Sized>(text: &T, scope: SearchScope) -> Vec<Range> {
    match scope {
        SearchScope::Selection => text.selection(),
        SearchScope::PreviousSelection(range) => {
            let range = Range::new(text.clamp(range.start), text.clamp(range.end));
            if range.is_empty() {
                Vec::new()
            } else {
                vec![range]
            }
        }
        SearchScope::WholeDocument => {
            let count = text.line_count();
            if count == 0 {
                return Vec::new();
            }
            let last = count - 1;
            vec![Range::new(
                Position::default(),
                Position::new(last, text.line_len(last)),
            )]
        }
    }
}

/// Non-empty matches of `regex` inside `ranges`, searched line by line
///
/// The regex sees the whole line, so anchors and word boundaries are judged
/// by the real text around a range edge; only matches lying entirely inside
/// the range are kept.
pub fn find_matches<T: TextSnapshot + ?Sized>(
    text: &T,
    regex: &Regex,
    ranges: &[Range],
) -> Vec<Range> {
    let mut found = Vec::new();
    for_each_segment(text, ranges, |line_idx, line, start, end| {
        let byte_end = char_to_byte(line, end);
        let mut at = char_to_byte(line, start);
        while at <= byte_end {
            let Some(m) = regex.find_at(line, at) else {
                break;
            };
            if m.end() > byte_end {
                break;
            }
            if m.start() == m.end() {
                match line[m.end()..].chars().next() {
                    Some(ch) => at = m.end() + ch.len_utf8(),
                    None => break,
                }
                continue;
            }
            let from = line[..m.start()].chars().count();
            let to = from + m.as_str().chars().count();
            found.push(Range::new(
                Position::new(line_idx, from),
                Position::new(line_idx, to),
            ));
            at = m.end();
        }
    });
    found
}

/// Single-character ranges over each quote glyph of `kind` inside `ranges`
pub fn find_quote_marks<T: TextSnapshot + ?Sized>(
    text: &T,
    kind: QuoteKind,
    ranges: &[Range],
) -> Vec<Range> {
    let glyphs = kind.glyphs();
    let mut found = Vec::new();
    for_each_segment(text, ranges, |line_idx, line, start, end| {
        found.extend(
            line.chars()
                .enumerate()
                .skip(start)
                .take(end - start)
                .filter(|(_, ch)| glyphs.contains(ch))
                .map(|(col, _)| Range::single(Position::new(line_idx, col))),
        );
    });
    found
}

/// Visit the per-line column segments covered by `ranges`
fn for_each_segment<T, F>(text: &T, ranges: &[Range], mut visit: F)
where
    T: TextSnapshot + ?Sized,
    F: FnMut(usize, &str, usize, usize),
{
    let count = text.line_count();
    for range in ranges {
        let last = range.end.line.min(count.saturating_sub(1));
        for line_idx in range.start.line..=last {
            let Some(line) = text.line(line_idx) else {
                continue;
            };
            let line_len = line.chars().count();
            if let Some((start, end)) = range.columns_on_line(line_idx, line_len) {
                visit(line_idx, line, start, end);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    #[test]
    fn test_exact_query_escapes_metacharacters() {
        let regex = SearchQuery::exact("p. 12").compile().unwrap();
        assert!(regex.is_match("see p. 12"));
        assert!(!regex.is_match("see px 12"));
    }

    #[test]
    fn test_query_options() {
        let regex = SearchQuery::exact("arm").with_wholeword().compile().unwrap();
        assert!(regex.is_match("an arm here"));
        assert!(!regex.is_match("harmless"));

        let regex = SearchQuery::exact("tbe").with_nocase().compile().unwrap();
        assert!(regex.is_match("Tbe scanno"));
    }

    #[test]
    fn test_invalid_and_empty_patterns() {
        assert!(matches!(
            SearchQuery::regex("(unclosed").compile(),
            Err(ProofmarkError::InvalidPattern(_))
        ));
        assert!(matches!(
            SearchQuery::exact("").compile(),
            Err(ProofmarkError::EmptyPattern)
        ));
    }

    #[test]
    fn test_find_matches_whole_document() {
        let buffer = Buffer::from_text("t", "modem mode\n“modern” mod");
        let snap = buffer.snapshot(p(0, 0));
        let regex = SearchQuery::regex(r"mod\w*").compile().unwrap();
        let ranges = scope_ranges(&snap, SearchScope::WholeDocument);
        let found = find_matches(&snap, &regex, &ranges);
        assert_eq!(
            found,
            vec![
                Range::new(p(0, 0), p(0, 5)),
                Range::new(p(0, 6), p(0, 10)),
                Range::new(p(1, 1), p(1, 7)),
                Range::new(p(1, 9), p(1, 12)),
            ]
        );
    }

    #[test]
    fn test_find_matches_clips_to_selection() {
        let buffer = Buffer::from_text("t", "aaa\naaa\naaa");
        let selection = Range::new(p(0, 2), p(2, 1));
        let snap = buffer.snapshot(p(0, 0)).with_selection(Some(selection));
        let regex = SearchQuery::exact("a").compile().unwrap();
        let found = find_matches(&snap, &regex, &scope_ranges(&snap, SearchScope::Selection));
        // 1 on the first line, 3 on the second, 1 on the third
        assert_eq!(found.len(), 5);
        assert_eq!(found[0], Range::single(p(0, 2)));
        assert_eq!(found[4], Range::single(p(2, 0)));
    }

    #[test]
    fn test_word_boundaries_see_text_outside_selection() {
        let buffer = Buffer::from_text("t", "harm arm");
        let selection = Range::new(p(0, 1), p(0, 8));
        let snap = buffer.snapshot(p(0, 0)).with_selection(Some(selection));
        let ranges = scope_ranges(&snap, SearchScope::Selection);

        let regex = SearchQuery::exact("arm").with_wholeword().compile().unwrap();
        assert_eq!(
            find_matches(&snap, &regex, &ranges),
            vec![Range::new(p(0, 5), p(0, 8))]
        );

        let regex = SearchQuery::regex("^arm").compile().unwrap();
        assert!(find_matches(&snap, &regex, &ranges).is_empty());
    }

    #[test]
    fn test_matches_crossing_selection_end_are_dropped() {
        let buffer = Buffer::from_text("t", "“armour” arm");
        let selection = Range::new(p(0, 0), p(0, 4));
        let snap = buffer.snapshot(p(0, 0)).with_selection(Some(selection));
        let regex = SearchQuery::regex(r"arm\w*").compile().unwrap();
        let ranges = scope_ranges(&snap, SearchScope::Selection);
        assert!(find_matches(&snap, &regex, &ranges).is_empty());
    }

    #[test]
    fn test_zero_width_matches_are_skipped() {
        let buffer = Buffer::from_text("t", "abc");
        let snap = buffer.snapshot(p(0, 0));
        let regex = SearchQuery::regex("x*").compile().unwrap();
        let ranges = scope_ranges(&snap, SearchScope::WholeDocument);
        assert!(find_matches(&snap, &regex, &ranges).is_empty());
    }

    #[test]
    fn test_previous_selection_scope_is_clamped() {
        let buffer = Buffer::from_text("t", "one arm\ntwo arms");
        let snap = buffer.snapshot(p(0, 0));
        let earlier = Range::new(p(0, 4), p(7, 0));
        let ranges = scope_ranges(&snap, SearchScope::PreviousSelection(earlier));
        assert_eq!(ranges, vec![Range::new(p(0, 4), p(1, 8))]);

        let regex = SearchQuery::exact("arm").compile().unwrap();
        assert_eq!(
            find_matches(&snap, &regex, &ranges),
            vec![Range::new(p(0, 4), p(0, 7)), Range::new(p(1, 4), p(1, 7))]
        );

        let past_end = Range::new(p(5, 0), p(6, 0));
        assert!(scope_ranges(&snap, SearchScope::PreviousSelection(past_end)).is_empty());
    }

    #[test]
    fn test_no_selection_means_no_ranges() {
        let buffer = Buffer::from_text("t", "text");
        let snap = buffer.snapshot(p(0, 0));
        assert!(scope_ranges(&snap, SearchScope::Selection).is_empty());
    }

    #[test]
    fn test_find_quote_marks_in_selection() {
        let buffer = Buffer::from_text("t", "«Oui,» he said, ‘it’s “fine”’\n\"x\"");
        let selection = Range::new(p(0, 0), p(1, 1));
        let snap = buffer.snapshot(p(0, 0)).with_selection(Some(selection));
        let ranges = scope_ranges(&snap, SearchScope::Selection);

        let doubles = find_quote_marks(&snap, QuoteKind::Double, &ranges);
        let cols: Vec<(usize, usize)> = doubles.iter().map(|r| (r.start.line, r.start.col)).collect();
        assert_eq!(cols, vec![(0, 0), (0, 5), (0, 22), (0, 27), (1, 0)]);

        let singles = find_quote_marks(&snap, QuoteKind::Single, &ranges);
        assert_eq!(singles.len(), 3);
    }
}
