//! Non-interactive highlight report (`--at LINE:COL`)

use std::fmt::Write;

use proofmark::buffer::Buffer;
use proofmark::error::{ProofmarkError, Result};
use proofmark::highlight::{HighlightEngine, TagStore};
use proofmark::text::{Position, Range, TextSnapshot};
use proofmark::Config;

/// What to compute for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Zero-based cursor
    pub cursor: Position,
    pub surround: bool,
    pub align: bool,
}

/// Parse a 1-based "LINE:COL" argument into a zero-based position
pub fn parse_position(arg: &str) -> Result<Position> {
    let invalid = || ProofmarkError::Message(format!("Invalid position '{}', expected LINE:COL", arg));
    let (line, col) = arg.split_once(':').ok_or_else(invalid)?;
    let line: usize = line.trim().parse().map_err(|_| invalid())?;
    let col: usize = col.trim().parse().map_err(|_| invalid())?;
    if line == 0 || col == 0 {
        return Err(invalid());
    }
    Ok(Position::new(line - 1, col - 1))
}

/// One line per highlight: tag name, 1-based range, and the covered text
pub fn render_report(buffer: &Buffer, config: Config, options: ReportOptions) -> Result<String> {
    let text = buffer.snapshot(options.cursor);
    let mut engine = HighlightEngine::new(config);
    if options.surround {
        engine.enable_surround_highlight();
    } else {
        engine.disable_surround_highlight();
    }
    if options.align {
        engine.enable_alignment_highlight_at_cursor(&text);
    }

    let mut tags = TagStore::new();
    engine.refresh(&text, &mut tags)?;

    let mut out = String::new();
    for (key, _) in tags.tags() {
        let _ = writeln!(
            out,
            "{:<13} {:<14} {}",
            key.tag.name(),
            format_range(&key.range),
            excerpt(&text, &key.range)
        );
    }
    Ok(out)
}

fn format_range(range: &Range) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line + 1,
        range.start.col + 1,
        range.end.line + 1,
        range.end.col + 1
    )
}

/// The covered text, or "..." for ranges spanning lines
fn excerpt<T: TextSnapshot + ?Sized>(text: &T, range: &Range) -> String {
    if range.start.line != range.end.line {
        return "...".to_string();
    }
    text.line(range.start.line)
        .map(|line| {
            line.chars()
                .skip(range.start.col)
                .take(range.end.col - range.start.col)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(line: usize, col: usize) -> ReportOptions {
        ReportOptions {
            cursor: Position::new(line, col),
            surround: true,
            align: false,
        }
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("3:7").unwrap(), Position::new(2, 6));
        assert!(parse_position("0:1").is_err());
        assert!(parse_position("12").is_err());
        assert!(parse_position("a:b").is_err());
    }

    #[test]
    fn test_report_lists_surrounding_pairs() {
        let buffer = Buffer::from_text("t", "a(b[c]d)e");
        let report = render_report(&buffer, Config::default(), options(0, 4)).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("paren") && lines[0].contains("1:2-1:3") && lines[0].ends_with('('));
        assert!(lines[3].starts_with("bracket") && lines[3].ends_with(']'));
    }

    #[test]
    fn test_report_alignment_only() {
        let buffer = Buffer::from_text("t", "(abc)\nxy\nwxyz");
        let opts = ReportOptions {
            surround: false,
            align: true,
            ..options(0, 3)
        };
        let report = render_report(&buffer, Config::default(), opts).unwrap();
        assert_eq!(report.lines().count(), 2);
        assert!(report.lines().all(|l| l.starts_with("alignment")));
        assert!(report.contains("3:3-3:4"));
    }
}
