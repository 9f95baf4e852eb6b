//! Quote and bracket pair kinds
//!
//! Each kind knows its glyphs, how those glyphs pair up, and the color its
//! surrounding-pair highlight uses by default.

use super::style::Color;

/// Kinds of surrounding pairs that can be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PairKind {
    SingleQuote,
    DoubleQuote,
    Paren,
    Bracket,
    Brace,
}

/// The role a glyph can play in a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphRole {
    Open,
    Close,
    /// Straight quotes open or close depending on context
    Either,
}

/// Quote families for the "highlight quotes in selection" action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    Single,
    Double,
}

const SINGLE_QUOTES: &[(char, GlyphRole)] = &[
    ('\'', GlyphRole::Either),
    ('‘', GlyphRole::Open),
    ('’', GlyphRole::Close),
    ('‛', GlyphRole::Open),
    ('‚', GlyphRole::Open),
];

const DOUBLE_QUOTES: &[(char, GlyphRole)] = &[
    ('"', GlyphRole::Either),
    ('“', GlyphRole::Open),
    ('”', GlyphRole::Close),
    ('‟', GlyphRole::Open),
    ('„', GlyphRole::Open),
];

impl PairKind {
    /// Every kind, in highlight priority order (quotes first)
    pub const ALL: [PairKind; 5] = [
        PairKind::SingleQuote,
        PairKind::DoubleQuote,
        PairKind::Paren,
        PairKind::Bracket,
        PairKind::Brace,
    ];

    /// Whether glyphs of this kind nest (brackets) or merely alternate (quotes)
    pub fn is_nesting(self) -> bool {
        !matches!(self, PairKind::SingleQuote | PairKind::DoubleQuote)
    }

    /// Role of `ch` in this kind, `None` if it is not one of its glyphs
    ///
    /// Angle brackets and guillemets never belong to any kind.
    pub fn role(self, ch: char) -> Option<GlyphRole> {
        match self {
            PairKind::SingleQuote => lookup(SINGLE_QUOTES, ch),
            PairKind::DoubleQuote => lookup(DOUBLE_QUOTES, ch),
            PairKind::Paren => bracket_role(ch, '(', ')'),
            PairKind::Bracket => bracket_role(ch, '[', ']'),
            PairKind::Brace => bracket_role(ch, '{', '}'),
        }
    }

    /// Default highlight color for this kind
    pub fn default_color(self) -> Color {
        match self {
            PairKind::SingleQuote => Color::Gray,
            PairKind::DoubleQuote => Color::Green,
            PairKind::Paren => Color::Pink,
            PairKind::Bracket => Color::Purple,
            PairKind::Brace => Color::Blue,
        }
    }

    /// Human-readable name, also used as the config key
    pub fn name(self) -> &'static str {
        match self {
            PairKind::SingleQuote => "single-quote",
            PairKind::DoubleQuote => "double-quote",
            PairKind::Paren => "paren",
            PairKind::Bracket => "bracket",
            PairKind::Brace => "brace",
        }
    }
}

impl QuoteKind {
    /// Glyphs highlighted by the selection action
    ///
    /// Unlike surround matching this includes the angle quotation marks.
    pub fn glyphs(self) -> &'static [char] {
        match self {
            QuoteKind::Single => &['\'', '‘', '’', '‹', '›', '‛', '‚'],
            QuoteKind::Double => &['"', '“', '”', '«', '»', '‟', '„'],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QuoteKind::Single => "single",
            QuoteKind::Double => "double",
        }
    }
}

fn lookup(table: &[(char, GlyphRole)], ch: char) -> Option<GlyphRole> {
    table.iter().find(|(g, _)| *g == ch).map(|(_, role)| *role)
}

fn bracket_role(ch: char, open: char, close: char) -> Option<GlyphRole> {
    if ch == open {
        Some(GlyphRole::Open)
    } else if ch == close {
        Some(GlyphRole::Close)
    } else {
        None
    }
}
