//! Style types for highlight tags
//!
//! Tags carry a `Style`; the renderer folds the styles of every tag that
//! covers a character into the one it draws with.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ProofmarkError;

/// Highlight colors
///
/// The named colors are the ones the proofreading palette is built from;
/// anything else can be given as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Color {
    #[default]
    Default,
    Black,
    White,
    Gray,
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Pink,
    Purple,
    Rgb(u8, u8, u8),
}

impl Color {
    /// RGB value for this color, `None` for the terminal default
    pub fn to_rgb(self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Default => None,
            Color::Black => Some((0, 0, 0)),
            Color::White => Some((255, 255, 255)),
            Color::Gray => Some((190, 190, 190)),
            Color::Red => Some((240, 80, 80)),
            Color::Green => Some((144, 238, 144)),
            Color::Yellow => Some((255, 236, 139)),
            Color::Blue => Some((135, 206, 250)),
            Color::Cyan => Some((150, 230, 230)),
            Color::Pink => Some((255, 182, 193)),
            Color::Purple => Some((203, 153, 255)),
            Color::Rgb(r, g, b) => Some((r, g, b)),
        }
    }
}

impl FromStr for Color {
    type Err = ProofmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ProofmarkError::InvalidColor(s.to_string()));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| ProofmarkError::InvalidColor(s.to_string()))
            };
            return Ok(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        match s.to_lowercase().as_str() {
            "default" | "none" => Ok(Color::Default),
            "black" => Ok(Color::Black),
            "white" => Ok(Color::White),
            "gray" | "grey" => Ok(Color::Gray),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "cyan" => Ok(Color::Cyan),
            "pink" => Ok(Color::Pink),
            "purple" => Ok(Color::Purple),
            _ => Err(ProofmarkError::InvalidColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ProofmarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Default => write!(f, "default"),
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
            Color::Gray => write!(f, "gray"),
            Color::Red => write!(f, "red"),
            Color::Green => write!(f, "green"),
            Color::Yellow => write!(f, "yellow"),
            Color::Blue => write!(f, "blue"),
            Color::Cyan => write!(f, "cyan"),
            Color::Pink => write!(f, "pink"),
            Color::Purple => write!(f, "purple"),
            Color::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Create a style with just background color
    pub fn bg(color: Color) -> Self {
        Self {
            bg: color,
            ..Default::default()
        }
    }

    /// Create a reverse video style (for the selection)
    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Layer `over` on top of this style; set fields of `over` win
    pub fn merge(self, over: Style) -> Style {
        Style {
            fg: if over.fg == Color::Default { self.fg } else { over.fg },
            bg: if over.bg == Color::Default { self.bg } else { over.bg },
            bold: self.bold || over.bold,
            underline: self.underline || over.underline,
            reverse: self.reverse || over.reverse,
        }
    }
}
