//! Configuration file support
//!
//! Loads settings from ~/.proofmark.toml (or %USERPROFILE%\.proofmark.toml
//! on Windows). A missing file means defaults; unknown keys are ignored.
//!
//! Example:
//! ```text
//! [highlight]
//! surround = true
//! throttle-ms = 200
//! theme = "dark"
//! search-mode = "live"
//! mark = "span"
//!
//! [colors]
//! paren = "#ffb6c1"
//! alignment = "yellow"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::highlight::throttle::DEFAULT_THROTTLE_MS;
use crate::highlight::{Color, PairKind, Style};

/// Upper bound on the recompute interval
const MAX_THROTTLE_MS: u64 = 2000;

/// Color theme, used for the quote-mark highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Default,
    Light,
    Dark,
}

/// Whether a string/regex highlight is applied once or kept up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    #[default]
    OneShot,
    Live,
}

/// What a surrounding-pair highlight covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkStyle {
    /// Only the opening and closing glyphs
    #[default]
    Markers,
    /// Everything from the opening glyph through the closing glyph
    Span,
}

/// `[highlight]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HighlightSettings {
    /// Surround highlighting enabled at startup
    pub surround: bool,
    /// Minimum milliseconds between recomputes
    pub throttle_ms: u64,
    pub theme: Theme,
    pub search_mode: SearchMode,
    pub mark: MarkStyle,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            surround: false,
            throttle_ms: DEFAULT_THROTTLE_MS,
            theme: Theme::Default,
            search_mode: SearchMode::OneShot,
            mark: MarkStyle::Markers,
        }
    }
}

/// `[colors]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ColorSettings {
    pub single_quote: Color,
    pub double_quote: Color,
    pub paren: Color,
    pub bracket: Color,
    pub brace: Color,
    pub alignment: Color,
    pub search: Color,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            single_quote: PairKind::SingleQuote.default_color(),
            double_quote: PairKind::DoubleQuote.default_color(),
            paren: PairKind::Paren.default_color(),
            bracket: PairKind::Bracket.default_color(),
            brace: PairKind::Brace.default_color(),
            alignment: Color::Rgb(0xd8, 0xb4, 0xfe),
            search: QUOTE_MARK_BG,
        }
    }
}

/// Background shared by the quote-mark highlight in every theme
const QUOTE_MARK_BG: Color = Color::Rgb(0xa0, 0x8d, 0xfc);

/// Configuration settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub highlight: HighlightSettings,
    pub colors: ColorSettings,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".proofmark.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".proofmark.toml"))
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.highlight.throttle_ms = config.highlight.throttle_ms.min(MAX_THROTTLE_MS);
        Ok(config)
    }

    /// Tag style for a surrounding pair of `kind`
    pub fn surround_style(&self, kind: PairKind) -> Style {
        let color = match kind {
            PairKind::SingleQuote => self.colors.single_quote,
            PairKind::DoubleQuote => self.colors.double_quote,
            PairKind::Paren => self.colors.paren,
            PairKind::Bracket => self.colors.bracket,
            PairKind::Brace => self.colors.brace,
        };
        Style::bg(color).with_fg(Color::Black)
    }

    /// Tag style for alignment column characters
    pub fn alignment_style(&self) -> Style {
        Style::bg(self.colors.alignment).with_fg(Color::Black)
    }

    /// Tag style for string/regex matches
    pub fn search_style(&self) -> Style {
        Style::bg(self.colors.search).with_fg(Color::Black)
    }

    /// Tag style for quote marks highlighted in the selection
    pub fn quote_mark_style(&self) -> Style {
        let fg = match self.highlight.theme {
            Theme::Dark => Color::White,
            Theme::Light | Theme::Default => Color::Black,
        };
        Style::bg(QUOTE_MARK_BG).with_fg(fg)
    }
}
