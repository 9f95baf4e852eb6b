//! Highlight module
//!
//! This module provides the highlighting engine used for:
//! - Surrounding bracket and quote pairs at the cursor
//! - Alignment column highlighting
//! - Quote marks, strings and regex matches in the selection

mod alignment;
mod engine;
mod matcher;
mod pair;
mod reconciler;
mod search;
mod style;
pub mod throttle;

pub use alignment::AlignmentColumnTracker;
pub use engine::{EditorEvent, HighlightEngine};
pub use matcher::{compute_surrounding_pairs, Matcher, SurroundingPair};
pub use pair::{GlyphRole, PairKind, QuoteKind};
pub use reconciler::{
    HighlightSet, HighlightTag, ReconcileStats, TagKey, TagReconciler, TagSink, TagStore,
};
pub use search::{find_matches, find_quote_marks, scope_ranges, MatchMode, SearchQuery, SearchScope};
pub use style::{Color, Style};
