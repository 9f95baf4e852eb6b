//! Highlight engine
//!
//! Ties the matcher, the alignment tracker and the one-shot highlights to a
//! single reconciler, and decides when to recompute. The UI layer calls the
//! toggle actions, reports events through `notify`, and drives `tick` from
//! its event loop.

use std::time::Instant;

use regex::Regex;
use tracing::{debug, warn};

use super::alignment::AlignmentColumnTracker;
use super::matcher::Matcher;
use super::pair::QuoteKind;
use super::reconciler::{HighlightSet, HighlightTag, ReconcileStats, TagReconciler, TagSink};
use super::search::{find_matches, find_quote_marks, scope_ranges, SearchQuery, SearchScope};
use super::throttle::Throttle;
use crate::config::{Config, MarkStyle, SearchMode};
use crate::error::Result;
use crate::text::TextSnapshot;

/// Things the display reports to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    CursorMoved,
    TextChanged,
    Redraw,
}

/// A search highlight that is re-run on every recompute
#[derive(Debug, Clone)]
struct LiveSearch {
    query: SearchQuery,
    regex: Regex,
    scope: SearchScope,
}

pub struct HighlightEngine {
    config: Config,
    matcher: Matcher,
    alignment: AlignmentColumnTracker,
    reconciler: TagReconciler,
    /// Pinned quote marks from the last "highlight quotes in selection"
    quote_marks: HighlightSet,
    /// Pinned one-shot search matches
    search_matches: HighlightSet,
    live_search: Option<LiveSearch>,
    throttle: Throttle,
}

impl HighlightEngine {
    pub fn new(config: Config) -> Self {
        let mut matcher = Matcher::new();
        let mut throttle = Throttle::new(config.highlight.throttle_ms);
        if config.highlight.surround {
            matcher.enable();
            throttle.request_immediate();
        }

        Self {
            config,
            matcher,
            alignment: AlignmentColumnTracker::new(),
            reconciler: TagReconciler::new(),
            quote_marks: HighlightSet::new(),
            search_matches: HighlightSet::new(),
            live_search: None,
            throttle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn alignment(&self) -> &AlignmentColumnTracker {
        &self.alignment
    }

    /// Tags currently applied to the display
    pub fn applied(&self) -> &HighlightSet {
        self.reconciler.applied()
    }

    pub fn enable_surround_highlight(&mut self) {
        self.matcher.enable();
        self.throttle.request_immediate();
    }

    pub fn disable_surround_highlight(&mut self) {
        self.matcher.disable();
        self.throttle.request_immediate();
    }

    /// Flip surround highlighting; returns the new state
    pub fn toggle_surround_highlight(&mut self) -> bool {
        if self.matcher.is_enabled() {
            self.disable_surround_highlight();
        } else {
            self.enable_surround_highlight();
        }
        self.matcher.is_enabled()
    }

    pub fn enable_alignment_highlight(&mut self, column: usize) {
        self.alignment.start(column);
        self.throttle.request_immediate();
    }

    /// Start the alignment column on the character left of the cursor
    ///
    /// At the start of a line the first column is used.
    pub fn enable_alignment_highlight_at_cursor<T: TextSnapshot + ?Sized>(&mut self, text: &T) -> usize {
        let cursor = text.clamp(text.cursor());
        let column = cursor.col.saturating_sub(1);
        self.enable_alignment_highlight(column);
        column
    }

    pub fn disable_alignment_highlight(&mut self) {
        if self.alignment.stop() {
            self.throttle.request_immediate();
        }
    }

    /// Flip the alignment column, capturing it at the cursor; returns the new state
    pub fn toggle_alignment_highlight<T: TextSnapshot + ?Sized>(&mut self, text: &T) -> bool {
        if self.alignment.is_active() {
            self.disable_alignment_highlight();
        } else {
            self.enable_alignment_highlight_at_cursor(text);
        }
        self.alignment.is_active()
    }

    /// Remove every highlight now, including pinned and live search ones
    ///
    /// Surround and alignment highlighting stay switched on and come back
    /// on the next recompute.
    pub fn remove_all_highlights<S: TagSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize> {
        self.quote_marks.clear();
        self.search_matches.clear();
        self.live_search = None;
        let removed = self.reconciler.remove_all(sink)?;
        debug!(removed, "removed all highlights");
        Ok(removed)
    }

    /// Highlight the quote marks of `kind` in the selection
    ///
    /// Replaces previous quote-mark highlights; returns the number found.
    pub fn highlight_quotes_in_selection<T: TextSnapshot + ?Sized>(
        &mut self,
        kind: QuoteKind,
        text: &T,
    ) -> usize {
        self.quote_marks.clear();
        let ranges = text.selection();
        if ranges.is_empty() {
            debug!(kind = kind.name(), "no selection for quote highlighting");
        }

        let style = self.config.quote_mark_style();
        for range in find_quote_marks(text, kind, &ranges) {
            self.quote_marks.insert(HighlightTag::QuoteMark, range, style);
        }
        self.throttle.request_immediate();
        self.quote_marks.len()
    }

    /// Highlight matches of `query`; returns the number of matches now
    ///
    /// In live search mode the query keeps being re-run on every recompute.
    pub fn highlight_matches<T: TextSnapshot + ?Sized>(
        &mut self,
        text: &T,
        query: SearchQuery,
        scope: SearchScope,
    ) -> Result<usize> {
        let regex = query.compile()?;
        let matches = find_matches(text, &regex, &scope_ranges(text, scope));
        debug!(pattern = %query.pattern, count = matches.len(), "search highlight");

        self.search_matches.clear();
        self.live_search = None;
        match self.config.highlight.search_mode {
            SearchMode::OneShot => {
                let style = self.config.search_style();
                for range in &matches {
                    self.search_matches.insert(HighlightTag::Search, *range, style);
                }
            }
            SearchMode::Live => {
                self.live_search = Some(LiveSearch {
                    query,
                    regex,
                    scope,
                });
            }
        }
        self.throttle.request_immediate();
        Ok(matches.len())
    }

    /// Drop string/regex highlights, leaving everything else
    pub fn clear_search_highlights(&mut self) {
        self.search_matches.clear();
        self.live_search = None;
        self.throttle.request_immediate();
    }

    /// The live search query, if one is active
    pub fn live_query(&self) -> Option<&SearchQuery> {
        self.live_search.as_ref().map(|live| &live.query)
    }

    /// Record an edit, cursor move or redraw
    pub fn notify(&mut self, event: EditorEvent) {
        if self.has_live_highlights() || event == EditorEvent::Redraw {
            self.throttle.notify();
        }
    }

    /// When the event loop should next call `tick`, if anything is pending
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.next_deadline()
    }

    /// Recompute if the throttle allows; returns whether a recompute ran
    ///
    /// Failures are logged and the firing is dropped; the next event retries.
    pub fn tick<T, S>(&mut self, text: &T, sink: &mut S, now: Instant) -> bool
    where
        T: TextSnapshot + ?Sized,
        S: TagSink + ?Sized,
    {
        if !self.throttle.poll(now) {
            return false;
        }
        match self.refresh(text, sink) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "highlight refresh failed, skipping");
                false
            }
        }
    }

    /// Recompute and reconcile right away
    pub fn refresh<T, S>(&mut self, text: &T, sink: &mut S) -> Result<ReconcileStats>
    where
        T: TextSnapshot + ?Sized,
        S: TagSink + ?Sized,
    {
        let wanted = self.compose(text);
        self.reconciler.reconcile(&wanted, sink)
    }

    /// Whether anything depends on the current text or cursor
    fn has_live_highlights(&self) -> bool {
        self.matcher.is_enabled() || self.alignment.is_active() || self.live_search.is_some()
    }

    /// The full set of tags that should be on screen for `text`
    fn compose<T: TextSnapshot + ?Sized>(&self, text: &T) -> HighlightSet {
        let mut set = HighlightSet::new();

        for pair in self.matcher.compute(text) {
            let tag = HighlightTag::Surround(pair.kind);
            let style = self.config.surround_style(pair.kind);
            match self.config.highlight.mark {
                MarkStyle::Markers => {
                    for range in pair.markers() {
                        set.insert(tag, range, style);
                    }
                }
                MarkStyle::Span => set.insert(tag, pair.range(), style),
            }
        }

        let style = self.config.alignment_style();
        for range in self.alignment.compute_ranges(text) {
            set.insert(HighlightTag::Alignment, range, style);
        }

        if let Some(live) = &self.live_search {
            let style = self.config.search_style();
            let ranges = scope_ranges(text, live.scope);
            for range in find_matches(text, &live.regex, &ranges) {
                set.insert(HighlightTag::Search, range, style);
            }
        }

        set.extend(&self.quote_marks);
        set.extend(&self.search_matches);
        set
    }
}
