//! Tag bookkeeping and reconciliation
//!
//! The reconciler remembers what is currently tagged on screen and, given
//! the newly computed set, issues only the removals and applications needed
//! to get from one to the other.

use std::collections::btree_map;
use std::collections::BTreeMap;

use tracing::trace;

use super::pair::PairKind;
use super::style::Style;
use crate::error::Result;
use crate::text::{Position, Range};

/// Which feature a tag belongs to
///
/// Ordered from lowest to highest drawing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HighlightTag {
    Search,
    QuoteMark,
    Alignment,
    Surround(PairKind),
}

impl HighlightTag {
    pub fn name(&self) -> &'static str {
        match self {
            HighlightTag::Search => "search",
            HighlightTag::QuoteMark => "quote-mark",
            HighlightTag::Alignment => "alignment",
            HighlightTag::Surround(kind) => kind.name(),
        }
    }
}

/// Stable identity of an applied tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagKey {
    pub tag: HighlightTag,
    pub range: Range,
}

impl TagKey {
    pub fn new(tag: HighlightTag, range: Range) -> Self {
        Self { tag, range }
    }
}

/// A set of tags with the style each should be drawn with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    entries: BTreeMap<TagKey, Style>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; an identical key keeps only the latest style
    pub fn insert(&mut self, tag: HighlightTag, range: Range, style: Style) {
        self.entries.insert(TagKey::new(tag, range), style);
    }

    pub fn get(&self, key: &TagKey) -> Option<Style> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &TagKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &TagKey) -> Option<Style> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: &HighlightSet) {
        self.entries
            .extend(other.entries.iter().map(|(k, s)| (*k, *s)));
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TagKey, Style> {
        self.entries.iter()
    }

    /// Ranges carrying `tag`, in order
    pub fn ranges(&self, tag: HighlightTag) -> Vec<Range> {
        self.entries
            .keys()
            .filter(|k| k.tag == tag)
            .map(|k| k.range)
            .collect()
    }
}

impl<'a> IntoIterator for &'a HighlightSet {
    type Item = (&'a TagKey, &'a Style);
    type IntoIter = btree_map::Iter<'a, TagKey, Style>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The display-side tagging API
///
/// Removing a key that is not applied must be a no-op.
pub trait TagSink {
    fn apply_tag(&mut self, key: &TagKey, style: Style) -> Result<()>;
    fn remove_tag(&mut self, key: &TagKey) -> Result<()>;
}

/// Counts of sink operations issued by one reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub applied: usize,
    pub removed: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.applied == 0 && self.removed == 0
    }
}

/// Owns the set of tags currently applied through a sink
#[derive(Debug, Default)]
pub struct TagReconciler {
    applied: HighlightSet,
}

impl TagReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags currently applied
    pub fn applied(&self) -> &HighlightSet {
        &self.applied
    }

    /// Bring the sink from the applied set to `new` with minimal operations
    ///
    /// Applied state is updated after each successful sink call, so on error
    /// it still mirrors what the sink holds.
    pub fn reconcile<S: TagSink + ?Sized>(
        &mut self,
        new: &HighlightSet,
        sink: &mut S,
    ) -> Result<ReconcileStats> {
        let mut stats = ReconcileStats::default();

        let stale: Vec<TagKey> = self
            .applied
            .iter()
            .filter(|(key, style)| new.get(key) != Some(**style))
            .map(|(key, _)| *key)
            .collect();

        for key in stale {
            sink.remove_tag(&key)?;
            self.applied.remove(&key);
            stats.removed += 1;
        }

        for (key, style) in new {
            if !self.applied.contains(key) {
                sink.apply_tag(key, *style)?;
                self.applied.entries.insert(*key, *style);
                stats.applied += 1;
            }
        }

        if !stats.is_noop() {
            trace!(
                applied = stats.applied,
                removed = stats.removed,
                total = self.applied.len(),
                "reconciled highlight tags"
            );
        }
        Ok(stats)
    }

    /// Remove every applied tag regardless of kind
    pub fn remove_all<S: TagSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize> {
        let keys: Vec<TagKey> = self.applied.entries.keys().copied().collect();
        let mut removed = 0;
        for key in keys {
            sink.remove_tag(&key)?;
            self.applied.remove(&key);
            removed += 1;
        }
        Ok(removed)
    }
}

/// In-memory tag sink
///
/// Holds the tags as a display would, and counts the operations it receives.
#[derive(Debug, Default)]
pub struct TagStore {
    tags: HighlightSet,
    applies: usize,
    removes: usize,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &HighlightSet {
        &self.tags
    }

    /// Total apply calls received
    pub fn apply_count(&self) -> usize {
        self.applies
    }

    /// Total remove calls received
    pub fn remove_count(&self) -> usize {
        self.removes
    }

    /// Combined style of every tag covering the character at `pos`
    pub fn style_at(&self, pos: Position) -> Style {
        self.tags
            .iter()
            .filter(|(key, _)| key.range.contains(pos))
            .fold(Style::default(), |acc, (_, style)| acc.merge(*style))
    }

    /// Per-char styles for a line of `line_len` chars
    pub fn line_styles(&self, line: usize, line_len: usize) -> Vec<Style> {
        let mut styles = vec![Style::default(); line_len];
        for (key, style) in &self.tags {
            if let Some((start, end)) = key.range.columns_on_line(line, line_len) {
                for slot in &mut styles[start..end] {
                    *slot = slot.merge(*style);
                }
            }
        }
        styles
    }
}

impl TagSink for TagStore {
    fn apply_tag(&mut self, key: &TagKey, style: Style) -> Result<()> {
        self.applies += 1;
        self.tags.entries.insert(*key, style);
        Ok(())
    }

    fn remove_tag(&mut self, key: &TagKey) -> Result<()> {
        self.removes += 1;
        self.tags.remove(key);
        Ok(())
    }
}
