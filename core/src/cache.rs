//! Per-statement result cache.
//!
//! The cache is an ordered sequence parallel to the statement list of the
//! previous evaluation pass. Entry `i` is reusable at position `i` of a new
//! pass iff its fingerprint matches; on the first mismatch everything from
//! that position on is dropped, because a later statement's cached outcome
//! may depend on environment state produced by the changed statement. The
//! cache is only ever truncated and appended to, never reordered.

use crate::outcome::Outcome;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: Vec<CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
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

    /// Look up the entry at `index`.
    ///
    /// On a fingerprint match the cached outcome is returned untouched. On
    /// a mismatch the entry and everything after it are discarded and the
    /// caller must re-execute.
    pub fn lookup(&mut self, index: usize, fingerprint: &str) -> Option<&Outcome> {
        let hit = match self.entries.get(index) {
            None => return None,
            Some(entry) => entry.fingerprint == fingerprint,
        };
        if hit {
            Some(&self.entries[index].outcome)
        } else {
            tracing::debug!(index, dropped = self.entries.len() - index, "cache truncated");
            self.entries.truncate(index);
            None
        }
    }

    /// Append the freshly computed entry for `index`.
    ///
    /// The lookup step leaves the cache truncated to exactly `index`
    /// entries, so appending keeps positions aligned with the statement
    /// list.
    pub fn record(&mut self, index: usize, fingerprint: String, outcome: Outcome) {
        debug_assert_eq!(self.entries.len(), index, "cache out of step with pass");
        self.entries.truncate(index);
        self.entries.push(CacheEntry {
            fingerprint,
            outcome,
        });
    }
}
