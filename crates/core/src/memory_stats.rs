//! Arena memory statistics
//!
//! The arena never frees individual objects, so the interesting numbers are
//! how far the allocation pointer has advanced and how much of that was
//! spent on List growth (every relocation abandons the old copy).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of an arena's usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaStats {
    /// Usable arena size in words
    pub capacity_words: usize,
    /// Words between arena start and the allocation pointer
    pub used_words: usize,
    /// Words still available (what `freeMemory` reports)
    pub free_words: usize,
    /// High-water mark of `used_words` across resets
    pub peak_used_words: usize,
    /// Objects allocated since the arena was created
    pub allocations: u64,
    /// Objects replaced by a larger copy (List growth)
    pub relocations: u64,
    /// Words handed out to relocation copies
    pub relocated_words: u64,
    /// Number of arena resets
    pub resets: u64,
}

impl ArenaStats {
    /// Render as a JSON object (for host-side reporting)
    #[cfg(feature = "report-json")]
    pub fn to_json(&self) -> String {
        // A struct of integers cannot fail to serialize
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} words used out of {}",
            self.used_words, self.capacity_words
        )
    }
}

/// Running counters kept by the arena
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub peak_used_words: usize,
    pub allocations: u64,
    pub relocations: u64,
    pub relocated_words: u64,
    pub resets: u64,
}

impl Counters {
    #[inline]
    pub fn note_allocation(&mut self, used_words: usize) {
        self.allocations += 1;
        if used_words > self.peak_used_words {
            self.peak_used_words = used_words;
        }
    }

    #[inline]
    pub fn note_relocation(&mut self, words: usize) {
        self.relocations += 1;
        self.relocated_words += words as u64;
    }
}
