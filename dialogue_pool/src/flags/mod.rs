//! The runtime flag store - a fixed 1024-bit vector of narrative progress markers.
//!
//! Flag ids outside `[0, FLAG_CAPACITY)` are never an error: `set` ignores
//! them and `has` reports them as unset, so gating checks stay branch-light
//! and allocation-free.

use serde::{Deserialize, Serialize};

/// Flag identifier as it appears in scripts. Negative or oversized ids are
/// representable so that malformed references degrade instead of failing.
pub type FlagId = i32;

/// Number of distinct flag ids the store can hold.
pub const FLAG_CAPACITY: usize = 1024;

const WORD_BITS: usize = 64;
const WORD_COUNT: usize = FLAG_CAPACITY / WORD_BITS;

/// Bit-vector of narrative flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FlagStore {
    words: [u64; WORD_COUNT],
}

impl FlagStore {
    /// Create an empty flag store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Word index and bit mask for an id, or `None` when out of range.
    fn locate(id: FlagId) -> Option<(usize, u64)> {
        let id = usize::try_from(id).ok()?;
        if id >= FLAG_CAPACITY {
            return None;
        }
        Some((id >> 6, 1u64 << (id & 63)))
    }

    /// Set a flag. Out-of-range ids are ignored.
    pub fn set(&mut self, id: FlagId) {
        if let Some((word, mask)) = Self::locate(id) {
            self.words[word] |= mask;
        }
    }

    /// Test a flag. Out-of-range ids read as unset.
    pub fn has(&self, id: FlagId) -> bool {
        Self::locate(id).is_some_and(|(word, mask)| self.words[word] & mask != 0)
    }

    /// True when every id in `ids` is set. An empty list always passes.
    pub fn has_all(&self, ids: &[FlagId]) -> bool {
        ids.iter().all(|&id| self.has(id))
    }

    /// Set every id in `ids`.
    pub fn set_all(&mut self, ids: &[FlagId]) {
        for &id in ids {
            self.set(id);
        }
    }

    /// Reset every flag (new game).
    pub fn clear_all(&mut self) {
        self.words = [0; WORD_COUNT];
    }

    /// Number of flags currently set.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the set flag ids in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = FlagId> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| (wi * WORD_BITS + bit) as FlagId)
        })
    }
}
