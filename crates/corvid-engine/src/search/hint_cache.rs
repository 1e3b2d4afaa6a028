//! Persistent cross-search move-ordering hints, keyed by Zobrist key.
//!
//! Unlike the transposition table (cleared or overwritten freely within a
//! single search), the hint cache is meant to survive across searches of
//! related positions — e.g. the position reached after the opponent's
//! reply to our last search's best move. It never stores bounds, only a
//! best-move suggestion and the depth/score it was found at, and evicts the
//! least-recently-used entry once it grows past its capacity.

use corvid_core::Move;

/// Maximum number of positions tracked before LRU eviction kicks in.
const CAPACITY: usize = 5000;

/// A recorded move-ordering hint for one position.
#[derive(Debug, Clone, Copy)]
pub struct HintRecord {
    /// The best move found for this position in a prior search.
    pub best_move: Move,
    /// Score (centipawns, side-to-move POV) at the time it was recorded.
    pub score: i32,
    /// Search depth the hint was recorded at.
    pub depth: u8,
    /// Caller-defined tag (e.g. distinguishing game vs. analysis hints).
    pub tag: u8,
    /// Logical timestamp used for LRU eviction — larger is more recent.
    pub timestamp: u64,
}

/// Fixed-capacity, LRU-evicted cache of move-ordering hints.
pub struct HintCache {
    entries: std::collections::HashMap<u64, HintRecord>,
    clock: u64,
}

impl HintCache {
    /// Create an empty hint cache.
    pub fn new() -> Self {
        Self {
            entries: std::collections::HashMap::new(),
            clock: 0,
        }
    }

    /// Look up the hint for a position, if any.
    pub fn get(&self, key: u64) -> Option<&HintRecord> {
        self.entries.get(&key)
    }

    /// Record (or overwrite) the hint for a position and bump its
    /// recency. Evicts the single least-recently-used entry if this
    /// insertion would grow the cache past [`CAPACITY`].
    pub fn record(&mut self, key: u64, best_move: Move, score: i32, depth: u8, tag: u8) {
        self.clock += 1;
        let timestamp = self.clock;

        if !self.entries.contains_key(&key) && self.entries.len() >= CAPACITY {
            self.evict_lru();
        }

        self.entries.insert(
            key,
            HintRecord { best_move, score, depth, tag, timestamp },
        );
    }

    /// Number of hints currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no hints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_lru(&mut self) {
        if let Some((&oldest_key, _)) = self.entries.iter().min_by_key(|(_, r)| r.timestamp) {
            self.entries.remove(&oldest_key);
        }
    }
}

impl Default for HintCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_core::Square;

    #[test]
    fn record_and_get_roundtrip() {
        let mut cache = HintCache::new();
        let mv = Move::new(Square::E2, Square::E4);
        cache.record(0xABCD, mv, 25, 6, 0);

        let hint = cache.get(0xABCD).expect("should find recorded hint");
        assert_eq!(hint.best_move, mv);
        assert_eq!(hint.score, 25);
        assert_eq!(hint.depth, 6);
    }

    #[test]
    fn miss_returns_none() {
        let cache = HintCache::new();
        assert!(cache.get(0x1234).is_none());
    }

    #[test]
    fn overwrite_updates_record_not_count() {
        let mut cache = HintCache::new();
        let mv1 = Move::new(Square::E2, Square::E4);
        let mv2 = Move::new(Square::D2, Square::D4);
        cache.record(0xABCD, mv1, 10, 4, 0);
        cache.record(0xABCD, mv2, 20, 6, 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(0xABCD).unwrap().best_move, mv2);
    }

    #[test]
    fn eviction_drops_least_recently_used() {
        let mut cache = HintCache::new();
        let mv = Move::new(Square::E2, Square::E4);

        for key in 0..CAPACITY as u64 {
            cache.record(key, mv, 0, 1, 0);
        }
        assert_eq!(cache.len(), CAPACITY);

        // Touch key 1 so it's no longer the least-recently-used entry.
        cache.record(1, mv, 0, 1, 0);

        // Inserting one more distinct key should evict key 0 (oldest untouched).
        cache.record(CAPACITY as u64, mv, 0, 1, 0);

        assert_eq!(cache.len(), CAPACITY);
        assert!(cache.get(0).is_none(), "oldest entry should have been evicted");
        assert!(cache.get(1).is_some(), "recently touched entry should survive");
    }
}
