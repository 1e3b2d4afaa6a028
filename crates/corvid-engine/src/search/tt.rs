//! Transposition table: fixed-capacity, direct-mapped, depth-preferred replacement.
//!
//! The engine is single-threaded, so the table is a plain (non-atomic)
//! array indexed into by the low bits of the Zobrist key — no locking, no
//! torn-write detection, no generation bookkeeping. If multi-threaded search
//! is ever added, per-entry locking or a lock-free scheme would need to be
//! introduced at that point.

use std::cell::RefCell;

use corvid_core::Move;

/// Bound type stored in a TT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// No bound information (empty entry, or a depth-insufficient hint-only probe).
    None,
    /// The stored score is exact (PV node).
    Exact,
    /// The stored score is a lower bound (failed high / beta cutoff).
    LowerBound,
    /// The stored score is an upper bound (failed low / all-node).
    UpperBound,
}

/// Scores above this threshold indicate a forced mate.
const MATE_THRESHOLD: i32 = 28_000;

/// Result of a TT probe.
///
/// When the stored depth was insufficient for the requested depth, `bound`
/// is [`Bound::None`] and only `best_move` is meaningful — callers must use
/// it purely as a move-ordering hint, never as a cutoff or static eval.
#[derive(Debug, Clone)]
pub struct TtProbeResult {
    /// Best move from a previous search of this position.
    pub best_move: Move,
    /// Search depth of the stored entry.
    pub depth: u8,
    /// Bound type (exact, lower, upper, or none if depth-insufficient).
    pub bound: Bound,
    /// Score (already adjusted from TT-relative back to root-relative). Only
    /// meaningful when `bound != Bound::None`.
    pub score: i32,
    /// Static evaluation stored alongside the score.
    pub eval: i32,
    /// Whether this entry was written from a PV node.
    pub is_pv: bool,
}

/// Convert a search score to TT-storable form.
///
/// Mate scores are path-dependent: `MATE_SCORE - ply` changes based on the
/// search path. Store them as distance-from-node instead of
/// distance-from-root so they're path-independent.
pub fn score_to_tt(score: i32, ply: u8) -> i16 {
    let adjusted = if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    };
    adjusted as i16
}

/// Convert a TT-stored score back to search-usable form.
pub fn score_from_tt(score: i16, ply: u8) -> i32 {
    let score = score as i32;
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Index a key into a `mask + 1`-sized table.
///
/// XORs the high and low halves of the key together before masking so the
/// table index draws on entropy from the whole 64-bit key, not just its low
/// bits (which Zobrist keys don't otherwise guarantee are well-mixed).
#[inline]
fn mix_index(hash: u64, mask: u64) -> usize {
    ((hash ^ (hash >> 32)) & mask) as usize
}

#[derive(Clone, Copy)]
struct Entry {
    key: u64,
    best_move: Move,
    depth: u8,
    bound: Bound,
    score: i16,
    eval: i16,
    is_pv: bool,
}

/// Fixed-capacity, direct-mapped transposition table.
///
/// Wrapped in a [`RefCell`] so probe/store can take `&self` — the search
/// tree is walked by a single thread and never re-enters a probe or store
/// while another is in progress, so the dynamic borrow check never trips.
pub struct TranspositionTable {
    entries: RefCell<Vec<Option<Entry>>>,
    mask: u64,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    ///
    /// The actual number of entries is rounded down to the nearest power of two.
    pub fn new(mb: usize) -> Self {
        let bytes = mb * 1024 * 1024;
        let entry_size = std::mem::size_of::<Entry>();
        let num_entries = (bytes / entry_size).next_power_of_two() >> 1;
        let num_entries = num_entries.max(1);

        Self {
            entries: RefCell::new(vec![None; num_entries]),
            mask: (num_entries - 1) as u64,
        }
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().fill(None);
    }

    /// No-op kept for call-site compatibility with the root driver, which
    /// calls this once per search. Replacement is purely depth-preferred, so
    /// there is no generation counter to advance.
    pub fn new_generation(&self) {}

    /// Probe the table for a position at the given requested depth.
    ///
    /// Returns `Some` with a full entry (bound/score/eval populated) iff the
    /// stored key matches and the stored depth is at least `requested_depth`.
    /// If the key matches but the stored depth is insufficient, returns an
    /// entry with `bound == Bound::None` carrying only the best-move hint. A
    /// miss returns `None`.
    pub fn probe(&self, hash: u64, requested_depth: u8, ply: u8) -> Option<TtProbeResult> {
        let index = mix_index(hash, self.mask);
        let entries = self.entries.borrow();
        let entry = entries[index].as_ref()?;
        if entry.key != hash {
            return None;
        }

        if entry.depth >= requested_depth {
            Some(TtProbeResult {
                best_move: entry.best_move,
                depth: entry.depth,
                bound: entry.bound,
                score: score_from_tt(entry.score, ply),
                eval: entry.eval as i32,
                is_pv: entry.is_pv,
            })
        } else {
            Some(TtProbeResult {
                best_move: entry.best_move,
                depth: entry.depth,
                bound: Bound::None,
                score: 0,
                eval: 0,
                is_pv: entry.is_pv,
            })
        }
    }

    /// Store a position in the table.
    ///
    /// Depth-preferred replacement: a slot is overwritten when it is empty,
    /// holds a different key, or the incoming depth is at least the stored
    /// depth. A same-key, shallower-depth store is otherwise dropped so a
    /// rarer deep search result isn't evicted by a cheap shallow one.
    pub fn store(
        &self,
        hash: u64,
        depth: u8,
        score: i32,
        eval: i32,
        best_move: Move,
        bound: Bound,
        ply: u8,
        is_pv: bool,
    ) {
        let index = mix_index(hash, self.mask);
        let mut entries = self.entries.borrow_mut();
        let replace = match &entries[index] {
            None => true,
            Some(existing) => existing.key != hash || depth >= existing.depth,
        };
        if !replace {
            return;
        }

        entries[index] = Some(Entry {
            key: hash,
            best_move,
            depth,
            bound,
            score: score_to_tt(score, ply),
            eval: eval as i16,
            is_pv,
        });
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.entries.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_core::{Move, Square};

    #[test]
    fn store_and_probe_roundtrip() {
        let tt = TranspositionTable::new(1);
        let hash: u64 = 0xDEAD_BEEF_1234_5678;
        let mv = Move::new(Square::E2, Square::E4);

        tt.store(hash, 5, 100, 50, mv, Bound::Exact, 0, false);

        let result = tt.probe(hash, 5, 0).expect("should find stored entry");
        assert_eq!(result.best_move, mv);
        assert_eq!(result.depth, 5);
        assert_eq!(result.bound, Bound::Exact);
        assert_eq!(result.score, 100);
        assert_eq!(result.eval, 50);
    }

    #[test]
    fn probe_miss_returns_none() {
        let tt = TranspositionTable::new(1);
        assert!(tt.probe(0x1234_5678_9ABC_DEF0, 0, 0).is_none());
    }

    #[test]
    fn insufficient_depth_returns_hint_only() {
        let tt = TranspositionTable::new(1);
        let hash: u64 = 0xAAAA_BBBB_CCCC_DDDD;
        let mv = Move::new(Square::D2, Square::D4);

        tt.store(hash, 3, 100, 50, mv, Bound::Exact, 0, false);

        let result = tt.probe(hash, 5, 0).expect("key matches");
        assert_eq!(result.bound, Bound::None);
        assert_eq!(result.best_move, mv);
    }

    #[test]
    fn mate_score_adjustment_roundtrip() {
        let mate_score = 29_000 - 3;
        let ply: u8 = 5;
        let tt_score = score_to_tt(mate_score, ply);
        let restored = score_from_tt(tt_score, ply);
        assert_eq!(restored, mate_score);
    }

    #[test]
    fn negative_mate_score_adjustment_roundtrip() {
        let mated_score = -(29_000 - 3);
        let ply: u8 = 7;
        let tt_score = score_to_tt(mated_score, ply);
        let restored = score_from_tt(tt_score, ply);
        assert_eq!(restored, mated_score);
    }

    #[test]
    fn normal_score_not_adjusted() {
        let score = 150;
        let ply: u8 = 10;
        let tt_score = score_to_tt(score, ply);
        let restored = score_from_tt(tt_score, ply);
        assert_eq!(restored, score);
    }

    #[test]
    fn depth_preferred_replacement() {
        let tt = TranspositionTable::new(1);
        let hash: u64 = 0x1111_2222_3333_4444;
        let mv1 = Move::new(Square::E2, Square::E4);
        let mv2 = Move::new(Square::D2, Square::D4);

        tt.store(hash, 5, 100, 50, mv1, Bound::LowerBound, 0, false);
        // Shallower same-key store is dropped.
        tt.store(hash, 3, 200, 60, mv2, Bound::LowerBound, 0, false);

        let result = tt.probe(hash, 5, 0).unwrap();
        assert_eq!(result.best_move, mv1);
    }

    #[test]
    fn deeper_store_replaces() {
        let tt = TranspositionTable::new(1);
        let hash: u64 = 0x5555_6666_7777_8888;
        let mv1 = Move::new(Square::E2, Square::E4);
        let mv2 = Move::new(Square::D2, Square::D4);

        tt.store(hash, 3, 100, 50, mv1, Bound::LowerBound, 0, false);
        tt.store(hash, 6, 200, 60, mv2, Bound::Exact, 0, false);

        let result = tt.probe(hash, 6, 0).unwrap();
        assert_eq!(result.best_move, mv2);
        assert_eq!(result.depth, 6);
    }

    #[test]
    fn mix_index_folds_high_bits_into_low_bits() {
        // Two keys that share every low bit but differ only in the high
        // half must land in different slots once the high half is folded
        // in — a plain `hash & mask` would collide them every time.
        let mask = 0xFFFF;
        let low = 0x0000_0000_0000_ABCDu64;
        let high = 0x1234_5678_0000_ABCDu64;
        assert_ne!(mix_index(low, mask), mix_index(high, mask));
    }

    #[test]
    fn clear_removes_all_entries() {
        let tt = TranspositionTable::new(1);
        let hash: u64 = 0xAAAA_BBBB_CCCC_DDDD;
        let mv = Move::new(Square::E2, Square::E4);

        tt.store(hash, 5, 100, 50, mv, Bound::Exact, 0, false);
        assert!(tt.probe(hash, 5, 0).is_some());

        tt.clear();
        assert!(tt.probe(hash, 0, 0).is_none());
    }
}
