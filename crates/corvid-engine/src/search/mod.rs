//! Search algorithms and move ordering.

pub mod control;
pub mod heuristics;
pub mod hint_cache;
pub mod negamax;
pub mod ordering;
pub mod sample;
pub mod tt;

use std::cell::RefCell;

use corvid_core::{Board, Move, generate_legal_moves};

use crate::eval::{ClassicalEvaluator, Evaluator};
use control::SearchControl;
use hint_cache::HintCache;
use negamax::{INF, SearchContext, aspiration_search};
use sample::{NullSampleSink, Sample, SampleSink};
use tt::{Bound, TranspositionTable};

/// Minimum completed-iteration depth at which a sample is published to the
/// configured [`SampleSink`]. Shallow iterations are too noisy to be worth
/// logging for downstream training/analysis consumers.
const MIN_LOGGED_DEPTH: u8 = 6;

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found at the highest completed depth.
    pub best_move: Move,
    /// Second move in the PV — the expected reply (for pondering).
    pub ponder_move: Option<Move>,
    /// Full principal variation line.
    pub pv: Vec<Move>,
    /// Evaluation score in centipawns from the engine's perspective.
    pub score: i32,
    /// Total nodes visited during the search.
    pub nodes: u64,
    /// Depth reached.
    pub depth: u8,
}

/// Iterative-deepening searcher with transposition table.
pub struct Searcher {
    tt: TranspositionTable,
    /// Cross-search move-ordering hints, keyed by position. Survives across
    /// calls to `search` (e.g. from one move of a game to the next), unlike
    /// the transposition table which is only ever seeded, never cleared, by
    /// this cache.
    hint_cache: RefCell<HintCache>,
}

impl Searcher {
    /// Create a fresh searcher with a 16 MB transposition table.
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::new(16),
            hint_cache: RefCell::new(HintCache::new()),
        }
    }

    /// Clear the transposition table (preserving the allocation).
    pub fn clear_tt(&self) {
        self.tt.clear();
    }

    /// Resize the transposition table to the given size in megabytes.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// Run iterative-deepening search up to `max_depth` with the classical
    /// evaluator.
    ///
    /// Calls `on_iter(depth, score, nodes, pv)` after each completed
    /// iteration, allowing the caller to emit UCI `info` lines. Samples are
    /// discarded (equivalent to `search_with_sink` with a [`NullSampleSink`]).
    pub fn search<F>(
        &self,
        board: &Board,
        max_depth: u8,
        control: &SearchControl,
        on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(u8, i32, u64, &[Move]),
    {
        self.search_with_sink(board, max_depth, control, on_iter, &mut NullSampleSink)
    }

    /// Run iterative-deepening search with the classical evaluator,
    /// additionally publishing a [`Sample`] to `sink` after each completed
    /// iteration at depth >= [`MIN_LOGGED_DEPTH`].
    pub fn search_with_sink<F, S>(
        &self,
        board: &Board,
        max_depth: u8,
        control: &SearchControl,
        on_iter: F,
        sink: &mut S,
    ) -> SearchResult
    where
        F: FnMut(u8, i32, u64, &[Move]),
        S: SampleSink,
    {
        self.search_with_evaluator(board, max_depth, control, &ClassicalEvaluator, on_iter, sink)
    }

    /// Run iterative-deepening search against a caller-chosen [`Evaluator`]
    /// (e.g. a [`crate::eval::NeuralEvaluator`] instead of the default
    /// [`ClassicalEvaluator`]), publishing a [`Sample`] to `sink` after each
    /// completed iteration at depth >= [`MIN_LOGGED_DEPTH`].
    ///
    /// Before the first iteration, the position-hint cache is consulted: a
    /// recorded best move for this exact position (from a prior call to
    /// `search`) is seeded into the transposition table as a move-ordering
    /// hint, so the very first iteration already orders its best guess
    /// first even though the table itself starts cold for this position.
    /// After the search completes, the result is recorded back into the
    /// hint cache for the next call.
    pub fn search_with_evaluator<F, S>(
        &self,
        board: &Board,
        max_depth: u8,
        control: &SearchControl,
        eval: &dyn Evaluator,
        mut on_iter: F,
        sink: &mut S,
    ) -> SearchResult
    where
        F: FnMut(u8, i32, u64, &[Move]),
        S: SampleSink,
    {
        self.tt.new_generation();

        if let Some(hint) = self.hint_cache.borrow().get(board.hash()) {
            self.tt.store(board.hash(), 0, 0, 0, hint.best_move, Bound::None, 0, false);
        }

        let mut ctx = SearchContext::new(&self.tt, control, eval);

        // Track completed iteration results (for abort-safety)
        let mut completed_move = Move::NULL;
        let mut completed_score = -INF;
        let mut completed_depth: u8 = 0;
        let mut completed_pv: Vec<Move> = Vec::new();
        let mut prev_score: i32 = 0;

        for depth in 1..=max_depth {
            // Check soft limit before starting a new iteration
            if control.should_stop_iterating() {
                break;
            }

            let score = aspiration_search(board, depth, prev_score, &mut ctx);

            // If search was aborted mid-iteration, discard this iteration's result
            if control.should_stop(ctx.nodes) {
                break;
            }

            prev_score = score;

            // This iteration completed successfully — record results
            let pv = ctx.pv.root_pv();
            if !pv.is_empty() && !pv[0].is_null() {
                completed_move = pv[0];
            }
            completed_score = score;
            completed_depth = depth;
            completed_pv = pv.iter().copied().filter(|m| !m.is_null()).collect();

            debug_assert!(
                !completed_move.is_null() || generate_legal_moves(board).is_empty(),
                "negamax returned without setting root_best_move at depth {depth}"
            );

            on_iter(depth, score, ctx.nodes, &completed_pv);

            if depth >= MIN_LOGGED_DEPTH && !completed_move.is_null() {
                sink.record(Sample {
                    fen: board.to_string(),
                    score_cp: score,
                    depth,
                    from: completed_move.source().to_string(),
                    to: completed_move.dest().to_string(),
                    key_hex: format!("{:016x}", board.hash()),
                    timestamp: depth as u64,
                });
            }
        }

        if !completed_move.is_null() {
            self.hint_cache.borrow_mut().record(
                board.hash(),
                completed_move,
                completed_score,
                completed_depth,
                0,
            );
        }

        let ponder_move = if completed_pv.len() > 1 {
            Some(completed_pv[1])
        } else {
            None
        };

        SearchResult {
            best_move: completed_move,
            ponder_move,
            pv: if completed_pv.is_empty() { vec![completed_move] } else { completed_pv },
            score: completed_score,
            nodes: ctx.nodes,
            depth: completed_depth,
        }
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
