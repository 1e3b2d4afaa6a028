//! Search samples published to an externally supplied logging collaborator.
//!
//! The core search never persists anything itself: at the end of each
//! completed iterative-deepening iteration (past a configured minimum
//! depth), it builds a [`Sample`] and hands it to whatever [`SampleSink`]
//! the caller installed. A headless engine can wire this to a training-data
//! writer; a UCI frontend can simply drop it.

/// One observation of a completed search iteration, ready for a logger.
#[derive(Debug, Clone)]
pub struct Sample {
    /// FEN of the position the sample was recorded for.
    pub fen: String,
    /// Score in centipawns, from the side-to-move's point of view.
    pub score_cp: i32,
    /// Search depth completed.
    pub depth: u8,
    /// Source square of the best move.
    pub from: String,
    /// Destination square of the best move.
    pub to: String,
    /// Hex-encoded Zobrist key of the position (display only — lookups use
    /// the raw `u64`).
    pub key_hex: String,
    /// Logical timestamp assigned by the caller.
    pub timestamp: u64,
}

/// Receives [`Sample`]s as the search produces them.
pub trait SampleSink {
    /// Record one sample. Called at most once per completed iteration.
    fn record(&mut self, sample: Sample);
}

/// A [`SampleSink`] that discards every sample — the default when no
/// logging collaborator is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSampleSink;

impl SampleSink for NullSampleSink {
    fn record(&mut self, _sample: Sample) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_without_panicking() {
        let mut sink = NullSampleSink;
        sink.record(Sample {
            fen: "startpos".to_string(),
            score_cp: 25,
            depth: 6,
            from: "e2".to_string(),
            to: "e4".to_string(),
            key_hex: "deadbeef".to_string(),
            timestamp: 1,
        });
    }

    #[test]
    fn collecting_sink_records_in_order() {
        struct CollectingSink(Vec<Sample>);
        impl SampleSink for CollectingSink {
            fn record(&mut self, sample: Sample) {
                self.0.push(sample);
            }
        }

        let mut sink = CollectingSink(Vec::new());
        for depth in 1..=3u8 {
            sink.record(Sample {
                fen: "startpos".to_string(),
                score_cp: depth as i32 * 10,
                depth,
                from: "e2".to_string(),
                to: "e4".to_string(),
                key_hex: "0".to_string(),
                timestamp: depth as u64,
            });
        }
        assert_eq!(sink.0.len(), 3);
        assert_eq!(sink.0[2].depth, 3);
    }
}
