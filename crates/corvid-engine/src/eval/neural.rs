//! Feed-forward neural evaluator.
//!
//! The network has exactly one hidden layer over a 385-dimensional feature
//! vector: 6 piece-kind channels x 64 squares (+1 for a White occupant, -1
//! for a Black occupant) plus a 385th feature for the side to move (+1
//! White, -1 Black). `h = ReLU(W0*x + b0)`, `y = W1*h + b1`, centipawns =
//! `y * scale_cp`.
//!
//! Weights are loaded from a JSON document at runtime. A shape mismatch or
//! I/O failure is reported as [`WeightLoadError`] but never escapes
//! [`NeuralEvaluator::load`] — the evaluator transparently falls back to
//! [`ClassicalEvaluator`] and logs the failure.

use std::path::Path;

use corvid_core::{Board, Color, PieceKind};
use serde::Deserialize;
use thiserror::Error;

use crate::eval::{ClassicalEvaluator, Evaluator};

/// Dimension of the input feature vector: 6 piece kinds x 64 squares + 1 side-to-move bit.
pub const NUM_FEATURES: usize = 385;

/// Errors loading or validating a [`NeuralWeights`] file.
#[derive(Debug, Error)]
pub enum WeightLoadError {
    /// The weight file could not be read from disk.
    #[error("failed to read weight file: {0}")]
    Io(#[from] std::io::Error),
    /// The weight file was not valid JSON in the expected shape.
    #[error("failed to parse weight file: {0}")]
    Parse(#[from] serde_json::Error),
    /// `L0.W` did not have exactly [`NUM_FEATURES`] columns, or `L1.W` did not
    /// have exactly one row with `H` columns matching `L0`'s row count.
    #[error("weight shape mismatch: {0}")]
    Shape(String),
}

/// Which player's perspective the network's raw output is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pov {
    /// Output is positive when it favors whoever is to move.
    Sidemove,
    /// Output is already from White's point of view.
    White,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    #[serde(rename = "W")]
    w: Vec<Vec<f32>>,
    b: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct RawWeights {
    layers: [RawLayer; 2],
    #[serde(default = "default_scale")]
    scale_cp: f32,
    model_pov: Pov,
}

fn default_scale() -> f32 {
    1000.0
}

/// A validated, loaded set of network weights.
#[derive(Debug, Clone)]
pub struct NeuralWeights {
    /// `hidden x NUM_FEATURES` row-major weight matrix.
    w0: Vec<Vec<f32>>,
    b0: Vec<f32>,
    /// `1 x hidden` output weight row.
    w1: Vec<f32>,
    b1: f32,
    scale_cp: f32,
    model_pov: Pov,
}

impl NeuralWeights {
    /// Parse and shape-check a weight document already read into memory.
    pub fn from_json(data: &str) -> Result<NeuralWeights, WeightLoadError> {
        let raw: RawWeights = serde_json::from_str(data)?;
        let [l0, l1] = raw.layers;

        let hidden = l0.w.len();
        if hidden == 0 {
            return Err(WeightLoadError::Shape("L0.W has zero rows".to_string()));
        }
        for (i, row) in l0.w.iter().enumerate() {
            if row.len() != NUM_FEATURES {
                return Err(WeightLoadError::Shape(format!(
                    "L0.W row {i} has {} columns, expected {NUM_FEATURES}",
                    row.len()
                )));
            }
        }
        if l0.b.len() != hidden {
            return Err(WeightLoadError::Shape(format!(
                "L0.b has {} entries, expected {hidden}",
                l0.b.len()
            )));
        }
        if l1.w.len() != 1 {
            return Err(WeightLoadError::Shape(format!(
                "L1.W has {} rows, expected 1",
                l1.w.len()
            )));
        }
        if l1.w[0].len() != hidden {
            return Err(WeightLoadError::Shape(format!(
                "L1.W has {} columns, expected {hidden}",
                l1.w[0].len()
            )));
        }
        if l1.b.len() != 1 {
            return Err(WeightLoadError::Shape(format!(
                "L1.b has {} entries, expected 1",
                l1.b.len()
            )));
        }

        Ok(NeuralWeights {
            w0: l0.w,
            b0: l0.b,
            w1: l1.w[0].clone(),
            b1: l1.b[0],
            scale_cp: raw.scale_cp,
            model_pov: raw.model_pov,
        })
    }

    /// Load and validate a weight file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<NeuralWeights, WeightLoadError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Run the forward pass: `y = W1 . ReLU(W0.x + b0) + b1`, scaled to centipawns.
    fn forward(&self, features: &[f32; NUM_FEATURES]) -> f32 {
        let mut y = self.b1;
        for (row, (w0_row, &b0)) in self.w0.iter().zip(&self.b0).enumerate() {
            let mut h = b0;
            for (&w, &x) in w0_row.iter().zip(features.iter()) {
                h += w * x;
            }
            let h = h.max(0.0);
            y += self.w1[row] * h;
        }
        y * self.scale_cp
    }
}

/// Build the 385-dimensional feature vector for `board`.
fn build_features(board: &Board) -> [f32; NUM_FEATURES] {
    let mut features = [0.0f32; NUM_FEATURES];

    for kind in PieceKind::ALL {
        for &color in &Color::ALL {
            let value = match color {
                Color::White => 1.0,
                Color::Black => -1.0,
            };
            for sq in board.pieces(kind) & board.side(color) {
                features[kind.index() * 64 + sq.index()] = value;
            }
        }
    }

    features[NUM_FEATURES - 1] = match board.side_to_move() {
        Color::White => 1.0,
        Color::Black => -1.0,
    };

    features
}

/// Neural-network evaluator with transparent fallback to [`ClassicalEvaluator`].
///
/// Constructed via [`NeuralEvaluator::load`], which always succeeds: a
/// missing or malformed weight file logs a warning and falls back silently,
/// matching the spec's "weights fail to load -> classical" contract.
pub struct NeuralEvaluator {
    weights: Option<NeuralWeights>,
}

impl NeuralEvaluator {
    /// Load weights from `path`, falling back to the classical evaluator on failure.
    pub fn load(path: impl AsRef<Path>) -> NeuralEvaluator {
        match NeuralWeights::load(&path) {
            Ok(weights) => NeuralEvaluator { weights: Some(weights) },
            Err(err) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %err,
                    "failed to load neural weights, falling back to classical evaluator"
                );
                NeuralEvaluator { weights: None }
            }
        }
    }

    /// Build a neural evaluator directly from already-validated weights.
    pub fn with_weights(weights: NeuralWeights) -> NeuralEvaluator {
        NeuralEvaluator { weights: Some(weights) }
    }

    /// Build an evaluator with no weights loaded (always falls back).
    pub fn fallback() -> NeuralEvaluator {
        NeuralEvaluator { weights: None }
    }
}

impl Evaluator for NeuralEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let Some(weights) = &self.weights else {
            return ClassicalEvaluator::evaluate(board);
        };

        let features = build_features(board);
        let raw = weights.forward(&features);

        let white_pov = match weights.model_pov {
            Pov::White => raw,
            Pov::Sidemove => match board.side_to_move() {
                Color::White => raw,
                Color::Black => -raw,
            },
        };

        white_pov.round() as i32
    }
}

#[cfg(test)]
mod tests {
    use corvid_core::Board;

    use super::*;

    fn tiny_weights_json(model_pov: &str) -> String {
        let row = vec![0.01f32; NUM_FEATURES];
        format!(
            r#"{{"layers":[{{"W":[{:?}],"b":[0.0]}},{{"W":[[1.0]],"b":[0.0]}}],"scale_cp":1000,"model_pov":"{model_pov}"}}"#,
            row
        )
    }

    #[test]
    fn malformed_json_falls_back_to_classical() {
        let evaluator = NeuralEvaluator::fallback();
        let board = Board::starting_position();
        assert_eq!(evaluator.evaluate(&board), ClassicalEvaluator::evaluate(&board));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let bad = r#"{"layers":[{"W":[[1.0,2.0]],"b":[0.0]},{"W":[[1.0]],"b":[0.0]}],"model_pov":"white"}"#;
        assert!(matches!(
            NeuralWeights::from_json(bad),
            Err(WeightLoadError::Shape(_))
        ));
    }

    #[test]
    fn valid_weights_produce_finite_score() {
        let weights = NeuralWeights::from_json(&tiny_weights_json("white")).unwrap();
        let evaluator = NeuralEvaluator::with_weights(weights);
        let board = Board::starting_position();
        let score = evaluator.evaluate(&board);
        assert!(score.abs() < 100_000);
    }

    #[test]
    fn sidemove_pov_flips_sign_for_black() {
        let weights = NeuralWeights::from_json(&tiny_weights_json("sidemove")).unwrap();
        let evaluator = NeuralEvaluator::with_weights(weights);

        let white_to_move = Board::starting_position();
        let black_to_move: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1"
            .parse()
            .unwrap();

        let w = evaluator.evaluate(&white_to_move);
        let b = evaluator.evaluate(&black_to_move);
        assert_eq!(w, -b);
    }
}
