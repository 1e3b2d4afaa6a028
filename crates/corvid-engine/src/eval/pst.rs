//! Piece-square tables (PST) for all six piece types.
//!
//! All tables are defined from White's perspective in LERF order:
//! index 0 = A1, index 7 = H1, index 8 = A2, ..., index 63 = H8.
//! Use [`pst_value`] to look up the value for either color.
//!
//! The classical evaluator has no midgame/endgame taper, so each square
//! carries a single fixed bonus rather than a pair — `flat` below just
//! mirrors [`Score::flat`] for readability in the table literals.

use corvid_core::{Color, PieceKind, Square};

use crate::eval::score::Score;

const fn flat(v: i16) -> Score {
    Score::flat(v)
}

// ---------------------------------------------------------------------------
// Individual piece-square tables
// ---------------------------------------------------------------------------

/// Pawn PST. Rank 1 and rank 8 entries are 0 — pawns never sit there.
#[rustfmt::skip]
const PAWN_PST: [Score; 64] = [
    // Rank 1 (indices 0-7) — never used
    flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(0),
    // Rank 2 (indices 8-15)
    flat(5),   flat(10),  flat(10),  flat(-20), flat(-20), flat(10),  flat(10),  flat(5),
    // Rank 3 (indices 16-23)
    flat(5),   flat(-5),  flat(-10), flat(0),   flat(0),   flat(-10), flat(-5),  flat(5),
    // Rank 4 (indices 24-31)
    flat(0),   flat(0),   flat(0),   flat(20),  flat(20),  flat(0),   flat(0),   flat(0),
    // Rank 5 (indices 32-39)
    flat(5),   flat(5),   flat(10),  flat(25),  flat(25),  flat(10),  flat(5),   flat(5),
    // Rank 6 (indices 40-47)
    flat(10),  flat(10),  flat(20),  flat(30),  flat(30),  flat(20),  flat(10),  flat(10),
    // Rank 7 (indices 48-55)
    flat(100), flat(100), flat(100), flat(100), flat(100), flat(100), flat(100), flat(100),
    // Rank 8 (indices 56-63) — never used
    flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(0),
];

#[rustfmt::skip]
const KNIGHT_PST: [Score; 64] = [
    flat(-50), flat(-40), flat(-30), flat(-30), flat(-30), flat(-30), flat(-40), flat(-50),
    flat(-40), flat(-20), flat(0),   flat(5),   flat(5),   flat(0),   flat(-20), flat(-40),
    flat(-30), flat(5),   flat(10),  flat(15),  flat(15),  flat(10),  flat(5),   flat(-30),
    flat(-30), flat(0),   flat(15),  flat(20),  flat(20),  flat(15),  flat(0),   flat(-30),
    flat(-30), flat(5),   flat(15),  flat(20),  flat(20),  flat(15),  flat(5),   flat(-30),
    flat(-30), flat(0),   flat(10),  flat(15),  flat(15),  flat(10),  flat(0),   flat(-30),
    flat(-40), flat(-20), flat(0),   flat(0),   flat(0),   flat(0),   flat(-20), flat(-40),
    flat(-50), flat(-40), flat(-30), flat(-30), flat(-30), flat(-30), flat(-40), flat(-50),
];

#[rustfmt::skip]
const BISHOP_PST: [Score; 64] = [
    flat(-20), flat(-10), flat(-10), flat(-10), flat(-10), flat(-10), flat(-10), flat(-20),
    flat(-10), flat(5),   flat(0),   flat(0),   flat(0),   flat(0),   flat(5),   flat(-10),
    flat(-10), flat(5),   flat(5),   flat(5),   flat(5),   flat(5),   flat(5),   flat(-10),
    flat(-10), flat(5),   flat(5),   flat(10),  flat(10),  flat(5),   flat(5),   flat(-10),
    flat(-10), flat(0),   flat(5),   flat(10),  flat(10),  flat(5),   flat(0),   flat(-10),
    flat(-10), flat(10),  flat(0),   flat(5),   flat(5),   flat(0),   flat(10),  flat(-10),
    flat(-10), flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(0),   flat(-10),
    flat(-20), flat(-10), flat(-10), flat(-10), flat(-10), flat(-10), flat(-10), flat(-20),
];

#[rustfmt::skip]
const ROOK_PST: [Score; 64] = [
    flat(0),  flat(0), flat(0), flat(5), flat(5), flat(0), flat(0), flat(0),
    flat(-5), flat(0), flat(0), flat(0), flat(0), flat(0), flat(0), flat(-5),
    flat(-5), flat(0), flat(0), flat(0), flat(0), flat(0), flat(0), flat(-5),
    flat(-5), flat(0), flat(0), flat(0), flat(0), flat(0), flat(0), flat(-5),
    flat(-5), flat(0), flat(0), flat(0), flat(0), flat(0), flat(0), flat(-5),
    flat(-5), flat(0), flat(0), flat(0), flat(0), flat(0), flat(0), flat(-5),
    flat(5),  flat(10),flat(10),flat(10),flat(10),flat(10),flat(10),flat(5),
    flat(0),  flat(5), flat(5), flat(5), flat(5), flat(5), flat(5), flat(0),
];

#[rustfmt::skip]
const QUEEN_PST: [Score; 64] = [
    flat(-20), flat(-10), flat(-10), flat(-5), flat(-5), flat(-10), flat(-10), flat(-20),
    flat(-10), flat(0),   flat(5),   flat(0),  flat(0),  flat(5),   flat(0),   flat(-10),
    flat(-10), flat(5),   flat(5),   flat(5),  flat(5),  flat(5),   flat(5),   flat(-10),
    flat(0),   flat(0),   flat(5),   flat(5),  flat(5),  flat(5),   flat(0),   flat(0),
    flat(-5),  flat(0),   flat(5),   flat(5),  flat(5),  flat(5),   flat(0),   flat(-5),
    flat(-10), flat(0),   flat(5),   flat(5),  flat(5),  flat(5),   flat(0),   flat(-10),
    flat(-10), flat(0),   flat(0),   flat(0),  flat(0),  flat(0),   flat(0),   flat(-10),
    flat(-20), flat(-10), flat(-10), flat(-5), flat(-5), flat(-10), flat(-10), flat(-20),
];

/// King PST. Rewards castled corners over the open center — the classical
/// evaluator has no separate endgame king table.
#[rustfmt::skip]
const KING_PST: [Score; 64] = [
    flat(20),  flat(30),  flat(10),  flat(0),   flat(0),   flat(10),  flat(30),  flat(20),
    flat(20),  flat(20),  flat(0),   flat(0),   flat(0),   flat(0),   flat(20),  flat(20),
    flat(-10), flat(-20), flat(-20), flat(-20), flat(-20), flat(-20), flat(-20), flat(-10),
    flat(-20), flat(-30), flat(-30), flat(-40), flat(-40), flat(-30), flat(-30), flat(-20),
    flat(-30), flat(-40), flat(-40), flat(-50), flat(-50), flat(-40), flat(-40), flat(-30),
    flat(-30), flat(-40), flat(-40), flat(-50), flat(-50), flat(-40), flat(-40), flat(-30),
    flat(-30), flat(-40), flat(-40), flat(-50), flat(-50), flat(-40), flat(-40), flat(-30),
    flat(-30), flat(-40), flat(-40), flat(-50), flat(-50), flat(-40), flat(-40), flat(-30),
];

// ---------------------------------------------------------------------------
// Master table
// ---------------------------------------------------------------------------

/// Piece-square table values indexed `[piece_kind][square]`.
///
/// Defined from White's perspective in LERF order (A1 = index 0).
/// Use [`pst_value`] rather than indexing this directly, so that color
/// mirroring is handled correctly.
pub static PST: [[Score; 64]; PieceKind::COUNT] = [
    PAWN_PST,
    KNIGHT_PST,
    BISHOP_PST,
    ROOK_PST,
    QUEEN_PST,
    KING_PST,
];

// ---------------------------------------------------------------------------
// Lookup helper
// ---------------------------------------------------------------------------

/// Look up the PST bonus for a piece of the given kind and color on `sq`.
///
/// For Black pieces the square is mirrored vertically (`sq ^ 56`) so that the
/// tables, which are defined from White's perspective, apply symmetrically.
#[inline]
pub fn pst_value(kind: PieceKind, color: Color, sq: Square) -> Score {
    let idx = match color {
        Color::White => sq.index(),
        Color::Black => sq.index() ^ 56,
    };
    PST[kind.index()][idx]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use corvid_core::{Color, PieceKind, Square};

    use super::pst_value;

    /// E4 for White is rank 4 (index 3 from rank 1), file E (index 4).
    /// LERF index = 3*8 + 4 = 28.
    #[test]
    fn pawn_white_e4() {
        let score = pst_value(PieceKind::Pawn, Color::White, Square::E4);
        assert_eq!(score.value(), 20);
    }

    /// E5 for Black mirrors to rank 4 for White: index 36 ^ 56 = 28 (= E4).
    #[test]
    fn pawn_black_e5_mirrors_white_e4() {
        let white_e4 = pst_value(PieceKind::Pawn, Color::White, Square::E4);
        let black_e5 = pst_value(PieceKind::Pawn, Color::Black, Square::E5);
        assert_eq!(white_e4, black_e5);
    }

    /// Knight table is symmetric: A1 and H1 should have the same value.
    #[test]
    fn knight_a1_h1_symmetric() {
        let a1 = pst_value(PieceKind::Knight, Color::White, Square::A1);
        let h1 = pst_value(PieceKind::Knight, Color::White, Square::H1);
        assert_eq!(a1, h1);
    }

    /// Bishop table is symmetric: A1 and H1 should have the same value.
    #[test]
    fn bishop_a1_h1_symmetric() {
        let a1 = pst_value(PieceKind::Bishop, Color::White, Square::A1);
        let h1 = pst_value(PieceKind::Bishop, Color::White, Square::H1);
        assert_eq!(a1, h1);
    }

    /// Black mirroring: pst_value for Black on rank 1 should equal White on rank 8.
    #[test]
    fn black_rank1_mirrors_white_rank8() {
        // A1 for Black: index 0 ^ 56 = 56 = A8 for White.
        let black_a1 = pst_value(PieceKind::King, Color::Black, Square::A1);
        let white_a8 = pst_value(PieceKind::King, Color::White, Square::A8);
        assert_eq!(black_a1, white_a8);
    }
}
