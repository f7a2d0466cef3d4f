//! Piece-centric position features.
//!
//! Layout: for each piece kind (pawn, knight, bishop, rook, queen, king) and
//! each color (white, black) one 64-square occupancy plane in a1..h8 order,
//! followed by side to move, the four castling rights and the in-check flag.
//! The learning variant appends the legal move count.

use cozy_chess::{Color, Piece};

use crate::board::Position;
use crate::error::Result;

pub const PLANE_FEATURES: usize = 6 * 2 * 64;
pub const POSITION_FEATURES: usize = PLANE_FEATURES + 6;
pub const POSITION_FEATURES_WITH_MOBILITY: usize = POSITION_FEATURES + 1;

const PIECES: [Piece; 6] = [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];
const COLORS: [Color; 2] = [Color::White, Color::Black];

pub type PositionVector = Vec<f32>;

fn plane_index(piece: usize, color: usize) -> usize {
    (piece * 2 + color) * 64
}

/// Feature vector of length [`POSITION_FEATURES`].
pub fn encode_position(fen: &str) -> Result<PositionVector> {
    let pos = Position::from_fen(fen)?;
    Ok(encode_board(&pos))
}

/// Feature vector of length [`POSITION_FEATURES_WITH_MOBILITY`].
pub fn encode_position_with_mobility(fen: &str) -> Result<PositionVector> {
    let pos = Position::from_fen(fen)?;
    let mut out = encode_board(&pos);
    out.push(pos.legal_moves_count() as f32);
    Ok(out)
}

pub fn encode_board(pos: &Position) -> PositionVector {
    let board = pos.board();
    let mut out = vec![0.0f32; POSITION_FEATURES];
    for (pi, &piece) in PIECES.iter().enumerate() {
        for (ci, &color) in COLORS.iter().enumerate() {
            let base = plane_index(pi, ci);
            for sq in board.colors(color) & board.pieces(piece) {
                out[base + sq as usize] = 1.0;
            }
        }
    }
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let white = board.castle_rights(Color::White);
    let black = board.castle_rights(Color::Black);
    out[PLANE_FEATURES] = flag(board.side_to_move() == Color::White);
    out[PLANE_FEATURES + 1] = flag(white.short.is_some());
    out[PLANE_FEATURES + 2] = flag(white.long.is_some());
    out[PLANE_FEATURES + 3] = flag(black.short.is_some());
    out[PLANE_FEATURES + 4] = flag(black.long.is_some());
    out[PLANE_FEATURES + 5] = flag(pos.is_check());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    #[test]
    fn startpos_layout() {
        let v = encode_position(START_FEN).unwrap();
        assert_eq!(v.len(), POSITION_FEATURES);
        // white pawns on rank 2
        for sq in 8..16 {
            assert_eq!(v[plane_index(0, 0) + sq], 1.0);
        }
        // black pawns on rank 7
        for sq in 48..56 {
            assert_eq!(v[plane_index(0, 1) + sq], 1.0);
        }
        // white king e1, black king e8
        assert_eq!(v[plane_index(5, 0) + 4], 1.0);
        assert_eq!(v[plane_index(5, 1) + 60], 1.0);
        assert_eq!(v[..PLANE_FEATURES].iter().sum::<f32>(), 32.0);
        assert_eq!(&v[PLANE_FEATURES..], &[1.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn mobility_variant_appends_move_count() {
        let v = encode_position_with_mobility(START_FEN).unwrap();
        assert_eq!(v.len(), POSITION_FEATURES_WITH_MOBILITY);
        assert_eq!(v[POSITION_FEATURES], 20.0);
    }

    #[test]
    fn check_flag_and_side() {
        // black king on e8 checked by rook on e1
        let v = encode_position("4k3/8/8/8/8/8/8/K3R3 b - - 0 1").unwrap();
        assert_eq!(v[PLANE_FEATURES], 0.0);
        assert_eq!(v[PLANE_FEATURES + 5], 1.0);
    }

    #[test]
    fn every_feature_is_binary() {
        let v = encode_position("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3").unwrap();
        assert!(v.iter().all(|&x| x == 0.0 || x == 1.0));
    }
}
