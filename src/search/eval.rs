use cozy_chess::{BitBoard, Board, Color, Piece, Square};

const PAWN: i32 = 100;
const KNIGHT: i32 = 300;
const BISHOP: i32 = 300;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

/// Flat bonus per piece standing on d4, e4, d5 or e5.
pub const CENTER_BONUS_CP: i32 = 10;

fn center() -> BitBoard {
    [Square::D4, Square::E4, Square::D5, Square::E5].into_iter().fold(BitBoard::EMPTY, |bb, sq| bb | sq.bitboard())
}

fn count_piece(board: &Board, color: Color, piece: Piece) -> i32 {
    let bb = board.colors(color) & board.pieces(piece);
    bb.len() as i32
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> i32 {
    let w = Color::White;
    let b = Color::Black;
    (count_piece(board, w, Piece::Pawn) - count_piece(board, b, Piece::Pawn)) * PAWN
        + (count_piece(board, w, Piece::Knight) - count_piece(board, b, Piece::Knight)) * KNIGHT
        + (count_piece(board, w, Piece::Bishop) - count_piece(board, b, Piece::Bishop)) * BISHOP
        + (count_piece(board, w, Piece::Rook) - count_piece(board, b, Piece::Rook)) * ROOK
        + (count_piece(board, w, Piece::Queen) - count_piece(board, b, Piece::Queen)) * QUEEN
}

// Material from side-to-move perspective (negamax-friendly)
pub fn material_eval_cp(board: &Board) -> i32 {
    let base = material_eval_cp_side_agnostic(board);
    if board.side_to_move() == Color::White { base } else { -base }
}

/// Center occupancy of the side to move minus that of the opponent.
pub fn center_eval_cp(board: &Board) -> i32 {
    let us = board.side_to_move();
    let mine = (board.colors(us) & center()).len() as i32;
    let theirs = (board.colors(!us) & center()).len() as i32;
    (mine - theirs) * CENTER_BONUS_CP
}

/// Static evaluation from the side to move: material plus center control.
pub fn static_eval_cp(board: &Board) -> i32 {
    material_eval_cp(board) + center_eval_cp(board)
}
