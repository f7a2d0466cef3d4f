use cozy_chess::{Board as CozyBoard, Color, File, GameStatus, Move, Piece, Square};

use crate::error::{Error, Result};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Placement, side to move, castling and en passant fields of a FEN string.
/// Two FENs that differ only in their move counters share an identity.
pub fn position_identity(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen.trim(), false)
            .map(|b| Self { board: b })
            .map_err(|e| Error::invalid_position(fen, format!("{e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    /// Half-moves played since the initial position, derived from the fullmove counter.
    pub fn ply(&self) -> usize {
        let full = self.board.fullmove_number().max(1) as usize;
        (full - 1) * 2 + usize::from(self.board.side_to_move() == Color::Black)
    }

    pub fn is_check(&self) -> bool { !self.board.checkers().is_empty() }

    pub fn is_game_over(&self) -> bool { self.board.status() != GameStatus::Ongoing }

    /// Legal moves in generation order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::new();
        self.board.generate_moves(|moves| {
            out.extend(moves);
            false
        });
        out
    }

    pub fn legal_moves_uci(&self) -> Vec<String> {
        self.legal_moves().into_iter().map(|m| self.uci(m)).collect()
    }

    pub fn legal_moves_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|moves| { ct += moves.len(); false });
        ct
    }

    /// Standard UCI text for a legal move. Castling is reported as the king's
    /// two-square step (`e1g1`) rather than king-takes-rook.
    pub fn uci(&self, mv: Move) -> String {
        let mut to = mv.to;
        let stm = self.board.side_to_move();
        if self.board.piece_on(mv.from) == Some(Piece::King) && self.board.colors(stm).has(mv.to) {
            let file = if mv.to.file() as usize > mv.from.file() as usize { File::G } else { File::C };
            to = Square::new(file, mv.from.rank());
        }
        let mut s = format!("{}{}", mv.from, to);
        if let Some(p) = mv.promotion {
            s.push(promotion_char(p));
        }
        s
    }

    /// Legal move matching `mv_uci`, if any.
    pub fn find_legal(&self, mv_uci: &str) -> Option<Move> {
        let mut found = None;
        self.board.generate_moves(|moves| {
            for m in moves {
                if self.uci(m) == mv_uci { found = Some(m); break; }
            }
            found.is_some()
        });
        found
    }

    pub fn is_legal_uci(&self, mv_uci: &str) -> bool { self.find_legal(mv_uci).is_some() }

    /// True when `mv_uci` is legal here and lands on an enemy piece or the en passant square.
    pub fn is_capture_uci(&self, mv_uci: &str) -> bool {
        let Some(m) = self.find_legal(mv_uci) else { return false };
        let them = !self.board.side_to_move();
        if self.board.colors(them).has(m.to) {
            return true;
        }
        self.board.piece_on(m.from) == Some(Piece::Pawn)
            && m.from.file() != m.to.file()
            && self.board.piece_on(m.to).is_none()
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<()> {
        match self.find_legal(mv_uci) {
            Some(m) => { self.board.play(m); Ok(()) }
            None => Err(Error::InvalidMove(mv_uci.to_string())),
        }
    }

    /// Child position after `mv_uci`; the receiver is left untouched.
    pub fn apply_uci(&self, mv_uci: &str) -> Result<Self> {
        let mut child = self.clone();
        child.make_move_uci(mv_uci)?;
        Ok(child)
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }
}

fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::Pawn => 'p',
        Piece::King => 'k',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_moves_and_ply_zero() {
        let pos = Position::startpos();
        assert_eq!(pos.legal_moves_count(), 20);
        assert_eq!(pos.ply(), 0);
        assert!(!pos.is_check());
        assert!(!pos.is_game_over());
    }

    #[test]
    fn castling_is_reported_in_standard_notation() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = pos.legal_moves_uci();
        assert!(moves.contains(&"e1g1".to_string()), "{moves:?}");
        assert!(moves.contains(&"e1c1".to_string()), "{moves:?}");
        assert!(!moves.contains(&"e1h1".to_string()));
        let after = pos.apply_uci("e1g1").unwrap();
        assert_eq!(after.side_to_move(), Color::Black);
    }

    #[test]
    fn ply_counts_black_to_move() {
        let pos = Position::set_from_start_and_moves(&["e2e4".to_string()]).unwrap();
        assert_eq!(pos.ply(), 1);
        let pos = pos.apply_uci("e7e5").unwrap();
        assert_eq!(pos.ply(), 2);
    }

    #[test]
    fn malformed_fen_is_rejected() {
        let err = Position::from_fen("not a fen").unwrap_err();
        assert!(matches!(err, Error::InvalidPosition { .. }));
    }

    #[test]
    fn identity_ignores_move_counters() {
        let a = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let b = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 4 3";
        assert_eq!(position_identity(a), position_identity(b));
    }

    #[test]
    fn en_passant_counts_as_capture() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert!(pos.is_capture_uci("e5d6"));
        assert!(!pos.is_capture_uci("e5e6"));
    }
}
