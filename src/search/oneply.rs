use cozy_chess::{Board, GameStatus};

use crate::board::Position;
use crate::search::eval::static_eval_cp;

pub const MATE_SCORE: i32 = 30_000;
pub const DRAW_SCORE: i32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMove {
    pub uci: String,
    /// Centipawns from the perspective of the side making the move.
    pub score_cp: i32,
}

/// Score of `child` for the side that just moved into it.
fn child_score(child: &Board) -> i32 {
    match child.status() {
        GameStatus::Won => MATE_SCORE,
        GameStatus::Drawn => DRAW_SCORE,
        GameStatus::Ongoing => -static_eval_cp(child),
    }
}

/// Every legal move scored one ply deep, in generation order.
pub fn score_moves(pos: &Position) -> Vec<ScoredMove> {
    pos.legal_moves()
        .into_iter()
        .map(|m| {
            let mut child = pos.board().clone();
            child.play(m);
            ScoredMove { uci: pos.uci(m), score_cp: child_score(&child) }
        })
        .collect()
}

/// Highest scoring move; the earliest generated wins a tie.
pub fn best_move(pos: &Position) -> Option<ScoredMove> {
    let mut best: Option<ScoredMove> = None;
    for sm in score_moves(pos) {
        if best.as_ref().map_or(true, |b| sm.score_cp > b.score_cp) {
            best = Some(sm);
        }
    }
    best
}

/// All moves, best first; equal scores keep generation order.
pub fn ranked_moves(pos: &Position) -> Vec<ScoredMove> {
    let mut moves = score_moves(pos);
    moves.sort_by(|a, b| b.score_cp.cmp(&a.score_cp));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_winning_queen_capture() {
        let pos = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").unwrap();
        let bm = best_move(&pos).expect("expected a best move");
        assert_eq!(bm.uci, "e2d2");
    }

    #[test]
    fn finds_mate_in_one() {
        // back rank: Ra1-a8 mates
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let bm = best_move(&pos).unwrap();
        assert_eq!(bm.uci, "a1a8");
        assert_eq!(bm.score_cp, MATE_SCORE);
    }

    #[test]
    fn ties_keep_generation_order() {
        let pos = Position::startpos();
        let scored = score_moves(&pos);
        let top = scored.iter().map(|s| s.score_cp).max().unwrap();
        let first_top = scored.iter().find(|s| s.score_cp == top).unwrap();
        assert_eq!(best_move(&pos).unwrap(), *first_top);
        assert_eq!(ranked_moves(&pos)[0], *first_top);
    }

    #[test]
    fn no_moves_when_checkmated() {
        let pos = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(best_move(&pos).is_none());
    }
}
