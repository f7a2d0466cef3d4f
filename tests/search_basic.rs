use cozy_chess::Board;
use memoranet::board::Position;

#[test]
fn eval_startpos_is_zero() {
    use memoranet::search::eval::static_eval_cp;
    let b = Board::default();
    assert_eq!(static_eval_cp(&b), 0, "startpos should be balanced");
}

#[test]
fn eval_material_known_advantage() {
    use memoranet::search::eval::material_eval_cp;
    // White: Kh1, Qe2; Black: Ka8, Qd2 (legal). Material equal.
    let fen = "k7/8/8/8/8/8/3qQ3/7K w - - 0 1";
    let b = Board::from_fen(fen, false).expect("valid fen");
    assert_eq!(material_eval_cp(&b), 0);
}

#[test]
fn one_ply_returns_legal_move_startpos() {
    use memoranet::search::oneply::best_move;
    let pos = Position::startpos();
    let bm = best_move(&pos).expect("no move found at one ply");
    assert!(pos.is_legal_uci(&bm.uci));
}

#[test]
fn one_ply_prefers_winning_queen_capture() {
    use memoranet::search::oneply::best_move;
    let pos = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    let bm = best_move(&pos).expect("expected a best move");
    assert_eq!(bm.uci, "e2d2", "expected Qe2xd2 as best move, got {}", bm.uci);
}

#[test]
fn one_ply_prefers_center_pawn_push_from_start() {
    use memoranet::search::oneply::best_move;
    let bm = best_move(&Position::startpos()).unwrap();
    assert!(["d2d4", "e2e4"].contains(&bm.uci.as_str()), "got {}", bm.uci);
}
