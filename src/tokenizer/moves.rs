//! Move tokens: `[from/63, to/63, is_capture, is_promotion, is_castle]`.
//!
//! Decoding only recovers the two squares. The promotion piece and the three
//! flags are lost, so `e7e8q` comes back as `e7e8`. Callers that need the
//! promotion piece must keep the original move string.

use crate::board::Position;
use crate::error::{Error, Result};

pub const MOVE_TOKEN_LEN: usize = 5;

pub type MoveToken = [f32; MOVE_TOKEN_LEN];

const CASTLES: [&str; 4] = ["e1g1", "e1c1", "e8g8", "e8c8"];

fn square_index_from_str(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    if b.len() != 2 { return None; }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) { return None; }
    let file = (f - b'a') as usize;
    let rank = (r - b'1') as usize;
    Some(rank * 8 + file)
}

fn square_name(idx: usize) -> String {
    let file = (b'a' + (idx % 8) as u8) as char;
    let rank = (b'1' + (idx / 8) as u8) as char;
    format!("{file}{rank}")
}

struct ParsedMove {
    from: usize,
    to: usize,
    promotion: Option<char>,
    capture_marker: bool,
}

/// Accepts `e2e4`, `e7e8q` and the marked capture form `e4xd5`.
fn parse_move(mv: &str) -> Result<ParsedMove> {
    let invalid = || Error::InvalidMove(mv.to_string());
    let trimmed = mv.trim();
    let capture_marker = trimmed.contains('x');
    let plain: String = trimmed.chars().filter(|&c| c != 'x').collect();
    if plain.len() != 4 && plain.len() != 5 {
        return Err(invalid());
    }
    let from = plain.get(0..2).and_then(square_index_from_str).ok_or_else(invalid)?;
    let to = plain.get(2..4).and_then(square_index_from_str).ok_or_else(invalid)?;
    let promotion = match plain.get(4..) {
        Some("") | None => None,
        Some(p) => match p.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some(c @ ('n' | 'b' | 'r' | 'q')) => Some(c),
            _ => return Err(invalid()),
        },
    };
    if from == to {
        return Err(invalid());
    }
    Ok(ParsedMove { from, to, promotion, capture_marker })
}

fn token_from(parsed: &ParsedMove, plain: &str, is_capture: bool) -> MoveToken {
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    [
        parsed.from as f32 / 63.0,
        parsed.to as f32 / 63.0,
        flag(is_capture),
        flag(parsed.promotion.is_some()),
        flag(CASTLES.contains(&plain)),
    ]
}

/// Context-free encoding; the capture flag is set only for an explicit `x` marker.
pub fn encode_move(mv: &str) -> Result<MoveToken> {
    let parsed = parse_move(mv)?;
    let plain = plain_uci(&parsed);
    Ok(token_from(&parsed, &plain, parsed.capture_marker))
}

/// Encoding with the position the move is played from, so captures
/// (including en passant) are flagged from the board.
pub fn encode_move_on(pos: &Position, mv: &str) -> Result<MoveToken> {
    let parsed = parse_move(mv)?;
    let plain = plain_uci(&parsed);
    let capture = parsed.capture_marker || pos.is_capture_uci(&plain);
    Ok(token_from(&parsed, &plain, capture))
}

fn plain_uci(p: &ParsedMove) -> String {
    let mut s = format!("{}{}", square_name(p.from), square_name(p.to));
    if let Some(c) = p.promotion { s.push(c); }
    s
}

fn token_square(x: f32) -> usize {
    (x * 63.0).round().clamp(0.0, 63.0) as usize
}

/// Square-to-square move text recovered from a token.
pub fn decode_move(token: &[f32]) -> Result<String> {
    if token.len() != MOVE_TOKEN_LEN {
        return Err(Error::MalformedToken(format!("move token has {} elements, expected {MOVE_TOKEN_LEN}", token.len())));
    }
    if !token[0].is_finite() || !token[1].is_finite() {
        return Err(Error::MalformedToken("non-finite square coordinate".to_string()));
    }
    let from = token_square(token[0]);
    let to = token_square(token[1]);
    Ok(format!("{}{}", square_name(from), square_name(to)))
}

/// Token for the plain move between two square indices.
pub fn encode_squares(from: usize, to: usize) -> MoveToken {
    [from as f32 / 63.0, to as f32 / 63.0, 0.0, 0.0, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    #[test]
    fn e2e4_tokens() {
        let t = encode_move("e2e4").unwrap();
        assert_eq!(t[0], 12.0 / 63.0);
        assert_eq!(t[1], 28.0 / 63.0);
        assert_eq!(&t[2..], &[0.0, 0.0, 0.0]);
        assert_eq!(decode_move(&t).unwrap(), "e2e4");
    }

    #[test]
    fn every_square_pair_survives_decode() {
        for a in 0..64 {
            for b in 0..64 {
                if a == b { continue; }
                let decoded = decode_move(&encode_squares(a, b)).unwrap();
                assert_eq!(decoded, format!("{}{}", square_name(a), square_name(b)));
            }
        }
    }

    #[test]
    fn promotion_is_flagged_but_not_recovered() {
        let t = encode_move("e7e8q").unwrap();
        assert_eq!(t[3], 1.0);
        assert_eq!(decode_move(&t).unwrap(), "e7e8");
    }

    #[test]
    fn castle_flag() {
        assert_eq!(encode_move("e1g1").unwrap()[4], 1.0);
        assert_eq!(encode_move("e8c8").unwrap()[4], 1.0);
        assert_eq!(encode_move("e2e4").unwrap()[4], 0.0);
    }

    #[test]
    fn capture_flag_from_marker_and_board() {
        assert_eq!(encode_move("e4xd5").unwrap()[2], 1.0);
        let pos = Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2").unwrap();
        assert_eq!(encode_move_on(&pos, "e4d5").unwrap()[2], 1.0);
        let start = Position::from_fen(START_FEN).unwrap();
        assert_eq!(encode_move_on(&start, "e2e4").unwrap()[2], 0.0);
    }

    #[test]
    fn rejects_unparseable_moves() {
        for bad in ["", "e2", "e9e4", "i2e4", "e2e4k", "e2e2", "hello"] {
            assert!(matches!(encode_move(bad), Err(Error::InvalidMove(_))), "{bad}");
        }
    }

    #[test]
    fn decode_clamps_out_of_range_coordinates() {
        assert_eq!(decode_move(&[-0.5, 1.7, 0.0, 0.0, 0.0]).unwrap(), "a1h8");
        assert!(decode_move(&[0.1, 0.2]).is_err());
    }
}
