//! Opening lines consulted before any stored or searched move.
//! Each line is a list of plies in UCI notation, white first.

use serde::{Deserialize, Serialize};

use crate::board::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningLine {
    pub name: String,
    pub moves: Vec<String>,
}

impl OpeningLine {
    pub fn new(name: &str, moves: &[&str]) -> Self {
        Self { name: name.to_string(), moves: moves.iter().map(|m| m.to_string()).collect() }
    }

    /// White's half of pair `ply / 2` for even plies, black's for odd ones.
    pub fn expected_move(&self, ply: usize) -> Option<&str> {
        self.moves.get(ply).map(String::as_str)
    }

    /// (white, black) pairs; the last black move may be missing.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.moves.chunks(2).map(|c| (c[0].as_str(), c.get(1).map(String::as_str)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBook {
    pub lines: Vec<OpeningLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookHit {
    pub line: String,
    pub uci: String,
}

impl OpeningBook {
    pub fn new(lines: Vec<OpeningLine>) -> Self { Self { lines } }

    pub fn empty() -> Self { Self::default() }

    /// First line, in declaration order, whose move for this ply is legal here.
    pub fn lookup(&self, pos: &Position) -> Option<BookHit> {
        let ply = pos.ply();
        self.lines.iter().find_map(|line| {
            let mv = line.expected_move(ply)?;
            pos.is_legal_uci(mv).then(|| BookHit { line: line.name.clone(), uci: mv.to_string() })
        })
    }

    pub fn len(&self) -> usize { self.lines.len() }

    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

/// Get all chess openings
pub fn get_chess_openings() -> Vec<OpeningLine> {
    vec![
        OpeningLine::new("Ruy Lopez", &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6"]),
        OpeningLine::new("Italian Game", &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1g1", "g8f6"]),
        OpeningLine::new("Sicilian Defense", &["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6"]),
        OpeningLine::new("French Defense", &["e2e4", "e7e6", "d2d4", "d7d5", "b1c3", "f8b4", "e4e5", "c7c5"]),
        OpeningLine::new("Queen's Gambit", &["d2d4", "d7d5", "c2c4", "e7e6", "b1c3", "g8f6", "c1g5", "f8e7"]),
        OpeningLine::new("Caro-Kann Defense", &["e2e4", "c7c6", "d2d4", "d7d5", "b1c3", "d5e4", "c3e4", "c8f5"]),
        OpeningLine::new("English Opening", &["c2c4", "e7e5", "b1c3", "g8f6", "g2g3", "d7d5", "c4d5", "f6d5"]),
        OpeningLine::new("King's Indian Defense", &["d2d4", "g8f6", "c2c4", "g7g6", "b1c3", "f8g7", "e2e4", "d7d6"]),
    ]
}

pub fn default_opening_book() -> OpeningBook {
    OpeningBook::new(get_chess_openings())
}
