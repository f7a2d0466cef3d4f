//! Move selectors: the memory-backed learner and the engine-backed teacher.

pub mod config;
pub mod memory;
pub mod oracle;
pub mod repetition;

use serde::Serialize;

pub use config::SelectorConfig;
pub use memory::{LearningEvent, LearningReport, LearningStats, MemoryBackedSelector, MemoryRecord};
pub use oracle::{OracleBackedSelector, TeachingEvent, TeachingStats};
pub use repetition::RepetitionCounter;

use crate::error::Result;

/// The one capability every agent offers.
pub trait MoveSelect {
    /// UCI move to play from `fen`, or `None` when no move is available
    /// (no legal move, or the game is drawn by repetition).
    fn select_move(&mut self, fen: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Source {
    Opening { line: String },
    Memory,
    Search,
    Fallback,
    Oracle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub uci: String,
    pub source: Source,
    /// 0..=100
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Selected(Selection),
    DrawByRepetition,
    NoLegalMove,
}

impl Outcome {
    pub fn uci(&self) -> Option<&str> {
        match self {
            Outcome::Selected(s) => Some(&s.uci),
            Outcome::DrawByRepetition | Outcome::NoLegalMove => None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Outcome::Selected(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub position: String,
    pub uci: String,
    pub source: Source,
    pub confidence: f64,
    pub timestamp: f64,
}
