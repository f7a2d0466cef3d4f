//! Engine oracle seam and package extraction from engine analysis.

use std::time::Duration;

use log::{debug, info};

use crate::board::{Position, START_FEN};
use crate::chess_openings::OpeningBook;
use crate::error::{Error, Result};
use crate::package::{now_secs, AlternativeMove, MemoryEntry, MemoryPackage};
use crate::search::oneply::{ranked_moves, MATE_SCORE};
use crate::tokenizer::{mate_score, EVAL_CLAMP};

#[derive(Debug, Clone, Copy)]
pub struct SearchBudget {
    pub depth: u32,
    pub movetime: Option<Duration>,
    /// Number of ranked moves wanted, best move included.
    pub multipv: usize,
}

impl Default for SearchBudget {
    fn default() -> Self { Self { depth: 1, movetime: None, multipv: 3 } }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineAnalysis {
    pub best_move: String,
    /// Pawns from the side to move; mates are reported as `±EVAL_CLAMP`.
    pub evaluation: f64,
    pub depth: u32,
    pub principal_variation: Vec<String>,
    pub alternatives: Vec<AlternativeMove>,
}

/// Anything that can analyse a position within a budget. Calls may block for
/// as long as the budget allows; callers wanting a hard timeout wrap the call.
pub trait EngineOracle {
    fn best_move(&mut self, fen: &str, budget: &SearchBudget) -> Result<EngineAnalysis>;
}

/// Engine oracle backed by the one-ply static scorer. The depth budget is
/// ignored; `multipv` controls how many alternatives are reported.
#[derive(Debug, Default, Clone)]
pub struct OnePlyOracle;

fn cp_to_pawns(cp: i32) -> f64 {
    if cp >= MATE_SCORE {
        mate_score(true)
    } else if cp <= -MATE_SCORE {
        mate_score(false)
    } else {
        (f64::from(cp) / 100.0).clamp(-EVAL_CLAMP, EVAL_CLAMP)
    }
}

impl EngineOracle for OnePlyOracle {
    fn best_move(&mut self, fen: &str, budget: &SearchBudget) -> Result<EngineAnalysis> {
        let pos = Position::from_fen(fen)?;
        let ranked = ranked_moves(&pos);
        let Some(best) = ranked.first() else {
            return Err(Error::EngineUnavailable(format!("no legal move in {fen}")));
        };
        let alternatives = ranked
            .iter()
            .skip(1)
            .take(budget.multipv.saturating_sub(1))
            .map(|s| AlternativeMove { mv: s.uci.clone(), evaluation: cp_to_pawns(s.score_cp) })
            .collect();
        Ok(EngineAnalysis {
            best_move: best.uci.clone(),
            evaluation: cp_to_pawns(best.score_cp),
            depth: 1,
            principal_variation: vec![best.uci.clone()],
            alternatives,
        })
    }
}

/// Drives an engine oracle over positions and collects the answers into a package.
pub struct MemoryExtractor<E: EngineOracle> {
    engine: E,
    budget: SearchBudget,
    source: String,
}

impl<E: EngineOracle> MemoryExtractor<E> {
    pub fn new(engine: E, budget: SearchBudget, source: &str) -> Self {
        Self { engine, budget, source: source.to_string() }
    }

    pub fn engine_mut(&mut self) -> &mut E { &mut self.engine }

    fn analyse(&mut self, fen: &str) -> Result<MemoryEntry> {
        let a = self.engine.best_move(fen, &self.budget)?;
        Ok(MemoryEntry {
            position: fen.to_string(),
            best_move: a.best_move,
            evaluation: a.evaluation,
            depth: a.depth,
            principal_variation: a.principal_variation,
            alternative_moves: a.alternatives,
            timestamp: Some(now_secs()),
        })
    }

    /// One memory per position, keyed by the FEN. Engine failures abort the extraction.
    pub fn extract(&mut self, positions: &[String], creation_date: &str) -> Result<MemoryPackage> {
        let mut pkg = MemoryPackage::new(&self.source, creation_date);
        for fen in positions {
            let entry = self.analyse(fen)?;
            pkg.insert(fen.clone(), entry);
        }
        info!("extracted {} positions from {}", pkg.memories.len(), self.source);
        Ok(pkg)
    }

    /// Walks every line from the start position and asks the engine about each
    /// position on the way. Memories are keyed `"<fen>_<line name>"`.
    pub fn extract_opening_lines(&mut self, book: &OpeningBook, creation_date: &str) -> Result<MemoryPackage> {
        let mut pkg = MemoryPackage::new(&self.source, creation_date);
        let mut names = Vec::with_capacity(book.len());
        for line in &book.lines {
            let mut pos = Position::from_fen(START_FEN)?;
            for mv in &line.moves {
                let fen = pos.fen();
                let entry = self.analyse(&fen)?;
                pkg.insert(format!("{fen}_{}", line.name), entry);
                if let Err(e) = pos.make_move_uci(mv) {
                    debug!("line {} stops at {mv}: {e}", line.name);
                    break;
                }
            }
            names.push(serde_json::Value::from(line.name.clone()));
        }
        pkg.metadata.extra.insert("openingsIncluded".to_string(), serde_json::Value::Array(names));
        info!("extracted {} opening positions from {} lines", pkg.memories.len(), book.len());
        Ok(pkg)
    }
}
