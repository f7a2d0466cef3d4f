//! Engine-backed selector that can hand its answers to a learner.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use super::{HistoryEntry, MemoryBackedSelector, MoveSelect, Source};
use crate::board::Position;
use crate::engine::{EngineAnalysis, EngineOracle, SearchBudget};
use crate::error::Result;
use crate::package::now_secs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeachingEvent {
    pub student: String,
    pub position: String,
    pub uci: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeachingStats {
    pub name: String,
    pub total_positions: usize,
    pub total_moves: usize,
    pub students_taught: usize,
    pub total_lessons: usize,
}

pub struct OracleBackedSelector<E: EngineOracle> {
    name: String,
    engine: E,
    budget: SearchBudget,
    position_memory: HashMap<String, String>,
    move_history: Vec<HistoryEntry>,
    teaching_history: Vec<TeachingEvent>,
}

impl<E: EngineOracle> OracleBackedSelector<E> {
    pub fn new(name: &str, engine: E, budget: SearchBudget) -> Self {
        Self {
            name: name.to_string(),
            engine,
            budget,
            position_memory: HashMap::new(),
            move_history: Vec::new(),
            teaching_history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn move_history(&self) -> &[HistoryEntry] { &self.move_history }

    pub fn teaching_history(&self) -> &[TeachingEvent] { &self.teaching_history }

    pub fn remembered_move(&self, fen: &str) -> Option<&str> { self.position_memory.get(fen).map(String::as_str) }

    /// Full engine answer for `fen`, or `None` when the side to move has no
    /// legal move. Engine failures are returned as-is.
    pub fn analyse(&mut self, fen: &str) -> Result<Option<EngineAnalysis>> {
        let pos = Position::from_fen(fen)?;
        if pos.legal_moves_count() == 0 {
            return Ok(None);
        }
        let analysis = self.engine.best_move(fen, &self.budget)?;
        self.record_move(fen, &analysis.best_move);
        Ok(Some(analysis))
    }

    fn record_move(&mut self, fen: &str, uci: &str) {
        self.position_memory.insert(fen.to_string(), uci.to_string());
        self.move_history.push(HistoryEntry {
            position: fen.to_string(),
            uci: uci.to_string(),
            source: Source::Oracle,
            confidence: 100.0,
            timestamp: now_secs(),
        });
    }

    /// Computes the move for `fen` and has `student` learn it.
    pub fn teach(&mut self, student: &mut MemoryBackedSelector, fen: &str) -> Result<Option<String>> {
        let Some(analysis) = self.analyse(fen)? else {
            return Ok(None);
        };
        student.learn(fen, &analysis.best_move)?;
        debug!("{} taught {} {} in {fen}", self.name, student.name(), analysis.best_move);
        self.teaching_history.push(TeachingEvent {
            student: student.name().to_string(),
            position: fen.to_string(),
            uci: analysis.best_move.clone(),
            timestamp: now_secs(),
        });
        Ok(Some(analysis.best_move))
    }

    pub fn teaching_stats(&self) -> TeachingStats {
        let students: HashSet<&str> = self.teaching_history.iter().map(|t| t.student.as_str()).collect();
        TeachingStats {
            name: self.name.clone(),
            total_positions: self.position_memory.len(),
            total_moves: self.move_history.len(),
            students_taught: students.len(),
            total_lessons: self.teaching_history.len(),
        }
    }
}

impl<E: EngineOracle> MoveSelect for OracleBackedSelector<E> {
    fn select_move(&mut self, fen: &str) -> Result<Option<String>> {
        Ok(self.analyse(fen)?.map(|a| a.best_move))
    }
}
