//! Memory-backed selector.
//!
//! Cascade per query: repetition check, opening book, stored memory, one-ply
//! search, first legal move. A stage that has nothing to offer falls through
//! to the next one; only an empty move list ends in [`Outcome::NoLegalMove`].

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use super::{HistoryEntry, MoveSelect, Outcome, RepetitionCounter, Selection, SelectorConfig, Source};
use crate::board::{position_identity, Position, START_FEN};
use crate::chess_openings::OpeningBook;
use crate::error::{Error, Result};
use crate::package::{now_secs, TokenizedMemory, TokenizedPackage};
use crate::pattern::{PatternKey, PatternMemory};
use crate::search::oneply;
use crate::tokenizer::position::{encode_board, POSITION_FEATURES};
use crate::tokenizer::{decode_evaluation, decode_move, encode_move_on, EvaluationToken, MoveToken};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRecord {
    pub position: String,
    pub token: MoveToken,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningEvent {
    pub position: String,
    pub uci: String,
    pub evaluation: Option<f64>,
    pub confidence: f64,
    pub timestamp: f64,
    pub move_number: usize,
}

/// Outcome of a batch ingestion. Rejected records carry
/// [`Error::LearningRecord`] wrapping the underlying cause.
#[derive(Debug, Default)]
pub struct LearningReport {
    pub learned: usize,
    pub rejected: Vec<Error>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningStats {
    pub name: String,
    pub total_learned_moves: usize,
    pub unique_positions: usize,
    pub unique_patterns: usize,
    pub average_confidence: f64,
    pub total_moves: usize,
}

pub struct MemoryBackedSelector {
    name: String,
    config: SelectorConfig,
    book: Arc<OpeningBook>,
    memory: HashMap<String, MemoryRecord>,
    evaluations: HashMap<String, f64>,
    patterns: PatternMemory,
    repetitions: RepetitionCounter,
    move_history: Vec<HistoryEntry>,
    learning_history: Vec<LearningEvent>,
    current_opening: Option<String>,
    start_identity: String,
}

impl MemoryBackedSelector {
    pub fn new(name: &str, config: SelectorConfig, book: Arc<OpeningBook>) -> Self {
        let patterns = PatternMemory::new(config.pattern_confidence_cap, config.pattern_saturation);
        Self {
            name: name.to_string(),
            config,
            book,
            memory: HashMap::new(),
            evaluations: HashMap::new(),
            patterns,
            repetitions: RepetitionCounter::new(),
            move_history: Vec::new(),
            learning_history: Vec::new(),
            current_opening: None,
            start_identity: position_identity(START_FEN),
        }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn config(&self) -> &SelectorConfig { &self.config }

    pub fn current_opening(&self) -> Option<&str> { self.current_opening.as_deref() }

    pub fn move_history(&self) -> &[HistoryEntry] { &self.move_history }

    pub fn learning_history(&self) -> &[LearningEvent] { &self.learning_history }

    pub fn memory_record(&self, fen: &str) -> Option<&MemoryRecord> { self.memory.get(&position_identity(fen)) }

    pub fn evaluation(&self, fen: &str) -> Option<f64> { self.evaluations.get(&position_identity(fen)).copied() }

    pub fn patterns(&self) -> &PatternMemory { &self.patterns }

    pub fn repetitions(&self) -> &RepetitionCounter { &self.repetitions }

    /// Starts a new game: repetition counts and the current opening are
    /// forgotten, learned knowledge is kept.
    pub fn reset_game(&mut self) {
        self.repetitions.clear();
        self.current_opening = None;
    }

    pub fn get_move(&mut self, fen: &str) -> Result<Outcome> {
        let pos = Position::from_fen(fen)?;
        let identity = position_identity(fen);
        if identity == self.start_identity {
            self.reset_game();
        }
        let visits = self.repetitions.visit(&identity);
        if visits >= self.config.draw_threshold {
            debug!("{}: position seen {visits} times, draw by repetition", self.name);
            return Ok(Outcome::DrawByRepetition);
        }

        let selection = self
            .from_book(&pos)
            .or_else(|| self.from_memory(&pos, &identity))
            .or_else(|| self.from_search(&pos))
            .or_else(|| Self::from_fallback(&pos));

        let Some(selection) = selection else {
            debug!("{}: no legal move", self.name);
            return Ok(Outcome::NoLegalMove);
        };
        debug!("{}: {} via {:?} ({:.1}%)", self.name, selection.uci, selection.source, selection.confidence);
        self.record_move(fen, &pos, &selection);
        Ok(Outcome::Selected(selection))
    }

    fn from_book(&self, pos: &Position) -> Option<Selection> {
        let hit = self.book.lookup(pos)?;
        Some(Selection {
            uci: hit.uci,
            source: Source::Opening { line: hit.line },
            confidence: self.config.opening_confidence,
        })
    }

    fn from_memory(&self, pos: &Position, identity: &str) -> Option<Selection> {
        let record = self.memory.get(identity)?;
        let uci = decode_move(&record.token).ok()?;
        if !pos.is_legal_uci(&uci) {
            debug!("{}: stored move {uci} is not legal here, skipping", self.name);
            return None;
        }
        Some(Selection { uci, source: Source::Memory, confidence: record.confidence })
    }

    fn from_search(&self, pos: &Position) -> Option<Selection> {
        if !self.config.search_enabled {
            return None;
        }
        let best = oneply::best_move(pos)?;
        let key = PatternKey::from_features(&encode_board(pos));
        Some(Selection { uci: best.uci, source: Source::Search, confidence: self.patterns.confidence(&key) })
    }

    fn from_fallback(pos: &Position) -> Option<Selection> {
        let uci = pos.legal_moves_uci().into_iter().next()?;
        Some(Selection { uci, source: Source::Fallback, confidence: 0.0 })
    }

    fn record_move(&mut self, fen: &str, pos: &Position, selection: &Selection) {
        if let Source::Opening { line } = &selection.source {
            self.current_opening = Some(line.clone());
        }
        if let Ok(token) = encode_move_on(pos, &selection.uci) {
            self.memory.insert(
                position_identity(fen),
                MemoryRecord { position: fen.to_string(), token, confidence: selection.confidence },
            );
        }
        self.move_history.push(HistoryEntry {
            position: fen.to_string(),
            uci: selection.uci.clone(),
            source: selection.source.clone(),
            confidence: selection.confidence,
            timestamp: now_secs(),
        });
    }

    fn confidence_with(&self, pos: &Position, key: &PatternKey, uci: &str) -> f64 {
        let bonus = if pos.is_legal_uci(uci) { self.config.legal_bonus } else { 0.0 };
        (self.patterns.confidence(key) + bonus).clamp(0.0, 100.0)
    }

    /// Pattern confidence of `fen` plus the legal-move bonus, capped at 100.
    /// An unparseable position scores zero.
    pub fn confidence(&self, fen: &str, uci: &str) -> f64 {
        match Position::from_fen(fen) {
            Ok(pos) => {
                let key = PatternKey::from_features(&encode_board(&pos));
                self.confidence_with(&pos, &key, uci)
            }
            Err(_) => 0.0,
        }
    }

    fn push_learning_event(&mut self, fen: &str, uci: &str, evaluation: Option<f64>, confidence: f64) {
        let move_number = self.learning_history.len() + 1;
        self.learning_history.push(LearningEvent {
            position: fen.to_string(),
            uci: uci.to_string(),
            evaluation,
            confidence,
            timestamp: now_secs(),
            move_number,
        });
    }

    /// Stores a move taught directly for `fen`.
    pub fn learn(&mut self, fen: &str, uci: &str) -> Result<()> {
        let pos = Position::from_fen(fen)?;
        let token = encode_move_on(&pos, uci)?;
        let key = PatternKey::from_features(&encode_board(&pos));
        let confidence = self.confidence_with(&pos, &key, uci);
        self.memory.insert(position_identity(fen), MemoryRecord { position: fen.to_string(), token, confidence });
        self.push_learning_event(fen, uci, None, confidence);
        Ok(())
    }

    fn learn_record(&mut self, record: &TokenizedMemory) -> Result<()> {
        let uci = decode_move(&record.move_tokens)?;
        let evaluation = decode_evaluation(&record.evaluation_token)?;
        let move_token: MoveToken = record
            .move_tokens
            .as_slice()
            .try_into()
            .map_err(|_| Error::MalformedToken("move token length".to_string()))?;
        let eval_token: EvaluationToken = record
            .evaluation_token
            .as_slice()
            .try_into()
            .map_err(|_| Error::MalformedToken("evaluation token length".to_string()))?;
        if record.position_tokens.len() != POSITION_FEATURES {
            return Err(Error::MalformedToken(format!(
                "position token has {} elements, expected {POSITION_FEATURES}",
                record.position_tokens.len()
            )));
        }
        let fen = &record.metadata.original_position;
        let pos = Position::from_fen(fen)?;
        let key = PatternKey::from_features(&record.position_tokens);
        let identity = position_identity(fen);

        self.evaluations.insert(identity.clone(), evaluation);
        self.patterns.observe(key, move_token, eval_token);
        let confidence = self.confidence_with(&pos, &key, &uci);
        self.memory.insert(identity, MemoryRecord { position: fen.clone(), token: move_token, confidence });
        self.push_learning_event(fen, &uci, Some(evaluation), confidence);
        Ok(())
    }

    /// Best-effort ingestion: every record is tried, failures are logged,
    /// counted and skipped.
    pub fn learn_from_tokenized_memory(&mut self, package: &TokenizedPackage) -> LearningReport {
        let mut report = LearningReport::default();
        for (key, record) in &package.tokenized_memories {
            match self.learn_record(record) {
                Ok(()) => report.learned += 1,
                Err(e) => {
                    let e = Error::learning_record(key, e);
                    warn!("{}: {e}", self.name);
                    report.rejected.push(e);
                }
            }
        }
        info!(
            "{}: learned {} records, skipped {}, {} patterns known",
            self.name,
            report.learned,
            report.rejected.len(),
            self.patterns.len()
        );
        report
    }

    pub fn stats(&self) -> LearningStats {
        let average_confidence = if self.memory.is_empty() {
            0.0
        } else {
            self.memory.values().map(|r| r.confidence).sum::<f64>() / self.memory.len() as f64
        };
        LearningStats {
            name: self.name.clone(),
            total_learned_moves: self.learning_history.len(),
            unique_positions: self.memory.len(),
            unique_patterns: self.patterns.len(),
            average_confidence,
            total_moves: self.move_history.len(),
        }
    }
}

impl MoveSelect for MemoryBackedSelector {
    fn select_move(&mut self, fen: &str) -> Result<Option<String>> {
        Ok(self.get_move(fen)?.uci().map(str::to_string))
    }
}
