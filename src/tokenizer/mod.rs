//! Codecs turning engine knowledge into fixed-width numeric tokens.

pub mod evaluation;
pub mod moves;
pub mod position;

use log::{debug, warn};

pub use evaluation::{decode_evaluation, encode_evaluation, mate_score, EvaluationToken, EVAL_CLAMP};
pub use moves::{decode_move, encode_move, encode_move_on, encode_squares, MoveToken};
pub use position::{encode_position, encode_position_with_mobility, PositionVector, POSITION_FEATURES};

use crate::board::Position;
use crate::error::{Error, Result};
use crate::package::{
    now_secs, AlternativeMove, AlternativeToken, MemoryEntry, MemoryPackage, TokenMetadata, TokenizedMemory,
    TokenizedPackage,
};

/// Encodes a single memory; moves are encoded against the memory's own position.
pub fn tokenize_memory(memory: &MemoryEntry) -> Result<TokenizedMemory> {
    let pos = Position::from_fen(&memory.position)?;
    let position_tokens = position::encode_board(&pos);
    let move_tokens = encode_move_on(&pos, &memory.best_move)?;

    // PV moves are played out so each one is encoded from the position it is made in.
    let mut pv_tokens = Vec::with_capacity(memory.principal_variation.len());
    let mut cursor = Some(pos.clone());
    for mv in &memory.principal_variation {
        let token = match &cursor {
            Some(p) => encode_move_on(p, mv)?,
            None => encode_move(mv)?,
        };
        pv_tokens.push(token.to_vec());
        cursor = cursor.and_then(|p| p.apply_uci(mv).ok());
    }

    let alternative_tokens = memory
        .alternative_moves
        .iter()
        .map(|alt| {
            Ok(AlternativeToken {
                mv: encode_move_on(&pos, &alt.mv)?.to_vec(),
                evaluation: encode_evaluation(alt.evaluation)?.to_vec(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TokenizedMemory {
        position_tokens,
        evaluation_token: encode_evaluation(memory.evaluation)?.to_vec(),
        move_tokens: move_tokens.to_vec(),
        pv_tokens,
        alternative_tokens,
        metadata: TokenMetadata {
            original_position: memory.position.clone(),
            depth: memory.depth,
            timestamp: memory.timestamp.unwrap_or_else(now_secs),
        },
    })
}

/// Tokenizes every memory of `package`. Memories that fail to encode are
/// logged and left out; their keys are returned alongside the package.
pub fn tokenize_package(package: &MemoryPackage) -> (TokenizedPackage, Vec<(String, Error)>) {
    let mut out = TokenizedPackage { metadata: package.metadata.clone(), ..TokenizedPackage::default() };
    let mut rejected = Vec::new();
    for (key, memory) in &package.memories {
        match tokenize_memory(memory) {
            Ok(t) => { out.tokenized_memories.insert(key.clone(), t); }
            Err(e) => {
                warn!("skipping memory {key}: {e}");
                rejected.push((key.clone(), e));
            }
        }
    }
    debug!("tokenized {} of {} memories", out.tokenized_memories.len(), package.memories.len());
    (out, rejected)
}

/// Decodes a tokenized memory back to the raw shape. Promotion pieces are not recovered.
pub fn detokenize_memory(tokens: &TokenizedMemory) -> Result<MemoryEntry> {
    let principal_variation = tokens.pv_tokens.iter().map(|t| decode_move(t)).collect::<Result<Vec<_>>>()?;
    let alternative_moves = tokens
        .alternative_tokens
        .iter()
        .map(|alt| Ok(AlternativeMove { mv: decode_move(&alt.mv)?, evaluation: decode_evaluation(&alt.evaluation)? }))
        .collect::<Result<Vec<_>>>()?;
    Ok(MemoryEntry {
        position: tokens.metadata.original_position.clone(),
        best_move: decode_move(&tokens.move_tokens)?,
        evaluation: decode_evaluation(&tokens.evaluation_token)?,
        depth: tokens.metadata.depth,
        principal_variation,
        alternative_moves,
        timestamp: Some(tokens.metadata.timestamp),
    })
}

pub fn detokenize_package(package: &TokenizedPackage) -> (MemoryPackage, Vec<(String, Error)>) {
    let mut out = MemoryPackage { metadata: package.metadata.clone(), ..MemoryPackage::default() };
    let mut rejected = Vec::new();
    for (key, tokens) in &package.tokenized_memories {
        match detokenize_memory(tokens) {
            Ok(m) => { out.memories.insert(key.clone(), m); }
            Err(e) => {
                warn!("skipping tokenized memory {key}: {e}");
                rejected.push((key.clone(), e));
            }
        }
    }
    (out, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;
    use pretty_assertions::assert_eq;

    fn start_memory() -> MemoryEntry {
        MemoryEntry {
            position: START_FEN.to_string(),
            best_move: "e2e4".to_string(),
            evaluation: 0.5,
            depth: 20,
            principal_variation: vec!["e2e4".into(), "e7e5".into(), "g1f3".into()],
            alternative_moves: vec![AlternativeMove { mv: "d2d4".into(), evaluation: 0.4 }],
            timestamp: Some(1.0),
        }
    }

    #[test]
    fn memory_tokens_have_contract_shapes() {
        let t = tokenize_memory(&start_memory()).unwrap();
        assert_eq!(t.position_tokens.len(), 774);
        assert_eq!(t.evaluation_token.len(), 4);
        assert_eq!(t.move_tokens.len(), 5);
        assert_eq!(t.pv_tokens.len(), 3);
        assert_eq!(t.alternative_tokens.len(), 1);
        assert_eq!(t.metadata.original_position, START_FEN);
        assert_eq!(t.metadata.depth, 20);
    }

    #[test]
    fn detokenize_restores_moves_and_evaluation() {
        let m = start_memory();
        let back = detokenize_memory(&tokenize_memory(&m).unwrap()).unwrap();
        assert_eq!(back.best_move, m.best_move);
        assert_eq!(back.principal_variation, m.principal_variation);
        assert_eq!(back.alternative_moves[0].mv, "d2d4");
        assert!((back.evaluation - 0.5).abs() < 1e-6);
    }

    #[test]
    fn bad_memories_are_skipped_not_fatal() {
        let mut pkg = MemoryPackage::new("test", "2024-01-01");
        pkg.insert("good".into(), start_memory());
        let mut bad = start_memory();
        bad.best_move = "zz99".into();
        pkg.insert("bad".into(), bad);
        let (tokens, rejected) = tokenize_package(&pkg);
        assert_eq!(tokens.tokenized_memories.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, "bad");
        assert!(matches!(rejected[0].1, Error::InvalidMove(_)));
    }
}
