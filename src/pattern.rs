//! Aggregated move/evaluation samples keyed by quantized position features.

use std::collections::HashMap;

use crate::tokenizer::position::POSITION_FEATURES;
use crate::tokenizer::{EvaluationToken, MoveToken};

const KEY_WORDS: usize = POSITION_FEATURES.div_ceil(64);

/// Position features rounded to {0, 1} and packed into bits. Anything past
/// [`POSITION_FEATURES`] (the mobility count) is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternKey([u64; KEY_WORDS]);

impl PatternKey {
    pub fn from_features(features: &[f32]) -> Self {
        let mut words = [0u64; KEY_WORDS];
        for (i, &x) in features.iter().take(POSITION_FEATURES).enumerate() {
            if x >= 0.5 {
                words[i / 64] |= 1u64 << (i % 64);
            }
        }
        Self(words)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternEntry {
    pub move_samples: Vec<MoveToken>,
    pub evaluation_samples: Vec<EvaluationToken>,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct PatternMemory {
    entries: HashMap<PatternKey, PatternEntry>,
    cap: f64,
    saturation: u32,
}

impl Default for PatternMemory {
    fn default() -> Self { Self::new(40.0, 3) }
}

impl PatternMemory {
    /// `cap` is the confidence reached after `saturation` observations.
    pub fn new(cap: f64, saturation: u32) -> Self {
        Self { entries: HashMap::new(), cap, saturation: saturation.max(1) }
    }

    pub fn observe(&mut self, key: PatternKey, mv: MoveToken, eval: EvaluationToken) {
        let entry = self.entries.entry(key).or_default();
        entry.move_samples.push(mv);
        entry.evaluation_samples.push(eval);
        entry.count += 1;
    }

    /// `min(count / saturation, 1) * cap`, zero for an unseen key.
    pub fn confidence(&self, key: &PatternKey) -> f64 {
        let count = self.entries.get(key).map_or(0, |e| e.count);
        (f64::from(count) / f64::from(self.saturation)).min(1.0) * self.cap
    }

    pub fn get(&self, key: &PatternKey) -> Option<&PatternEntry> { self.entries.get(key) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn clear(&mut self) { self.entries.clear(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;
    use crate::tokenizer::{encode_evaluation, encode_move, encode_position, encode_position_with_mobility};

    #[test]
    fn confidence_saturates_at_cap() {
        let key = PatternKey::from_features(&encode_position(START_FEN).unwrap());
        let mv = encode_move("e2e4").unwrap();
        let ev = encode_evaluation(0.5).unwrap();
        let mut mem = PatternMemory::default();
        assert_eq!(mem.confidence(&key), 0.0);
        let expected = [40.0 / 3.0, 80.0 / 3.0, 40.0, 40.0];
        for want in expected {
            mem.observe(key, mv, ev);
            assert!((mem.confidence(&key) - want).abs() < 1e-9);
        }
        let entry = mem.get(&key).unwrap();
        assert_eq!(entry.count, 4);
        assert_eq!(entry.move_samples.len(), 4);
        assert_eq!(mem.len(), 1);
    }

    #[test]
    fn key_ignores_float_noise_and_mobility() {
        let exact = encode_position(START_FEN).unwrap();
        let noisy: Vec<f32> = exact.iter().map(|&x| if x > 0.0 { x - 1e-4 } else { x + 1e-4 }).collect();
        let with_mobility = encode_position_with_mobility(START_FEN).unwrap();
        let k = PatternKey::from_features(&exact);
        assert_eq!(k, PatternKey::from_features(&noisy));
        assert_eq!(k, PatternKey::from_features(&with_mobility));
    }

    #[test]
    fn different_positions_have_different_keys() {
        let a = PatternKey::from_features(&encode_position(START_FEN).unwrap());
        let b = PatternKey::from_features(
            &encode_position("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap(),
        );
        assert_ne!(a, b);
    }
}
