//! Evaluation tokens: `[tanh(score / EVAL_TANH_SCALE), |score|>3, |score|>5, |score|>10]`.
//!
//! Scores are in pawns from the side to move. They are clamped to
//! `±EVAL_CLAMP` first, which is also the sentinel for forced mates.

use crate::error::{Error, Result};

pub const EVAL_TOKEN_LEN: usize = 4;
pub const EVAL_CLAMP: f64 = 10_000.0;
/// Divisor applied before `tanh`. Keeps `tanh(EVAL_CLAMP / scale)` representable
/// strictly below 1.0 in `f64`.
pub const EVAL_TANH_SCALE: f64 = 1_000.0;

const SENTINEL_SNAP: f64 = 1e-3;

pub type EvaluationToken = [f64; EVAL_TOKEN_LEN];

/// Score used in place of a forced mate, signed from the side to move.
pub fn mate_score(winning: bool) -> f64 {
    if winning { EVAL_CLAMP } else { -EVAL_CLAMP }
}

pub fn encode_evaluation(score: f64) -> Result<EvaluationToken> {
    if score.is_nan() {
        return Err(Error::EvaluationDomain(score));
    }
    let clamped = score.clamp(-EVAL_CLAMP, EVAL_CLAMP);
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let mag = clamped.abs();
    Ok([
        (clamped / EVAL_TANH_SCALE).tanh(),
        flag(mag > 3.0),
        flag(mag > 5.0),
        flag(mag > 10.0),
    ])
}

pub fn decode_evaluation(token: &[f64]) -> Result<f64> {
    let Some(&x) = token.first() else {
        return Err(Error::MalformedToken("empty evaluation token".to_string()));
    };
    if token.len() != EVAL_TOKEN_LEN {
        return Err(Error::MalformedToken(format!("evaluation token has {} elements, expected {EVAL_TOKEN_LEN}", token.len())));
    }
    if !(x > -1.0 && x < 1.0) {
        return Err(Error::EvaluationDomain(x));
    }
    let score = (x.atanh() * EVAL_TANH_SCALE).clamp(-EVAL_CLAMP, EVAL_CLAMP);
    if EVAL_CLAMP - score.abs() < SENTINEL_SNAP {
        return Ok(EVAL_CLAMP.copysign(score));
    }
    Ok(score)
}
