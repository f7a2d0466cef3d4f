use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::package::load_json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Visits of the same position that end the game as a draw.
    pub draw_threshold: u32,
    /// Upper bound of the pattern part of a confidence score.
    pub pattern_confidence_cap: f64,
    /// Observations after which the pattern part reaches its cap.
    pub pattern_saturation: u32,
    /// Added to a confidence score when the decoded move is legal.
    pub legal_bonus: f64,
    /// Confidence attached to a book move.
    pub opening_confidence: f64,
    /// When off, positions without book or memory knowledge take the first legal move.
    pub search_enabled: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            draw_threshold: 3,
            pattern_confidence_cap: 40.0,
            pattern_saturation: 3,
            legal_bonus: 30.0,
            opening_confidence: 100.0,
            search_enabled: true,
        }
    }
}

impl SelectorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> { load_json(path) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SelectorConfig = serde_json::from_str(r#"{"draw_threshold": 5}"#).unwrap();
        assert_eq!(cfg.draw_threshold, 5);
        assert_eq!(cfg.legal_bonus, 30.0);
        assert_eq!(cfg.pattern_confidence_cap, 40.0);
        assert!(cfg.search_enabled);
    }
}
