use std::collections::HashMap;

/// Visit counts per position identity for the current game.
#[derive(Debug, Clone, Default)]
pub struct RepetitionCounter {
    visits: HashMap<String, u32>,
}

impl RepetitionCounter {
    pub fn new() -> Self { Self::default() }

    /// Records a visit and returns the visit count including this one.
    pub fn visit(&mut self, identity: &str) -> u32 {
        let n = self.visits.entry(identity.to_string()).or_insert(0);
        *n += 1;
        *n
    }

    pub fn count(&self, identity: &str) -> u32 {
        self.visits.get(identity).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) { self.visits.clear(); }

    pub fn len(&self) -> usize { self.visits.len() }

    pub fn is_empty(&self) -> bool { self.visits.is_empty() }
}
