use std::collections::HashMap;

use super::displacement::Displacement;

/// Memo of offset correlations for one curve computation over one stack.
///
/// Entries are keyed by [`Displacement::canonical`], so `(dy, dx)` and
/// `(-dy, -dx)` always share a slot. `None` records a displacement whose
/// window had no valid pixels.
#[derive(Clone, Debug, Default)]
pub struct CorrelationCache {
    entries: HashMap<Displacement, Option<f64>>,
    hits: usize,
    misses: usize,
}

impl CorrelationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a displacement or its negation. Counts a hit or a miss.
    pub fn get(&mut self, displacement: Displacement) -> Option<Option<f64>> {
        match self.entries.get(&displacement.canonical()) {
            Some(&value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, displacement: Displacement, value: Option<f64>) {
        self.entries.insert(displacement.canonical(), value);
    }

    pub fn contains(&self, displacement: Displacement) -> bool {
        self.entries.contains_key(&displacement.canonical())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
