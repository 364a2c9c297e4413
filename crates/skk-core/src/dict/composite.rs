//! Ordered stack of dictionaries presented as one.

use std::sync::Arc;

use crate::candidate::Candidate;

use super::{Dict, DictError};

/// Searches attached dictionaries in order and merges their results.
/// Mutations go to writable dictionaries only.
#[derive(Default, Clone)]
pub struct CompositeDict {
    dicts: Vec<Arc<dyn Dict>>,
}

impl CompositeDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dict: Arc<dyn Dict>) {
        self.dicts.push(dict);
    }

    pub fn remove(&mut self, index: usize) -> Option<Arc<dyn Dict>> {
        if index < self.dicts.len() {
            Some(self.dicts.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.dicts.clear();
    }

    pub fn len(&self) -> usize {
        self.dicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dicts.is_empty()
    }
}

impl Dict for CompositeDict {
    /// Concatenation in attachment order, deduplicated on candidate text;
    /// the first occurrence wins, so earlier dictionaries take precedence.
    fn lookup(&self, midasi: &str, okuri: bool) -> Vec<Candidate> {
        let mut merged: Vec<Candidate> = Vec::new();
        for dict in &self.dicts {
            for candidate in dict.lookup(midasi, okuri) {
                if !merged.iter().any(|c| c.text == candidate.text) {
                    merged.push(candidate);
                }
            }
        }
        merged
    }

    fn complete(&self, prefix: &str) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        for dict in &self.dicts {
            for midasi in dict.complete(prefix) {
                if !merged.contains(&midasi) {
                    merged.push(midasi);
                }
            }
        }
        merged
    }

    fn register(&self, candidate: &Candidate) -> bool {
        for dict in &self.dicts {
            if !dict.read_only() {
                return dict.register(candidate);
            }
        }
        false
    }

    fn purge(&self, candidate: &Candidate) -> bool {
        let mut changed = false;
        for dict in &self.dicts {
            if !dict.read_only() && dict.purge(candidate) {
                changed = true;
            }
        }
        changed
    }

    fn save(&self) -> Result<(), DictError> {
        for dict in &self.dicts {
            if !dict.read_only() {
                dict.save()?;
            }
        }
        Ok(())
    }

    fn read_only(&self) -> bool {
        self.dicts.iter().all(|d| d.read_only())
    }
}
