//! Invader spawn cycling
//!
//! Walks the vocabulary in order, emitting each term and then its definition
//! on successive spawn ticks, skipping anything already matched. Cycling
//! instead of random picks keeps every pair reachable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::vocab::Vocabulary;

/// Text chosen for the next invader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub text: String,
    pub is_definition: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    cursor: usize,
    show_term_next: bool,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            cursor: 0,
            show_term_next: true,
        }
    }
}

impl Spawner {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn show_term_next(&self) -> bool {
        self.show_term_next
    }

    fn advance_cursor(&mut self, len: usize) {
        self.cursor = (self.cursor + 1) % len;
        self.show_term_next = true;
    }

    /// One spawn tick. Returns `None` when this tick is skipped.
    pub fn step(&mut self, vocab: &Vocabulary, removed: &HashSet<String>) -> Option<SpawnRequest> {
        let len = vocab.len();
        if len == 0 {
            return None;
        }
        self.cursor %= len;

        let term = vocab.term_at(self.cursor)?;
        if removed.contains(term) {
            // The next entry always opens with its term
            self.advance_cursor(len);
            return None;
        }

        let text = if self.show_term_next {
            Some(term)
        } else {
            vocab.definition(term)
        };
        let Some(text) = text.filter(|t| !removed.contains(*t)) else {
            self.advance_cursor(len);
            return None;
        };

        let request = SpawnRequest {
            text: text.to_string(),
            is_definition: !self.show_term_next,
        };

        self.show_term_next = !self.show_term_next;
        if self.show_term_next {
            self.cursor = (self.cursor + 1) % len;
        }
        Some(request)
    }
}
