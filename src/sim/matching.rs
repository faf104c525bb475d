//! Term/definition pairing
//!
//! Mark shots flag invaders; two flagged invaders form a pair that is
//! either matched (both texts retired for good) or rejected (shown in the
//! reject color, then unmarked after a delay).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::state::Invader;
use crate::vocab::Vocabulary;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Shown on both invaders of a rejected pair
pub const REJECT_COLOR: Rgb = Rgb::new(220, 40, 40);

/// Marking state of a single invader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkState {
    #[default]
    Unmarked,
    /// Waiting in the marked buffer
    Marked(Rgb),
    /// Part of a rejected pair, reverting once the delay elapses
    Rejected,
}

impl MarkState {
    pub fn is_marked(&self) -> bool {
        !matches!(self, MarkState::Unmarked)
    }
}

/// Result of evaluating a full marked buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    Matched { a: String, b: String },
    Rejected { a: u32, b: u32 },
}

/// A deferred Rejected -> Unmarked transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PendingRevert {
    invader_id: u32,
    due_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Matcher {
    /// Invader ids awaiting evaluation (at most 2)
    marked: Vec<u32>,
    /// Matched texts; never spawned or marked again
    removed: HashSet<String>,
    pending: Vec<PendingRevert>,
}

impl Matcher {
    pub fn removed(&self) -> &HashSet<String> {
        &self.removed
    }

    pub fn is_removed(&self, text: &str) -> bool {
        self.removed.contains(text)
    }

    pub fn marked(&self) -> &[u32] {
        &self.marked
    }

    pub fn pending_reverts(&self) -> usize {
        self.pending.len()
    }

    /// Flag an invader. Returns false (and changes nothing) when it is
    /// already marked or its text is retired.
    pub fn mark(&mut self, invader: &mut Invader, color: Rgb) -> bool {
        if invader.mark.is_marked() || self.is_removed(&invader.text) || self.marked.len() >= 2 {
            return false;
        }
        invader.mark = MarkState::Marked(color);
        self.marked.push(invader.id);
        true
    }

    pub fn is_pair_ready(&self) -> bool {
        self.marked.len() == 2
    }

    /// Evaluate and clear a full buffer.
    ///
    /// On a match both texts are retired and every live invader carrying
    /// either text is removed from `invaders`; the removed invaders are
    /// returned alongside the outcome.
    pub fn evaluate(
        &mut self,
        vocab: &Vocabulary,
        invaders: &mut Vec<Invader>,
        now_ms: u64,
        reject_delay_ms: u64,
    ) -> Option<(PairOutcome, Vec<Invader>)> {
        if !self.is_pair_ready() {
            return None;
        }
        let (id_a, id_b) = (self.marked[0], self.marked[1]);
        self.marked.clear();

        let a = invaders.iter().find(|i| i.id == id_a)?.text.clone();
        let b = invaders.iter().find(|i| i.id == id_b)?.text.clone();

        if vocab.is_pair(&a, &b) {
            self.removed.insert(a.clone());
            self.removed.insert(b.clone());

            let mut gone = Vec::new();
            for idx in (0..invaders.len()).rev() {
                if self.removed.contains(&invaders[idx].text) {
                    gone.push(invaders.remove(idx));
                }
            }
            for invader in &gone {
                self.forget(invader.id);
            }
            Some((PairOutcome::Matched { a, b }, gone))
        } else {
            for invader in invaders.iter_mut().filter(|i| i.id == id_a || i.id == id_b) {
                invader.mark = MarkState::Rejected;
                self.pending.push(PendingRevert {
                    invader_id: invader.id,
                    due_ms: now_ms + reject_delay_ms,
                });
            }
            Some((PairOutcome::Rejected { a: id_a, b: id_b }, Vec::new()))
        }
    }

    /// Apply every revert due at `now_ms`; returns the reverted ids
    pub fn apply_due_reverts(&mut self, now_ms: u64, invaders: &mut [Invader]) -> Vec<u32> {
        let mut reverted = Vec::new();
        self.pending.retain(|revert| {
            if revert.due_ms > now_ms {
                return true;
            }
            if let Some(invader) = invaders.iter_mut().find(|i| i.id == revert.invader_id) {
                if invader.mark == MarkState::Rejected {
                    invader.mark = MarkState::Unmarked;
                    reverted.push(invader.id);
                }
            }
            false
        });
        reverted
    }

    /// Drop every reference to a destroyed invader: its buffer slot and
    /// any pending revert
    pub fn forget(&mut self, invader_id: u32) {
        self.marked.retain(|&id| id != invader_id);
        self.pending.retain(|r| r.invader_id != invader_id);
    }

    /// Every term and its definition have been matched
    pub fn is_won(&self, vocab: &Vocabulary) -> bool {
        vocab
            .entries()
            .iter()
            .all(|e| self.removed.contains(&e.term) && self.removed.contains(&e.definition))
    }

    /// Pairs not yet matched
    pub fn remaining_pairs(&self, vocab: &Vocabulary) -> usize {
        vocab
            .entries()
            .iter()
            .filter(|e| !(self.removed.contains(&e.term) && self.removed.contains(&e.definition)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Body;
    use glam::Vec2;

    fn vocab() -> Vocabulary {
        Vocabulary::parse("cat\tgato\ndog\tperro\n").unwrap()
    }

    fn invader(id: u32, text: &str) -> Invader {
        Invader {
            id,
            text: text.to_string(),
            is_definition: false,
            hp: 3,
            body: Body::new(Vec2::new(0.0, 100.0), Vec2::new(0.0, 1.0)),
            size: Vec2::new(40.0, 16.0),
            mark: MarkState::Unmarked,
        }
    }

    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn test_match_retires_both_texts() {
        let vocab = vocab();
        let mut matcher = Matcher::default();
        let mut invaders = vec![invader(1, "cat"), invader(2, "gato"), invader(3, "dog")];

        assert!(matcher.mark(&mut invaders[0], BLUE));
        assert!(!matcher.is_pair_ready());
        assert!(matcher.mark(&mut invaders[1], BLUE));
        assert!(matcher.is_pair_ready());

        let (outcome, gone) = matcher.evaluate(&vocab, &mut invaders, 0, 500).unwrap();
        assert_eq!(
            outcome,
            PairOutcome::Matched {
                a: "cat".into(),
                b: "gato".into()
            }
        );
        assert_eq!(gone.len(), 2);
        assert_eq!(invaders.len(), 1);
        assert_eq!(invaders[0].text, "dog");
        assert!(matcher.is_removed("cat") && matcher.is_removed("gato"));
        assert!(matcher.marked().is_empty());
        assert!(!matcher.is_won(&vocab));
        assert_eq!(matcher.remaining_pairs(&vocab), 1);
    }

    #[test]
    fn test_match_purges_duplicate_copies() {
        let vocab = vocab();
        let mut matcher = Matcher::default();
        let mut invaders = vec![invader(1, "gato"), invader(2, "cat"), invader(3, "cat")];
        matcher.mark(&mut invaders[1], BLUE);
        matcher.mark(&mut invaders[0], BLUE);
        let (_, gone) = matcher.evaluate(&vocab, &mut invaders, 0, 500).unwrap();
        assert_eq!(gone.len(), 3);
        assert!(invaders.is_empty());
    }

    #[test]
    fn test_mismatch_rejects_then_reverts() {
        let vocab = vocab();
        let mut matcher = Matcher::default();
        let mut invaders = vec![invader(1, "cat"), invader(2, "perro")];
        matcher.mark(&mut invaders[0], BLUE);
        matcher.mark(&mut invaders[1], BLUE);

        let (outcome, gone) = matcher.evaluate(&vocab, &mut invaders, 1000, 500).unwrap();
        assert_eq!(outcome, PairOutcome::Rejected { a: 1, b: 2 });
        assert!(gone.is_empty());
        assert!(invaders.iter().all(|i| i.mark == MarkState::Rejected));
        assert!(matcher.marked().is_empty());

        assert!(matcher.apply_due_reverts(1499, &mut invaders).is_empty());
        assert_eq!(matcher.apply_due_reverts(1500, &mut invaders), vec![1, 2]);
        assert!(invaders.iter().all(|i| i.mark == MarkState::Unmarked));
        assert!(invaders.iter().all(|i| i.hp == 3));
        assert_eq!(matcher.pending_reverts(), 0);
    }

    #[test]
    fn test_cannot_mark_twice_or_retired() {
        let mut matcher = Matcher::default();
        let mut a = invader(1, "cat");
        assert!(matcher.mark(&mut a, BLUE));
        assert!(!matcher.mark(&mut a, BLUE));
        assert_eq!(matcher.marked(), &[1]);

        matcher.removed.insert("dog".into());
        let mut b = invader(2, "dog");
        assert!(!matcher.mark(&mut b, BLUE));
        assert_eq!(b.mark, MarkState::Unmarked);
    }

    #[test]
    fn test_forget_cancels_pending_revert() {
        let vocab = vocab();
        let mut matcher = Matcher::default();
        let mut invaders = vec![invader(1, "cat"), invader(2, "perro")];
        matcher.mark(&mut invaders[0], BLUE);
        matcher.mark(&mut invaders[1], BLUE);
        matcher.evaluate(&vocab, &mut invaders, 0, 500);

        invaders.remove(0);
        matcher.forget(1);
        assert_eq!(matcher.pending_reverts(), 1);
        assert_eq!(matcher.apply_due_reverts(500, &mut invaders), vec![2]);
    }

    #[test]
    fn test_forget_frees_buffer_slot() {
        let mut matcher = Matcher::default();
        let mut a = invader(1, "cat");
        matcher.mark(&mut a, BLUE);
        matcher.forget(1);
        assert!(matcher.marked().is_empty());
    }

    #[test]
    fn test_win_requires_every_pair() {
        let vocab = vocab();
        let mut matcher = Matcher::default();
        for text in ["cat", "gato", "dog"] {
            matcher.removed.insert(text.into());
        }
        assert!(!matcher.is_won(&vocab));
        matcher.removed.insert("perro".into());
        assert!(matcher.is_won(&vocab));
        assert_eq!(matcher.remaining_pairs(&vocab), 0);
    }
}
