//! The player's word chain
//!
//! Holds the accepted intermediate words in order. The start word is
//! implicit and the goal word is only added when a solution is submitted.

use super::validation::{RejectReason, WordVerdict};
use super::MAX_CHAIN_LENGTH;

/// Result of applying an oracle verdict to the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Word stored (canonical form)
    Appended(String),
    /// Chain left unchanged, with the message to show the player
    Rejected(String),
}

/// Ordered list of accepted intermediate words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    words: Vec<String>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted words, oldest first
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True once no further word may be appended
    pub fn is_full(&self) -> bool {
        self.words.len() >= MAX_CHAIN_LENGTH
    }

    /// The last word a new word must link to (the start word for an empty chain)
    pub fn tail<'a>(&'a self, start_word: &'a str) -> &'a str {
        self.words.last().map(String::as_str).unwrap_or(start_word)
    }

    /// The chain as the oracle sees it: start word first, then every
    /// accepted word.
    pub fn conceptual(&self, start_word: &str) -> Vec<String> {
        let mut full = Vec::with_capacity(self.words.len() + 1);
        full.push(start_word.to_string());
        full.extend(self.words.iter().cloned());
        full
    }

    /// Apply the oracle's verdict for `candidate`.
    ///
    /// On acceptance the oracle's canonical form is stored, falling back to
    /// the (already normalized) candidate if the oracle sent none. A full
    /// chain never grows, whatever the verdict says.
    pub fn apply(&mut self, candidate: &str, verdict: &WordVerdict) -> AppendOutcome {
        if self.is_full() {
            return AppendOutcome::Rejected(RejectReason::MaxLength.message());
        }
        if !verdict.accepted {
            return AppendOutcome::Rejected(verdict.rejection_message());
        }

        let word = verdict
            .canonical_word
            .clone()
            .unwrap_or_else(|| candidate.to_string());
        self.words.push(word.clone());
        AppendOutcome::Appended(word)
    }

    /// Pop the last word. Does nothing on an empty chain.
    pub fn remove_last(&mut self) -> Option<String> {
        self.words.pop()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}
