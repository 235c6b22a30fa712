//! Word validation for chain building
//!
//! Local checks happen before anything leaves the session:
//! - Input is trimmed and upper-cased
//! - Empty input is rejected outright
//!
//! Everything else (known word, duplicates, adjacency) is decided by the
//! word-link oracle and arrives here as a [`WordVerdict`].

use serde::{Deserialize, Serialize};

/// Normalize raw player input into the form sent to the oracle.
/// Returns `None` if nothing is left after trimming.
pub fn normalize_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Why the oracle refused a word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum RejectReason {
    /// The chain already holds the maximum number of words
    MaxLength,
    /// Word is not in the word graph
    WordNotFound { word: String },
    /// Word already appears earlier in the chain
    DuplicateWord { word: String },
    /// Word is not linked to the previous word
    NotConnected { word: String, previous: String },
    /// Anything the oracle reports that has no dedicated variant
    Other { message: String },
}

impl RejectReason {
    /// Returns a user-friendly error message
    pub fn message(&self) -> String {
        match self {
            RejectReason::MaxLength => "Maximum chain length (6) reached".to_string(),
            RejectReason::WordNotFound { word } => {
                format!("'{}' is not in our word database", word)
            }
            RejectReason::DuplicateWord { word } => format!("'{}' has already been used", word),
            RejectReason::NotConnected { word, previous } => {
                format!("'{}' is not connected to '{}'", word, previous)
            }
            RejectReason::Other { message } => message.clone(),
        }
    }
}

/// The oracle's answer for one candidate word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordVerdict {
    pub accepted: bool,
    /// Normalized form to store in the chain (present when accepted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl WordVerdict {
    /// An acceptance carrying the canonical form of the word
    pub fn accept(canonical_word: impl Into<String>) -> Self {
        WordVerdict {
            accepted: true,
            canonical_word: Some(canonical_word.into()),
            reason: None,
        }
    }

    /// A rejection with its reason
    pub fn reject(reason: RejectReason) -> Self {
        WordVerdict {
            accepted: false,
            canonical_word: None,
            reason: Some(reason),
        }
    }

    /// Message to show the player when the word was refused
    pub fn rejection_message(&self) -> String {
        match &self.reason {
            Some(reason) => reason.message(),
            None => "Invalid word".to_string(),
        }
    }
}
