//! Progressive hints
//!
//! Each hint at the same chain position reveals one more letter of the next
//! word on the shortest remaining route. The level resets whenever the chain
//! changes length, since the "next word" is then a different word.

use serde::{Deserialize, Serialize};

/// What kind of hint the oracle produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    /// A (partially masked) next word on the route to the goal
    NextWord,
    /// No route from the current word; the player should backtrack
    NoPath,
}

/// A hint as shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRecord {
    pub kind: HintKind,
    /// Free-text guidance
    pub guidance: String,
    /// Next word with unrevealed letters replaced by `_`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revealed_letters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_length: Option<usize>,
    #[serde(default)]
    pub fully_revealed: bool,
    /// Links left from the current word to the goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_remaining: Option<u32>,
    pub hint_level: u32,
}

impl HintRecord {
    /// Build the hint for `next_word`, reached from `current_word`, at the
    /// given reveal level.
    pub fn next_word(current_word: &str, next_word: &str, level: u32, steps_remaining: u32) -> Self {
        let reveal = mask_word(next_word, level);

        let guidance = if level <= 1 {
            format!("Try a word connected to '{}'", current_word)
        } else if level == 2 {
            format!("The word starts with '{}...'", reveal.revealed)
        } else if reveal.fully_revealed {
            format!("The word is '{}'!", next_word)
        } else {
            format!("Getting warmer... '{}'", reveal.masked)
        };

        HintRecord {
            kind: HintKind::NextWord,
            guidance,
            masked_word: Some(reveal.masked),
            revealed_letters: Some(reveal.revealed),
            word_length: Some(reveal.length),
            fully_revealed: reveal.fully_revealed,
            steps_remaining: Some(steps_remaining),
            hint_level: level,
        }
    }

    /// The hint given when no route to the goal remains
    pub fn dead_end(level: u32) -> Self {
        HintRecord {
            kind: HintKind::NoPath,
            guidance: "Consider backtracking - this path may be a dead end".to_string(),
            masked_word: None,
            revealed_letters: None,
            word_length: None,
            fully_revealed: false,
            steps_remaining: None,
            hint_level: level,
        }
    }
}

/// A word with its first `level` letters revealed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub revealed: String,
    pub masked: String,
    pub length: usize,
    pub fully_revealed: bool,
}

/// Reveal the first `level` letters of `word` (capped at its length).
pub fn mask_word(word: &str, level: u32) -> Reveal {
    let length = word.chars().count();
    let shown = (level as usize).min(length);

    let revealed: String = word.chars().take(shown).collect();
    let mut masked = revealed.clone();
    masked.extend(std::iter::repeat('_').take(length - shown));

    Reveal {
        revealed,
        masked,
        length,
        fully_revealed: shown >= length,
    }
}

/// Hint bookkeeping for one game
#[derive(Debug, Clone, Default)]
pub struct HintEngine {
    /// Reveal level reached at the current chain position
    level: u32,
    /// Hints received this game, across all positions
    total_used: u32,
    /// Hint currently on display
    current: Option<HintRecord>,
    /// Set once the word at this position has been fully revealed
    exhausted: bool,
}

impl HintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn total_used(&self) -> u32 {
        self.total_used
    }

    pub fn current(&self) -> Option<&HintRecord> {
        self.current.as_ref()
    }

    /// True once every letter of the next word has been shown at this position
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Level to ask the oracle for on the next request
    pub fn next_level(&self) -> u32 {
        self.level + 1
    }

    /// Store a hint received for `level`.
    pub fn record(&mut self, level: u32, record: HintRecord) {
        self.level = level;
        self.total_used += 1;
        self.exhausted = record.fully_revealed;
        self.current = Some(record);
    }

    /// Hide the displayed hint; counters are untouched.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The chain grew or shrank: the next expected word changed.
    pub fn on_chain_changed(&mut self) {
        self.level = 0;
        self.exhausted = false;
        self.current = None;
    }

    /// Forget everything (new game).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
