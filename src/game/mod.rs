//! Game rules: puzzles, the word chain, hints, scoring

pub mod chain;
pub mod hint;
pub mod scoring;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of intermediate words a player may place between the
/// start and goal words.
pub const MAX_CHAIN_LENGTH: usize = 6;

/// Puzzle difficulty, expressed as the optimal path length range the
/// puzzle source draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Get all difficulties in menu order
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    /// Get the display label for this difficulty
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Inclusive range of optimal link counts for puzzles of this difficulty.
    pub fn link_range(&self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (2, 3),
            Difficulty::Medium => (3, 4),
            Difficulty::Hard => (4, 5),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                other
            )),
        }
    }
}

/// A puzzle fetched from the puzzle source.
///
/// `optimal_path` holds only the intermediate words of the reference route,
/// so it always has `optimal_length - 1` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub start_word: String,
    pub end_word: String,
    pub optimal_path: Vec<String>,
    pub optimal_length: u32,
}

impl Puzzle {
    /// Check the structural invariants of a fetched puzzle.
    /// Returns a description of the first broken invariant.
    pub fn check(&self) -> Result<(), String> {
        if self.start_word.trim().is_empty() || self.end_word.trim().is_empty() {
            return Err("puzzle is missing its start or goal word".to_string());
        }
        if self.optimal_length < 1 {
            return Err(format!(
                "optimal length must be at least 1, got {}",
                self.optimal_length
            ));
        }
        if self.optimal_path.len() + 1 != self.optimal_length as usize {
            return Err(format!(
                "optimal path has {} intermediate words but optimal length is {}",
                self.optimal_path.len(),
                self.optimal_length
            ));
        }
        Ok(())
    }
}
