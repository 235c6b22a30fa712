//! Scoring and path alignment
//!
//! A submission lands in exactly one of four bands, checked in order:
//! 1. Disconnected: 10 points per link that follows the optimal route
//! 2. Shorter than optimal: a fixed 110
//! 3. Same length as optimal: 100
//! 4. Longer: 100 minus 10 per extra step, never below 50
//!
//! Connectivity itself is decided upstream by the path validator; this
//! module only scores.

use super::{Puzzle, MAX_CHAIN_LENGTH};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score for finding a path shorter than the reference
pub const SCORE_BEAT_OPTIMAL: u32 = 110;
/// Score for matching the reference length
pub const SCORE_PERFECT: u32 = 100;
/// Lowest score for any connected path
pub const SCORE_COMPLETED: u32 = 50;
/// Points lost per step beyond optimal
pub const STEP_PENALTY: u32 = 10;
/// Points per optimal-route link traced by a broken chain
pub const LINK_CREDIT: u32 = 10;

/// The path validator's judgement of a submitted chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathVerdict {
    /// Intermediate words as the validator saw them
    pub player_path: Vec<String>,
    /// Links walked when connected, 0 otherwise
    pub player_length: u32,
    pub connected: bool,
}

/// Outcome band of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "band", rename_all = "snake_case")]
pub enum ScoreBand {
    /// Connected and shorter than the reference path
    BeatOptimal { saved: u32 },
    /// Connected with exactly the reference length
    MatchedOptimal,
    /// Connected but `extra` steps longer than the reference
    Longer { extra: u32 },
    /// Never connected; `connected_links` pairs followed the reference route
    Disconnected { connected_links: u32 },
}

impl ScoreBand {
    /// Pick the band for a submission. `connected_links` only matters for a
    /// disconnected chain.
    pub fn classify(
        player_length: u32,
        optimal_length: u32,
        connected: bool,
        connected_links: u32,
    ) -> Self {
        if !connected || player_length == 0 {
            return ScoreBand::Disconnected { connected_links };
        }
        if player_length < optimal_length {
            ScoreBand::BeatOptimal {
                saved: optimal_length - player_length,
            }
        } else if player_length == optimal_length {
            ScoreBand::MatchedOptimal
        } else {
            ScoreBand::Longer {
                extra: player_length - optimal_length,
            }
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            ScoreBand::BeatOptimal { .. } => SCORE_BEAT_OPTIMAL,
            ScoreBand::MatchedOptimal => SCORE_PERFECT,
            ScoreBand::Longer { extra } => SCORE_PERFECT
                .saturating_sub(extra.saturating_mul(STEP_PENALTY))
                .max(SCORE_COMPLETED),
            ScoreBand::Disconnected { connected_links } => {
                connected_links.saturating_mul(LINK_CREDIT)
            }
        }
    }

    /// Whether the chain reached the goal at all
    pub fn is_connected(&self) -> bool {
        !matches!(self, ScoreBand::Disconnected { .. })
    }

    /// Short headline for the results screen
    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::BeatOptimal { .. } => "YOU BEAT THE ALGORITHM!",
            ScoreBand::MatchedOptimal => "PERFECT",
            ScoreBand::Longer { .. } => match self.score() {
                90.. => "EXCELLENT",
                80..=89 => "GREAT",
                70..=79 => "GOOD",
                60..=69 => "NICE",
                _ => "COMPLETED",
            },
            ScoreBand::Disconnected { .. } => "PATH NOT CONNECTED",
        }
    }

    /// One-sentence explanation of the result
    pub fn message(&self) -> String {
        match self {
            ScoreBand::BeatOptimal { saved } => format!(
                "You found a path {} step{} shorter than the algorithm!",
                saved,
                plural(*saved)
            ),
            ScoreBand::MatchedOptimal => "You matched the optimal path.".to_string(),
            ScoreBand::Longer { extra } => {
                format!("{} step{} longer than optimal.", extra, plural(*extra))
            }
            ScoreBand::Disconnected { connected_links: 0 } => {
                "Your chain didn't connect the words. One or more words weren't linked."
                    .to_string()
            }
            ScoreBand::Disconnected { connected_links } => format!(
                "Your chain didn't connect the words, but {} link{} followed the optimal route.",
                connected_links,
                plural(*connected_links)
            ),
        }
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Count the links of the attempted sequence `[start, ...player_path, end]`
/// whose two words sit at consecutive positions, in route order, of the
/// reference route `[start, ...optimal_path, end]`.
pub fn count_connected_links(
    start_word: &str,
    end_word: &str,
    player_path: &[String],
    optimal_path: &[String],
) -> u32 {
    let reference: HashMap<String, usize> = std::iter::once(start_word)
        .chain(optimal_path.iter().map(String::as_str))
        .chain(std::iter::once(end_word))
        .enumerate()
        .map(|(i, word)| (word.to_uppercase(), i))
        .collect();

    let attempted: Vec<String> = std::iter::once(start_word)
        .chain(player_path.iter().map(String::as_str))
        .chain(std::iter::once(end_word))
        .map(str::to_uppercase)
        .collect();

    attempted
        .windows(2)
        .filter(|pair| {
            match (reference.get(&pair[0]), reference.get(&pair[1])) {
                (Some(&a), Some(&b)) => b == a + 1,
                _ => false,
            }
        })
        .count() as u32
}

/// A scored submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub start_word: String,
    pub end_word: String,
    pub player_path: Vec<String>,
    pub optimal_path: Vec<String>,
    pub player_length: u32,
    pub optimal_length: u32,
    pub score: u32,
    pub band: ScoreBand,
}

/// Score a validated submission against the puzzle's reference route.
pub fn score_submission(puzzle: &Puzzle, verdict: &PathVerdict) -> GameResult {
    let connected_links = if verdict.connected && verdict.player_length > 0 {
        0
    } else {
        count_connected_links(
            &puzzle.start_word,
            &puzzle.end_word,
            &verdict.player_path,
            &puzzle.optimal_path,
        )
    };

    let band = ScoreBand::classify(
        verdict.player_length,
        puzzle.optimal_length,
        verdict.connected,
        connected_links,
    );
    let player_length = if band.is_connected() {
        verdict.player_length
    } else {
        0
    };

    GameResult {
        start_word: puzzle.start_word.clone(),
        end_word: puzzle.end_word.clone(),
        player_path: verdict.player_path.clone(),
        optimal_path: puzzle.optimal_path.clone(),
        player_length,
        optimal_length: puzzle.optimal_length,
        score: band.score(),
        band,
    }
}

/// Plain-text summary of a result, with one grid cell per step.
pub fn share_text(result: &GameResult) -> String {
    let attempted_steps = if result.band.is_connected() {
        result.player_length as usize
    } else {
        result.player_path.len() + 1
    };

    let grid: String = (0..MAX_CHAIN_LENGTH)
        .map(|i| {
            if i >= attempted_steps {
                '⬜'
            } else {
                match result.band {
                    ScoreBand::Disconnected { .. } => '🟥',
                    ScoreBand::BeatOptimal { .. } => '🟪',
                    ScoreBand::MatchedOptimal => '🟩',
                    ScoreBand::Longer { .. } if i < result.optimal_length as usize => '🟨',
                    ScoreBand::Longer { .. } => '🟧',
                }
            }
        })
        .collect();

    let status = match result.band {
        ScoreBand::Disconnected { .. } => "Broken chain".to_string(),
        ScoreBand::BeatOptimal { .. } => "Beat the algorithm!".to_string(),
        ScoreBand::MatchedOptimal => "Perfect!".to_string(),
        ScoreBand::Longer { .. } => {
            format!("{}/{} steps", result.player_length, result.optimal_length)
        }
    };

    format!(
        "6 DEGREES\n{} -> {}\n{}\n{}\nScore: {}/{}",
        result.start_word, result.end_word, grid, status, result.score, SCORE_BEAT_OPTIMAL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn connected_score(player_length: u32, optimal_length: u32) -> u32 {
        ScoreBand::classify(player_length, optimal_length, true, 0).score()
    }

    fn sun_to_money() -> Puzzle {
        Puzzle {
            start_word: "SUN".to_string(),
            end_word: "MONEY".to_string(),
            optimal_path: words(&["LIGHT", "DAY", "WORK"]),
            optimal_length: 4,
        }
    }

    #[test]
    fn test_score_beat_algorithm() {
        assert_eq!(connected_score(3, 4), 110);
        assert_eq!(connected_score(1, 4), 110);
    }

    #[test]
    fn test_score_perfect() {
        assert_eq!(connected_score(4, 4), 100);
    }

    #[test]
    fn test_score_longer_paths() {
        assert_eq!(connected_score(5, 4), 90);
        assert_eq!(connected_score(6, 4), 80);
        assert_eq!(connected_score(7, 4), 70);
        assert_eq!(connected_score(8, 4), 60);
        assert_eq!(connected_score(9, 4), 50);
    }

    #[test]
    fn test_score_floor() {
        assert_eq!(connected_score(10, 4), 50);
        assert_eq!(connected_score(40, 1), 50);
    }

    #[test]
    fn test_zero_length_is_disconnected_even_if_flagged_connected() {
        let band = ScoreBand::classify(0, 4, true, 2);
        assert_eq!(band, ScoreBand::Disconnected { connected_links: 2 });
        assert_eq!(band.score(), 20);
    }

    #[test]
    fn test_partial_credit_counts_route_links() {
        // SUN-LIGHT and LIGHT-DAY follow the route; DAY-FISH and FISH-MONEY don't
        let links = count_connected_links(
            "SUN",
            "MONEY",
            &words(&["LIGHT", "DAY", "FISH"]),
            &words(&["LIGHT", "DAY", "WORK"]),
        );
        assert_eq!(links, 2);
    }

    #[test]
    fn test_partial_credit_none_when_off_route() {
        let links = count_connected_links("A", "B", &words(&["X"]), &words(&["Y", "Z"]));
        assert_eq!(links, 0);
        assert_eq!(ScoreBand::classify(0, 3, false, links).score(), 0);
    }

    #[test]
    fn test_partial_credit_ignores_reversed_pairs() {
        let links = count_connected_links(
            "SUN",
            "MONEY",
            &words(&["DAY", "LIGHT"]),
            &words(&["LIGHT", "DAY", "WORK"]),
        );
        assert_eq!(links, 0);
    }

    #[test]
    fn test_partial_credit_is_case_insensitive() {
        let links = count_connected_links(
            "sun",
            "money",
            &words(&["light"]),
            &words(&["LIGHT", "DAY", "WORK"]),
        );
        assert_eq!(links, 1);
    }

    #[test]
    fn test_labels_follow_score() {
        assert_eq!(ScoreBand::classify(3, 4, true, 0).label(), "YOU BEAT THE ALGORITHM!");
        assert_eq!(ScoreBand::classify(4, 4, true, 0).label(), "PERFECT");
        assert_eq!(ScoreBand::classify(5, 4, true, 0).label(), "EXCELLENT");
        assert_eq!(ScoreBand::classify(6, 4, true, 0).label(), "GREAT");
        assert_eq!(ScoreBand::classify(7, 4, true, 0).label(), "GOOD");
        assert_eq!(ScoreBand::classify(8, 4, true, 0).label(), "NICE");
        assert_eq!(ScoreBand::classify(12, 4, true, 0).label(), "COMPLETED");
        assert_eq!(ScoreBand::classify(0, 4, false, 1).label(), "PATH NOT CONNECTED");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ScoreBand::BeatOptimal { saved: 1 }.message(),
            "You found a path 1 step shorter than the algorithm!"
        );
        assert_eq!(
            ScoreBand::MatchedOptimal.message(),
            "You matched the optimal path."
        );
        assert_eq!(
            ScoreBand::Longer { extra: 2 }.message(),
            "2 steps longer than optimal."
        );
        assert!(ScoreBand::Disconnected { connected_links: 2 }
            .message()
            .contains("2 links followed"));
    }

    #[test]
    fn test_score_submission_matched() {
        let verdict = PathVerdict {
            player_path: words(&["LIGHT", "DAY", "WORK"]),
            player_length: 4,
            connected: true,
        };
        let result = score_submission(&sun_to_money(), &verdict);
        assert_eq!(result.score, 100);
        assert_eq!(result.player_length, 4);
        assert_eq!(result.band, ScoreBand::MatchedOptimal);
    }

    #[test]
    fn test_score_submission_disconnected_reports_zero_length() {
        let verdict = PathVerdict {
            player_path: words(&["LIGHT", "FISH"]),
            player_length: 0,
            connected: false,
        };
        let result = score_submission(&sun_to_money(), &verdict);
        assert_eq!(result.player_length, 0);
        assert_eq!(result.band, ScoreBand::Disconnected { connected_links: 1 });
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_share_text_grid() {
        let verdict = PathVerdict {
            player_path: words(&["LIGHT", "DAY", "WORK"]),
            player_length: 4,
            connected: true,
        };
        let result = score_submission(&sun_to_money(), &verdict);
        let text = share_text(&result);

        assert!(text.contains("SUN -> MONEY"));
        assert!(text.contains("🟩🟩🟩🟩⬜⬜"));
        assert!(text.contains("Perfect!"));
        assert!(text.ends_with("Score: 100/110"));
    }

    #[test]
    fn test_share_text_longer_path_marks_extra_steps() {
        let puzzle = Puzzle {
            start_word: "A".to_string(),
            end_word: "D".to_string(),
            optimal_path: words(&["B", "C"]),
            optimal_length: 3,
        };
        let verdict = PathVerdict {
            player_path: words(&["X", "Y", "Z", "W"]),
            player_length: 5,
            connected: true,
        };
        let text = share_text(&score_submission(&puzzle, &verdict));
        assert!(text.contains("🟨🟨🟨🟧🟧⬜"));
        assert!(text.contains("5/3 steps"));
    }
}
