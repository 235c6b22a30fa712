//! Offline word service
//!
//! Embeds an association list at build time and answers every call
//! locally: puzzles come from breadth-first search over the word graph,
//! submissions are scored and written to the play log.

use super::{ServiceError, WordService};
use crate::game::hint::HintRecord;
use crate::game::scoring::{score_submission, PathVerdict};
use crate::game::validation::{RejectReason, WordVerdict};
use crate::game::{Difficulty, Puzzle, MAX_CHAIN_LENGTH};
use crate::storage::Storage;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Embedded association list, one `WORD WORD` link per line
static ASSOCIATIONS_DATA: &str = include_str!("../../data/associations.txt");

/// Word graph built from the embedded list on first use
static EMBEDDED_GRAPH: Lazy<WordGraph> = Lazy::new(|| WordGraph::parse(ASSOCIATIONS_DATA));

/// Searches give up beyond this many links
pub const MAX_PATH_LINKS: usize = 6;

/// Random endpoint pairs tried before falling back to a scan
const GENERATION_ATTEMPTS: usize = 100;

/// Undirected graph of uppercase words
#[derive(Debug, Clone, Default)]
pub struct WordGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl WordGraph {
    /// The graph built from the embedded association list
    pub fn embedded() -> &'static WordGraph {
        &EMBEDDED_GRAPH
    }

    /// Build a graph from `WORD WORD` lines. Blank lines, `#` comments,
    /// self-links and lines with fewer than two words are skipped.
    pub fn parse(text: &str) -> Self {
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(a), Some(b)) = (parts.next(), parts.next()) else {
                continue;
            };
            let (a, b) = (a.to_uppercase(), b.to_uppercase());
            if a == b {
                continue;
            }
            adjacency.entry(a.clone()).or_default().insert(b.clone());
            adjacency.entry(b).or_default().insert(a);
        }
        WordGraph { adjacency }
    }

    pub fn word_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected links
    pub fn connection_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Case-insensitive membership check
    pub fn contains(&self, word: &str) -> bool {
        self.adjacency.contains_key(&word.to_uppercase())
    }

    /// Whether two words share a direct link
    pub fn are_linked(&self, a: &str, b: &str) -> bool {
        self.adjacency
            .get(&a.to_uppercase())
            .is_some_and(|links| links.contains(&b.to_uppercase()))
    }

    /// Shortest route from `start` to `end`, both endpoints included.
    /// `None` if either word is unknown or the route is longer than
    /// `MAX_PATH_LINKS`.
    pub fn shortest_path(&self, start: &str, end: &str) -> Option<Vec<String>> {
        let (start, _) = self.adjacency.get_key_value(&start.to_uppercase())?;
        let (end, _) = self.adjacency.get_key_value(&end.to_uppercase())?;
        if start == end {
            return Some(vec![start.clone()]);
        }

        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::from([start.as_str()]);
        let mut frontier = vec![start.as_str()];

        for _ in 0..MAX_PATH_LINKS {
            let mut next = Vec::new();
            for &word in &frontier {
                for neighbor in self.adjacency.get(word).into_iter().flatten() {
                    let neighbor = neighbor.as_str();
                    if !seen.insert(neighbor) {
                        continue;
                    }
                    parents.insert(neighbor, word);
                    if neighbor == end {
                        return Some(rebuild_path(&parents, start, end));
                    }
                    next.push(neighbor);
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        None
    }

    /// Link counts from `start` to every word reachable within
    /// `MAX_PATH_LINKS`, excluding `start` itself.
    fn distances_from<'a>(&'a self, start: &'a str) -> BTreeMap<&'a str, usize> {
        let mut distances = BTreeMap::new();
        let mut seen: HashSet<&str> = HashSet::from([start]);
        let mut frontier = vec![start];

        for depth in 1..=MAX_PATH_LINKS {
            let mut next = Vec::new();
            for &word in &frontier {
                for neighbor in self.adjacency.get(word).into_iter().flatten() {
                    if seen.insert(neighbor.as_str()) {
                        distances.insert(neighbor.as_str(), depth);
                        next.push(neighbor.as_str());
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        distances
    }

    /// Pick a puzzle whose optimal length falls in the difficulty's range.
    ///
    /// Random endpoint pairs are tried first; if none fits, the graph is
    /// scanned in order for an in-range pair, then for any connected pair.
    pub fn generate_puzzle<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<Puzzle> {
        let (min_links, max_links) = difficulty.link_range();
        let words: Vec<&str> = self.adjacency.keys().map(String::as_str).collect();
        if words.len() < 2 {
            return None;
        }

        for _ in 0..GENERATION_ATTEMPTS {
            let (Some(&start), Some(&end)) = (words.choose(rng), words.choose(rng)) else {
                break;
            };
            if start == end {
                continue;
            }
            if let Some(path) = self.shortest_path(start, end) {
                if (min_links..=max_links).contains(&(path.len() - 1)) {
                    return puzzle_from_path(path);
                }
            }
        }

        log::debug!(
            "no {} puzzle after {} random attempts, scanning",
            difficulty,
            GENERATION_ATTEMPTS
        );

        let mut any_connected = None;
        for &start in &words {
            let distances = self.distances_from(start);
            if let Some((&end, _)) = distances
                .iter()
                .find(|(_, links)| (min_links..=max_links).contains(*links))
            {
                return self.shortest_path(start, end).and_then(puzzle_from_path);
            }
            if any_connected.is_none() {
                any_connected = distances.keys().next().map(|&end| (start, end));
            }
        }

        let (start, end) = any_connected?;
        self.shortest_path(start, end).and_then(puzzle_from_path)
    }

    /// Judge `word` as the next link of `chain` (start word first).
    pub fn validate_word(&self, word: &str, chain: &[String]) -> WordVerdict {
        let word = word.trim().to_uppercase();

        // chain includes the start word, so its intermediates are len - 1
        if chain.len().saturating_sub(1) >= MAX_CHAIN_LENGTH {
            return WordVerdict::reject(RejectReason::MaxLength);
        }
        if !self.contains(&word) {
            return WordVerdict::reject(RejectReason::WordNotFound { word });
        }
        if chain.iter().any(|w| w.eq_ignore_ascii_case(&word)) {
            return WordVerdict::reject(RejectReason::DuplicateWord { word });
        }
        if let Some(previous) = chain.last() {
            if !self.are_linked(previous, &word) {
                return WordVerdict::reject(RejectReason::NotConnected {
                    word,
                    previous: previous.to_uppercase(),
                });
            }
        }
        WordVerdict::accept(word)
    }

    /// Whether `[start, ...path, end]` is a legal, fully linked chain.
    /// Up to `MAX_CHAIN_LENGTH` intermediate words, so at most eight words.
    pub fn is_connected_path(&self, full_path: &[String]) -> bool {
        if full_path.len() < 2 || full_path.len() > MAX_CHAIN_LENGTH + 2 {
            return false;
        }
        let unique: HashSet<String> = full_path.iter().map(|w| w.to_uppercase()).collect();
        if unique.len() != full_path.len() {
            return false;
        }
        full_path.iter().all(|w| self.contains(w))
            && full_path.windows(2).all(|pair| self.are_linked(&pair[0], &pair[1]))
    }

    /// Judge a full attempt against the graph.
    pub fn check_path(&self, start_word: &str, end_word: &str, path: &[String]) -> PathVerdict {
        let player_path: Vec<String> = path.iter().map(|w| w.to_uppercase()).collect();
        let mut full_path = Vec::with_capacity(player_path.len() + 2);
        full_path.push(start_word.to_uppercase());
        full_path.extend(player_path.iter().cloned());
        full_path.push(end_word.to_uppercase());

        let connected = self.is_connected_path(&full_path);
        PathVerdict {
            player_path,
            player_length: if connected {
                (full_path.len() - 1) as u32
            } else {
                0
            },
            connected,
        }
    }

    /// Hint for the word after `chain`'s last word (or `start_word`).
    pub fn hint(&self, start_word: &str, end_word: &str, chain: &[String], level: u32) -> HintRecord {
        let current = chain
            .last()
            .map(String::as_str)
            .unwrap_or(start_word)
            .to_uppercase();

        match self.shortest_path(&current, end_word) {
            Some(route) if route.len() > 1 => {
                HintRecord::next_word(&current, &route[1], level, (route.len() - 1) as u32)
            }
            _ => HintRecord::dead_end(level),
        }
    }
}

fn rebuild_path(parents: &HashMap<&str, &str>, start: &str, end: &str) -> Vec<String> {
    let mut path = vec![end.to_string()];
    let mut current = end;
    while current != start {
        match parents.get(current) {
            Some(&parent) => {
                path.push(parent.to_string());
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

fn puzzle_from_path(path: Vec<String>) -> Option<Puzzle> {
    let (start_word, rest) = path.split_first()?;
    let (end_word, middle) = rest.split_last()?;
    Some(Puzzle {
        start_word: start_word.clone(),
        end_word: end_word.clone(),
        optimal_path: middle.to_vec(),
        optimal_length: (path.len() - 1) as u32,
    })
}

/// A `WordService` answered entirely from a local word graph
pub struct OfflineService {
    graph: &'static WordGraph,
    rng: StdRng,
    /// Play log; `None` when recording is disabled
    storage: Option<Storage>,
}

impl OfflineService {
    /// Use the embedded graph, recording games to `storage` if given.
    pub fn new(storage: Option<Storage>) -> Self {
        Self::with_graph(WordGraph::embedded(), StdRng::from_os_rng(), storage)
    }

    pub fn with_graph(graph: &'static WordGraph, rng: StdRng, storage: Option<Storage>) -> Self {
        log::info!(
            "offline word graph ready: {} words, recording {}",
            graph.word_count(),
            if storage.is_some() { "on" } else { "off" }
        );
        OfflineService { graph, rng, storage }
    }
}

impl WordService for OfflineService {
    fn new_puzzle(&mut self, difficulty: Difficulty) -> Result<Puzzle, ServiceError> {
        let puzzle = self
            .graph
            .generate_puzzle(difficulty, &mut self.rng)
            .ok_or(ServiceError::NoPath)?;
        log::info!(
            "generated {} puzzle {} -> {} ({} links)",
            difficulty,
            puzzle.start_word,
            puzzle.end_word,
            puzzle.optimal_length
        );
        Ok(puzzle)
    }

    fn validate_word(&mut self, word: &str, chain: &[String]) -> Result<WordVerdict, ServiceError> {
        Ok(self.graph.validate_word(word, chain))
    }

    fn submit(
        &mut self,
        start_word: &str,
        end_word: &str,
        path: &[String],
    ) -> Result<PathVerdict, ServiceError> {
        let verdict = self.graph.check_path(start_word, end_word, path);

        if let Some(storage) = &self.storage {
            if let Some(reference) = self
                .graph
                .shortest_path(start_word, end_word)
                .and_then(puzzle_from_path)
            {
                // The verdict stands even if the play log is unwritable
                if let Err(e) = storage.record_game(&score_submission(&reference, &verdict)) {
                    log::warn!("could not record game: {}", e);
                }
            }
        }
        Ok(verdict)
    }

    fn hint(
        &mut self,
        start_word: &str,
        end_word: &str,
        chain: &[String],
        level: u32,
    ) -> Result<HintRecord, ServiceError> {
        Ok(self.graph.hint(start_word, end_word, chain, level))
    }

    fn play_count(&mut self) -> Result<u64, ServiceError> {
        match &self.storage {
            Some(storage) => Ok(storage.total_games()?),
            None => Ok(0),
        }
    }
}
