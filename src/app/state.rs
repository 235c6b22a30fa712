//! Game session state machine
//!
//! `GameSession` owns one puzzle's lifecycle: the puzzle itself, the
//! player's chain, hint bookkeeping and the scored result. Every external
//! call goes out through a `Dispatcher` as an envelope tagged with the
//! session generation; replies from an older generation are dropped.

use crate::game::chain::{AppendOutcome, Chain};
use crate::game::hint::HintEngine;
use crate::game::scoring::{score_submission, GameResult};
use crate::game::validation::normalize_input;
use crate::game::{Difficulty, Puzzle};
use crate::service::{Dispatcher, Envelope, Request, Response, ServiceError};
use thiserror::Error;

pub const LOAD_FAILED: &str = "Failed to load puzzle. Please try again.";
pub const VALIDATE_FAILED: &str = "Failed to validate word. Please try again.";
pub const SUBMIT_FAILED: &str = "Failed to submit solution. Please try again.";
pub const HINT_FAILED: &str = "Failed to get hint.";

/// Where the session is in a puzzle's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a puzzle
    Loading,
    /// Building the chain
    Playing,
    /// Waiting for the submission verdict
    Submitting,
    /// Showing the scored result
    Results,
    /// The puzzle fetch failed; retry re-enters Loading
    LoadFailed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Loading => "Loading",
            Phase::Playing => "Playing",
            Phase::Submitting => "Submitting",
            Phase::Results => "Results",
            Phase::LoadFailed => "Load Failed",
        }
    }
}

/// Why a command was refused. A refused command changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("another request is in flight")]
    Busy,
    #[error("no puzzle is loaded")]
    NoPuzzle,
    #[error("not accepting moves right now")]
    NotPlaying,
    #[error("nothing to add")]
    EmptyInput,
    #[error("the chain is full")]
    ChainFull,
    #[error("the next word is already fully revealed")]
    HintsExhausted,
}

/// The single in-flight operation that makes the session busy
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingOp {
    Load,
    Validate { candidate: String },
    Submit,
    Hint { level: u32 },
}

/// One player's game, driven by commands and fed by `poll`
pub struct GameSession<D: Dispatcher> {
    dispatcher: D,
    /// Bumped on every new game; stamps outgoing envelopes
    generation: u64,
    phase: Phase,
    difficulty: Difficulty,
    puzzle: Option<Puzzle>,
    chain: Chain,
    hints: HintEngine,
    result: Option<GameResult>,
    /// Inline error for the player
    error: Option<String>,
    pending: Option<PendingOp>,
    /// Total games played, once the service has told us
    play_count: Option<u64>,
}

impl<D: Dispatcher> GameSession<D> {
    /// Create a session and immediately start loading a medium puzzle.
    pub fn new(dispatcher: D) -> Self {
        Self::with_difficulty(dispatcher, Difficulty::default())
    }

    /// Create a session and immediately start loading a puzzle.
    pub fn with_difficulty(dispatcher: D, difficulty: Difficulty) -> Self {
        let mut session = GameSession {
            dispatcher,
            generation: 0,
            phase: Phase::Loading,
            difficulty,
            puzzle: None,
            chain: Chain::new(),
            hints: HintEngine::new(),
            result: None,
            error: None,
            pending: None,
            play_count: None,
        };
        session.start_new_game(difficulty);
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn hints(&self) -> &HintEngine {
        &self.hints
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn play_count(&self) -> Option<u64> {
        self.play_count
    }

    #[cfg(test)]
    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// True while an operation is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// What the session is waiting on, for display
    pub fn busy_label(&self) -> Option<&'static str> {
        self.pending.as_ref().map(|op| match op {
            PendingOp::Load => "Loading puzzle...",
            PendingOp::Validate { .. } => "Checking word...",
            PendingOp::Submit => "Submitting...",
            PendingOp::Hint { .. } => "Finding a hint...",
        })
    }

    /// Discard the current game and fetch a new puzzle. Allowed in any
    /// phase, even while busy: anything still in flight becomes stale.
    pub fn start_new_game(&mut self, difficulty: Difficulty) {
        self.generation += 1;
        self.difficulty = difficulty;
        self.phase = Phase::Loading;
        self.puzzle = None;
        self.chain.clear();
        self.hints.reset();
        self.result = None;
        self.error = None;
        self.play_count = None;
        self.pending = Some(PendingOp::Load);

        log::info!(
            "new {} game (generation {})",
            difficulty,
            self.generation
        );
        self.send(Request::NewPuzzle { difficulty });
    }

    /// Load another puzzle at the current difficulty.
    pub fn retry(&mut self) {
        self.start_new_game(self.difficulty);
    }

    /// Normalize `raw` and ask the oracle whether it extends the chain.
    pub fn add_word(&mut self, raw: &str) -> Result<(), CommandError> {
        let start_word = self.playing_puzzle()?.start_word.clone();
        let candidate = normalize_input(raw).ok_or(CommandError::EmptyInput)?;
        if self.chain.is_full() {
            return Err(CommandError::ChainFull);
        }

        self.error = None;
        let chain = self.chain.conceptual(&start_word);
        self.pending = Some(PendingOp::Validate {
            candidate: candidate.clone(),
        });
        self.send(Request::ValidateWord {
            word: candidate,
            chain,
        });
        Ok(())
    }

    /// Undo the last accepted word. An empty chain is left as is.
    pub fn remove_last_word(&mut self) -> Result<(), CommandError> {
        if self.is_busy() {
            return Err(CommandError::Busy);
        }
        if self.phase != Phase::Playing {
            return Err(CommandError::NotPlaying);
        }

        if let Some(word) = self.chain.remove_last() {
            log::debug!("removed {}", word);
            self.hints.on_chain_changed();
            self.error = None;
        }
        Ok(())
    }

    /// Send the chain for judging. An empty chain may be submitted.
    pub fn submit_solution(&mut self) -> Result<(), CommandError> {
        let puzzle = self.playing_puzzle()?;
        let request = Request::Submit {
            start_word: puzzle.start_word.clone(),
            end_word: puzzle.end_word.clone(),
            path: self.chain.words().to_vec(),
        };

        self.error = None;
        self.phase = Phase::Submitting;
        self.pending = Some(PendingOp::Submit);
        self.send(request);
        Ok(())
    }

    /// Ask for the next reveal of the word after the chain's tail.
    pub fn get_hint(&mut self) -> Result<(), CommandError> {
        let puzzle = self.playing_puzzle()?;
        if self.hints.is_exhausted() {
            return Err(CommandError::HintsExhausted);
        }

        let level = self.hints.next_level();
        let request = Request::Hint {
            start_word: puzzle.start_word.clone(),
            end_word: puzzle.end_word.clone(),
            chain: self.chain.words().to_vec(),
            level,
        };

        self.error = None;
        self.pending = Some(PendingOp::Hint { level });
        self.send(request);
        Ok(())
    }

    /// Hide the displayed hint. Counters are kept.
    pub fn clear_hint(&mut self) {
        self.hints.clear();
    }

    /// Apply every reply that has arrived.
    pub fn poll(&mut self) {
        for reply in self.dispatcher.poll() {
            if reply.generation != self.generation {
                log::debug!(
                    "dropping stale reply from generation {} (now {})",
                    reply.generation,
                    self.generation
                );
                continue;
            }
            self.apply(reply.outcome);
        }
    }

    // Private helper methods

    /// The puzzle, if the session may take a move right now
    fn playing_puzzle(&self) -> Result<&Puzzle, CommandError> {
        if self.is_busy() {
            return Err(CommandError::Busy);
        }
        let puzzle = self.puzzle.as_ref().ok_or(CommandError::NoPuzzle)?;
        if self.phase != Phase::Playing {
            return Err(CommandError::NotPlaying);
        }
        Ok(puzzle)
    }

    fn send(&mut self, request: Request) {
        self.dispatcher.dispatch(Envelope {
            generation: self.generation,
            request,
        });
    }

    fn apply(&mut self, outcome: Result<Response, ServiceError>) {
        // Play count is fire-and-forget; it never holds the busy flag
        if let Ok(Response::PlayCount { total }) = outcome {
            self.play_count = Some(total);
            return;
        }

        let Some(op) = self.pending.take() else {
            if let Err(e) = outcome {
                log::debug!("play count unavailable: {}", e);
            }
            return;
        };

        match op {
            PendingOp::Load => self.on_puzzle(outcome),
            PendingOp::Validate { candidate } => self.on_word_verdict(&candidate, outcome),
            PendingOp::Submit => self.on_path_verdict(outcome),
            PendingOp::Hint { level } => self.on_hint(level, outcome),
        }
    }

    fn on_puzzle(&mut self, outcome: Result<Response, ServiceError>) {
        let puzzle = match outcome {
            Ok(Response::Puzzle(puzzle)) => puzzle,
            other => {
                log::warn!("puzzle load failed: {}", describe(&other));
                return self.fail_load();
            }
        };

        if let Err(reason) = puzzle.check() {
            log::warn!("rejecting malformed puzzle: {}", reason);
            return self.fail_load();
        }

        log::info!(
            "playing {} -> {} (optimal {})",
            puzzle.start_word,
            puzzle.end_word,
            puzzle.optimal_length
        );
        self.puzzle = Some(puzzle);
        self.phase = Phase::Playing;
    }

    fn fail_load(&mut self) {
        self.phase = Phase::LoadFailed;
        self.error = Some(LOAD_FAILED.to_string());
    }

    fn on_word_verdict(&mut self, candidate: &str, outcome: Result<Response, ServiceError>) {
        let verdict = match outcome {
            Ok(Response::WordVerdict(verdict)) => verdict,
            other => {
                log::warn!("validating {} failed: {}", candidate, describe(&other));
                self.error = Some(VALIDATE_FAILED.to_string());
                return;
            }
        };

        match self.chain.apply(candidate, &verdict) {
            AppendOutcome::Appended(word) => {
                log::info!("accepted {} ({} of 6)", word, self.chain.len());
                self.hints.on_chain_changed();
                self.error = None;
            }
            AppendOutcome::Rejected(message) => {
                log::info!("rejected {}: {}", candidate, message);
                self.error = Some(message);
            }
        }
    }

    fn on_path_verdict(&mut self, outcome: Result<Response, ServiceError>) {
        let scored = match (&outcome, &self.puzzle) {
            (Ok(Response::PathVerdict(verdict)), Some(puzzle)) => {
                Some(score_submission(puzzle, verdict))
            }
            _ => None,
        };

        let Some(result) = scored else {
            log::warn!("submission failed: {}", describe(&outcome));
            self.phase = Phase::Playing;
            self.error = Some(SUBMIT_FAILED.to_string());
            return;
        };

        log::info!(
            "scored {} ({}) for {} links against {}",
            result.score,
            result.band.label(),
            result.player_length,
            result.optimal_length
        );
        self.result = Some(result);
        self.phase = Phase::Results;
        self.send(Request::PlayCount);
    }

    fn on_hint(&mut self, level: u32, outcome: Result<Response, ServiceError>) {
        match outcome {
            Ok(Response::Hint(record)) => self.hints.record(level, record),
            other => {
                log::warn!("hint failed: {}", describe(&other));
                self.error = Some(HINT_FAILED.to_string());
            }
        }
    }
}

/// Log text for a reply that was not the one expected
fn describe(outcome: &Result<Response, ServiceError>) -> String {
    match outcome {
        Ok(response) => format!("unexpected response {:?}", response),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::hint::HintRecord;
    use crate::game::scoring::{PathVerdict, ScoreBand};
    use crate::game::validation::{RejectReason, WordVerdict};
    use crate::service::Reply;

    /// Records every envelope and hands back whatever the test queues
    #[derive(Default)]
    struct ScriptedDispatcher {
        sent: Vec<Envelope>,
        inbox: Vec<Reply>,
    }

    impl Dispatcher for ScriptedDispatcher {
        fn dispatch(&mut self, envelope: Envelope) {
            self.sent.push(envelope);
        }

        fn poll(&mut self) -> Vec<Reply> {
            std::mem::take(&mut self.inbox)
        }
    }

    type Session = GameSession<ScriptedDispatcher>;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn sun_to_money() -> Puzzle {
        Puzzle {
            start_word: "SUN".to_string(),
            end_word: "MONEY".to_string(),
            optimal_path: words(&["LIGHT", "DAY", "WORK"]),
            optimal_length: 4,
        }
    }

    /// Deliver a reply stamped with the session's current generation
    fn answer(session: &mut Session, outcome: Result<Response, ServiceError>) {
        let generation = session.generation;
        answer_as(session, generation, outcome);
    }

    fn answer_as(session: &mut Session, generation: u64, outcome: Result<Response, ServiceError>) {
        session.dispatcher.inbox.push(Reply {
            generation,
            outcome,
        });
        session.poll();
    }

    fn last_request(session: &Session) -> &Request {
        &session.dispatcher.sent.last().unwrap().request
    }

    fn sent_count(session: &Session) -> usize {
        session.dispatcher.sent.len()
    }

    fn playing() -> Session {
        let mut session = GameSession::new(ScriptedDispatcher::default());
        answer(&mut session, Ok(Response::Puzzle(sun_to_money())));
        assert_eq!(session.phase(), Phase::Playing);
        session
    }

    fn add_accepted(session: &mut Session, word: &str) {
        session.add_word(word).unwrap();
        answer(
            session,
            Ok(Response::WordVerdict(WordVerdict::accept(word.to_uppercase()))),
        );
    }

    #[test]
    fn test_new_session_loads_medium_puzzle() {
        let session = GameSession::new(ScriptedDispatcher::default());
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert!(session.is_busy());
        assert_eq!(
            last_request(&session),
            &Request::NewPuzzle {
                difficulty: Difficulty::Medium
            }
        );
    }

    #[test]
    fn test_load_success_enters_playing() {
        let session = playing();
        assert!(!session.is_busy());
        assert_eq!(session.puzzle(), Some(&sun_to_money()));
        assert!(session.chain().is_empty());
    }

    #[test]
    fn test_load_failure_and_retry() {
        let mut session = GameSession::new(ScriptedDispatcher::default());
        answer(&mut session, Err(ServiceError::Unavailable));
        assert_eq!(session.phase(), Phase::LoadFailed);
        assert_eq!(session.error(), Some(LOAD_FAILED));
        assert!(!session.is_busy());

        let before = session.generation;
        session.retry();
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.generation, before + 1);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_malformed_puzzle_is_a_load_failure() {
        let mut session = GameSession::new(ScriptedDispatcher::default());
        let mut puzzle = sun_to_money();
        puzzle.optimal_length = 2;
        answer(&mut session, Ok(Response::Puzzle(puzzle)));
        assert_eq!(session.phase(), Phase::LoadFailed);
        assert!(session.puzzle().is_none());
    }

    #[test]
    fn test_commands_rejected_without_puzzle() {
        let mut session = GameSession::new(ScriptedDispatcher::default());
        answer(&mut session, Err(ServiceError::NoPath));

        assert_eq!(session.add_word("LIGHT"), Err(CommandError::NoPuzzle));
        assert_eq!(session.submit_solution(), Err(CommandError::NoPuzzle));
        assert_eq!(session.get_hint(), Err(CommandError::NoPuzzle));
        assert_eq!(session.remove_last_word(), Err(CommandError::NotPlaying));
    }

    #[test]
    fn test_commands_rejected_while_busy() {
        let mut session = GameSession::new(ScriptedDispatcher::default());
        assert_eq!(session.add_word("LIGHT"), Err(CommandError::Busy));
        assert_eq!(session.submit_solution(), Err(CommandError::Busy));
        assert_eq!(session.get_hint(), Err(CommandError::Busy));
        assert_eq!(session.remove_last_word(), Err(CommandError::Busy));
        assert_eq!(sent_count(&session), 1);
    }

    #[test]
    fn test_empty_input_never_reaches_oracle() {
        let mut session = playing();
        let sent = sent_count(&session);
        assert_eq!(session.add_word("   "), Err(CommandError::EmptyInput));
        assert_eq!(sent_count(&session), sent);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_add_word_sends_normalized_word_and_prefixed_chain() {
        let mut session = playing();
        add_accepted(&mut session, "light");

        session.add_word("  day ").unwrap();
        assert_eq!(
            last_request(&session),
            &Request::ValidateWord {
                word: "DAY".to_string(),
                chain: words(&["SUN", "LIGHT"]),
            }
        );
        assert_eq!(session.busy_label(), Some("Checking word..."));
    }

    #[test]
    fn test_accepted_word_uses_canonical_form() {
        let mut session = playing();
        session.add_word("light").unwrap();
        answer(
            &mut session,
            Ok(Response::WordVerdict(WordVerdict::accept("Light"))),
        );
        assert_eq!(session.chain().words(), &words(&["Light"]));
        assert!(session.error().is_none());
    }

    #[test]
    fn test_rejected_word_sets_inline_error() {
        let mut session = playing();
        session.add_word("FISH").unwrap();
        answer(
            &mut session,
            Ok(Response::WordVerdict(WordVerdict::reject(
                RejectReason::NotConnected {
                    word: "FISH".to_string(),
                    previous: "SUN".to_string(),
                },
            ))),
        );
        assert!(session.chain().is_empty());
        assert_eq!(session.error(), Some("'FISH' is not connected to 'SUN'"));
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_validation_transport_failure() {
        let mut session = playing();
        session.add_word("LIGHT").unwrap();
        answer(&mut session, Err(ServiceError::Remote("down".to_string())));
        assert!(session.chain().is_empty());
        assert_eq!(session.error(), Some(VALIDATE_FAILED));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_full_chain_refuses_locally() {
        let mut session = playing();
        for word in ["A", "B", "C", "D", "E", "F"] {
            add_accepted(&mut session, word);
        }
        assert_eq!(session.chain().len(), 6);

        let sent = sent_count(&session);
        assert_eq!(session.add_word("G"), Err(CommandError::ChainFull));
        assert_eq!(sent_count(&session), sent);
    }

    #[test]
    fn test_hint_level_resets_on_append_and_remove() {
        let mut session = playing();
        session.get_hint().unwrap();
        answer(
            &mut session,
            Ok(Response::Hint(HintRecord::next_word("SUN", "LIGHT", 1, 4))),
        );
        assert_eq!(session.hints().level(), 1);
        assert!(session.hints().current().is_some());

        add_accepted(&mut session, "LIGHT");
        assert_eq!(session.hints().level(), 0);
        assert!(session.hints().current().is_none());

        session.get_hint().unwrap();
        answer(
            &mut session,
            Ok(Response::Hint(HintRecord::next_word("LIGHT", "DAY", 1, 3))),
        );
        assert_eq!(session.hints().level(), 1);

        session.remove_last_word().unwrap();
        assert_eq!(session.hints().level(), 0);
        assert_eq!(session.hints().total_used(), 2);
    }

    #[test]
    fn test_hint_request_carries_next_level_and_bare_chain() {
        let mut session = playing();
        add_accepted(&mut session, "LIGHT");
        session.get_hint().unwrap();
        answer(
            &mut session,
            Ok(Response::Hint(HintRecord::next_word("LIGHT", "DAY", 1, 3))),
        );

        session.get_hint().unwrap();
        assert_eq!(
            last_request(&session),
            &Request::Hint {
                start_word: "SUN".to_string(),
                end_word: "MONEY".to_string(),
                chain: words(&["LIGHT"]),
                level: 2,
            }
        );
    }

    #[test]
    fn test_fully_revealed_hint_blocks_more_hints() {
        let mut session = playing();
        session.get_hint().unwrap();
        answer(
            &mut session,
            Ok(Response::Hint(HintRecord::next_word("SUN", "DAY", 3, 3))),
        );
        assert_eq!(session.get_hint(), Err(CommandError::HintsExhausted));

        session.clear_hint();
        assert_eq!(session.get_hint(), Err(CommandError::HintsExhausted));
    }

    #[test]
    fn test_hint_failure_leaves_hint_state() {
        let mut session = playing();
        session.get_hint().unwrap();
        answer(&mut session, Err(ServiceError::Unavailable));
        assert_eq!(session.error(), Some(HINT_FAILED));
        assert_eq!(session.hints().level(), 0);
        assert_eq!(session.hints().total_used(), 0);
    }

    #[test]
    fn test_clear_hint_twice() {
        let mut session = playing();
        session.get_hint().unwrap();
        answer(
            &mut session,
            Ok(Response::Hint(HintRecord::next_word("SUN", "LIGHT", 1, 4))),
        );
        session.clear_hint();
        session.clear_hint();
        assert!(session.hints().current().is_none());
        assert_eq!(session.hints().total_used(), 1);
    }

    #[test]
    fn test_remove_on_empty_chain_is_noop() {
        let mut session = playing();
        assert_eq!(session.remove_last_word(), Ok(()));
        assert!(session.chain().is_empty());
    }

    #[test]
    fn test_submit_failure_rolls_back_to_playing() {
        let mut session = playing();
        add_accepted(&mut session, "LIGHT");
        session.submit_solution().unwrap();
        assert_eq!(session.phase(), Phase::Submitting);

        answer(&mut session, Err(ServiceError::Unavailable));
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.error(), Some(SUBMIT_FAILED));
        assert_eq!(session.chain().words(), &words(&["LIGHT"]));
        assert!(session.result().is_none());
    }

    #[test]
    fn test_stale_submission_is_ignored_after_new_game() {
        let mut session = playing();
        add_accepted(&mut session, "LIGHT");
        session.submit_solution().unwrap();
        let old_generation = session.generation;

        session.start_new_game(Difficulty::Hard);
        answer_as(
            &mut session,
            old_generation,
            Ok(Response::PathVerdict(PathVerdict {
                player_path: words(&["LIGHT"]),
                player_length: 2,
                connected: true,
            })),
        );

        assert!(session.result().is_none());
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.is_busy());
        assert_eq!(session.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_stale_validation_is_ignored_after_new_game() {
        let mut session = playing();
        session.add_word("LIGHT").unwrap();
        let old_generation = session.generation;

        session.start_new_game(Difficulty::Easy);
        answer(&mut session, Ok(Response::Puzzle(sun_to_money())));
        answer_as(
            &mut session,
            old_generation,
            Ok(Response::WordVerdict(WordVerdict::accept("LIGHT"))),
        );

        assert!(session.chain().is_empty());
        assert_eq!(session.phase(), Phase::Playing);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_stale_puzzle_is_ignored_after_new_game() {
        let mut session = GameSession::new(ScriptedDispatcher::default());
        let old_generation = session.generation;

        session.start_new_game(Difficulty::Hard);
        answer_as(
            &mut session,
            old_generation,
            Ok(Response::Puzzle(sun_to_money())),
        );

        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.puzzle().is_none());
        assert!(session.is_busy());

        // The current generation's puzzle still lands
        answer(&mut session, Ok(Response::Puzzle(sun_to_money())));
        assert_eq!(session.phase(), Phase::Playing);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_stale_hint_is_ignored_after_new_game() {
        let mut session = playing();
        session.get_hint().unwrap();
        let old_generation = session.generation;

        session.start_new_game(Difficulty::Medium);
        answer(&mut session, Ok(Response::Puzzle(sun_to_money())));
        answer_as(
            &mut session,
            old_generation,
            Ok(Response::Hint(HintRecord::next_word("SUN", "LIGHT", 1, 4))),
        );

        assert!(session.hints().current().is_none());
        assert_eq!(session.hints().total_used(), 0);
        assert_eq!(session.hints().level(), 0);
        assert_eq!(session.phase(), Phase::Playing);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_sun_to_money_end_to_end() {
        let mut session = playing();
        for word in ["LIGHT", "DAY", "WORK"] {
            add_accepted(&mut session, word);
        }
        assert_eq!(session.chain().words(), &words(&["LIGHT", "DAY", "WORK"]));

        session.submit_solution().unwrap();
        assert_eq!(
            last_request(&session),
            &Request::Submit {
                start_word: "SUN".to_string(),
                end_word: "MONEY".to_string(),
                path: words(&["LIGHT", "DAY", "WORK"]),
            }
        );
        answer(
            &mut session,
            Ok(Response::PathVerdict(PathVerdict {
                player_path: words(&["LIGHT", "DAY", "WORK"]),
                player_length: 4,
                connected: true,
            })),
        );

        assert_eq!(session.phase(), Phase::Results);
        let result = session.result().unwrap();
        assert_eq!(result.player_length, 4);
        assert_eq!(result.score, 100);
        assert_eq!(result.band, ScoreBand::MatchedOptimal);
        assert_eq!(result.band.message(), "You matched the optimal path.");

        // Entering results asks for the play count without going busy
        assert_eq!(last_request(&session), &Request::PlayCount);
        assert!(!session.is_busy());
        answer(&mut session, Ok(Response::PlayCount { total: 12 }));
        assert_eq!(session.play_count(), Some(12));
    }

    #[test]
    fn test_empty_chain_can_be_submitted() {
        let mut session = playing();
        session.submit_solution().unwrap();
        answer(
            &mut session,
            Ok(Response::PathVerdict(PathVerdict {
                player_path: Vec::new(),
                player_length: 0,
                connected: false,
            })),
        );
        let result = session.result().unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.band, ScoreBand::Disconnected { connected_links: 0 });
    }

    #[test]
    fn test_play_count_error_is_swallowed() {
        let mut session = playing();
        session.submit_solution().unwrap();
        answer(
            &mut session,
            Ok(Response::PathVerdict(PathVerdict {
                player_path: Vec::new(),
                player_length: 1,
                connected: true,
            })),
        );
        answer(&mut session, Err(ServiceError::Unavailable));

        assert_eq!(session.phase(), Phase::Results);
        assert!(session.error().is_none());
        assert!(session.play_count().is_none());
    }

    #[test]
    fn test_moves_rejected_on_results_screen() {
        let mut session = playing();
        session.submit_solution().unwrap();
        answer(
            &mut session,
            Ok(Response::PathVerdict(PathVerdict {
                player_path: Vec::new(),
                player_length: 1,
                connected: true,
            })),
        );

        assert_eq!(session.add_word("LIGHT"), Err(CommandError::NotPlaying));
        assert_eq!(session.get_hint(), Err(CommandError::NotPlaying));
        assert_eq!(session.submit_solution(), Err(CommandError::NotPlaying));
        assert_eq!(session.remove_last_word(), Err(CommandError::NotPlaying));
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut session = playing();
        add_accepted(&mut session, "LIGHT");
        session.get_hint().unwrap();
        answer(
            &mut session,
            Ok(Response::Hint(HintRecord::next_word("LIGHT", "DAY", 1, 3))),
        );

        session.start_new_game(Difficulty::Easy);
        assert!(session.chain().is_empty());
        assert!(session.puzzle().is_none());
        assert_eq!(session.hints().total_used(), 0);
        assert!(session.hints().current().is_none());
        assert_eq!(
            last_request(&session),
            &Request::NewPuzzle {
                difficulty: Difficulty::Easy
            }
        );
    }

    #[test]
    fn test_unexpected_response_kind_is_a_failure() {
        let mut session = playing();
        session.add_word("LIGHT").unwrap();
        answer(&mut session, Ok(Response::Puzzle(sun_to_money())));
        assert_eq!(session.error(), Some(VALIDATE_FAILED));
        assert!(session.chain().is_empty());
    }
}
