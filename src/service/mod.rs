//! External services: the word-graph contracts and their transports
//!
//! This module provides:
//! - `WordService`, one blocking method per call the game makes
//! - `ServiceWorker`, which runs a `WordService` off the UI thread
//! - `RemoteService`, length-prefixed JSON over TCP (--connect HOST:PORT)
//! - `OfflineService`, an embedded word graph with a local play log

pub mod offline;
pub mod protocol;
pub mod remote;
pub mod worker;

pub use offline::OfflineService;
pub use protocol::{Envelope, Reply, Request, Response};
pub use remote::RemoteService;
pub use worker::ServiceWorker;

use crate::game::hint::HintRecord;
use crate::game::scoring::PathVerdict;
use crate::game::validation::WordVerdict;
use crate::game::{Difficulty, Puzzle};
use crate::storage::StorageError;
use thiserror::Error;

/// Errors from any external call
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connection or stream failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed or unexpected payload
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The far side reported an error
    #[error("service error: {0}")]
    Remote(String),
    /// The worker thread is gone
    #[error("service unavailable")]
    Unavailable,
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// No puzzle could be generated from the word graph
    #[error("no connected word pair found")]
    NoPath,
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Protocol(e.to_string())
    }
}

/// A word-graph backend: puzzle source, word-link oracle, path validator
/// and hint oracle in one.
pub trait WordService: Send {
    fn new_puzzle(&mut self, difficulty: Difficulty) -> Result<Puzzle, ServiceError>;

    /// Judge `word` as the next link of `chain` (start word first).
    fn validate_word(&mut self, word: &str, chain: &[String]) -> Result<WordVerdict, ServiceError>;

    /// Judge a full attempt; `path` holds the intermediate words only.
    fn submit(
        &mut self,
        start_word: &str,
        end_word: &str,
        path: &[String],
    ) -> Result<PathVerdict, ServiceError>;

    /// Hint for the word after the last one in `chain` (intermediate words only).
    fn hint(
        &mut self,
        start_word: &str,
        end_word: &str,
        chain: &[String],
        level: u32,
    ) -> Result<HintRecord, ServiceError>;

    /// Total games played, for display
    fn play_count(&mut self) -> Result<u64, ServiceError>;
}

impl Request {
    /// Run this request against a service.
    pub fn execute(self, service: &mut dyn WordService) -> Result<Response, ServiceError> {
        match self {
            Request::NewPuzzle { difficulty } => service.new_puzzle(difficulty).map(Response::Puzzle),
            Request::ValidateWord { word, chain } => service
                .validate_word(&word, &chain)
                .map(Response::WordVerdict),
            Request::Submit {
                start_word,
                end_word,
                path,
            } => service
                .submit(&start_word, &end_word, &path)
                .map(Response::PathVerdict),
            Request::Hint {
                start_word,
                end_word,
                chain,
                level,
            } => service
                .hint(&start_word, &end_word, &chain, level)
                .map(Response::Hint),
            Request::PlayCount => service
                .play_count()
                .map(|total| Response::PlayCount { total }),
        }
    }
}

/// How the session reaches a service. Replies come back through `poll`,
/// tagged with the generation of the envelope that caused them.
pub trait Dispatcher {
    fn dispatch(&mut self, envelope: Envelope);

    /// Drain every reply that has arrived (non-blocking)
    fn poll(&mut self) -> Vec<Reply>;
}
