//! Service protocol message types
//!
//! Simple length-prefixed JSON messages over TCP: a 4-byte big-endian
//! length, then a `serde_json` body.

use super::ServiceError;
use crate::game::hint::HintRecord;
use crate::game::scoring::PathVerdict;
use crate::game::validation::WordVerdict;
use crate::game::{Difficulty, Puzzle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// Largest frame body accepted
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Calls the game makes on a word service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    NewPuzzle {
        difficulty: Difficulty,
    },
    /// `chain` is start-word-prefixed
    ValidateWord {
        word: String,
        chain: Vec<String>,
    },
    Submit {
        start_word: String,
        end_word: String,
        path: Vec<String>,
    },
    /// `chain` holds intermediate words only
    Hint {
        start_word: String,
        end_word: String,
        chain: Vec<String>,
        level: u32,
    },
    PlayCount,
}

impl Request {
    /// Short name for logging
    pub fn label(&self) -> &'static str {
        match self {
            Request::NewPuzzle { .. } => "new_puzzle",
            Request::ValidateWord { .. } => "validate_word",
            Request::Submit { .. } => "submit",
            Request::Hint { .. } => "hint",
            Request::PlayCount => "play_count",
        }
    }
}

/// Successful answers, one per request kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Puzzle(Puzzle),
    WordVerdict(WordVerdict),
    PathVerdict(PathVerdict),
    Hint(HintRecord),
    PlayCount { total: u64 },
}

/// A request tagged with the session generation that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub generation: u64,
    pub request: Request,
}

/// The outcome of an envelope, carrying the same generation
#[derive(Debug)]
pub struct Reply {
    pub generation: u64,
    pub outcome: Result<Response, ServiceError>,
}

/// What a remote service writes back for each request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WireReply {
    Ok { response: Response },
    Error { message: String },
}

impl WireReply {
    pub fn into_result(self) -> Result<Response, ServiceError> {
        match self {
            WireReply::Ok { response } => Ok(response),
            WireReply::Error { message } => Err(ServiceError::Remote(message)),
        }
    }
}

impl From<Result<Response, ServiceError>> for WireReply {
    fn from(outcome: Result<Response, ServiceError>) -> Self {
        match outcome {
            Ok(response) => WireReply::Ok { response },
            Err(e) => WireReply::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Write one length-prefixed JSON frame
pub fn write_frame<W: Write, T: Serialize>(stream: &mut W, value: &T) -> Result<(), ServiceError> {
    let body = serde_json::to_vec(value)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(ServiceError::Protocol("message too large".to_string()));
    }
    let len = body.len() as u32;
    stream.write_all(&len.to_be_bytes())?;
    stream.write_all(&body)?;
    stream.flush()?;
    Ok(())
}

/// Read one length-prefixed JSON frame
pub fn read_frame<R: Read, T: DeserializeOwned>(stream: &mut R) -> Result<T, ServiceError> {
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > MAX_FRAME_LEN {
        return Err(ServiceError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            "message too large",
        )));
    }

    let mut body = vec![0u8; len];
    stream.read_exact(&mut body)?;
    Ok(serde_json::from_slice(&body)?)
}
