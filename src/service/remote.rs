//! TCP client for a remote word-graph service

use super::protocol::{read_frame, write_frame, Request, Response, WireReply};
use super::{ServiceError, WordService};
use crate::game::hint::HintRecord;
use crate::game::scoring::PathVerdict;
use crate::game::validation::WordVerdict;
use crate::game::{Difficulty, Puzzle};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default port for the word-graph service
pub const DEFAULT_PORT: u16 = 55333;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// A word service reached over TCP, one request/reply exchange at a time.
///
/// The connection is opened lazily and dropped after any transport
/// failure, so the next call reconnects.
pub struct RemoteService {
    addr: SocketAddr,
    stream: Option<TcpStream>,
}

impl RemoteService {
    /// Connect to a service at the given address
    ///
    /// The address can be:
    /// - "IP:PORT" (e.g., "192.168.1.100:55333")
    /// - "IP" (uses default port 55333)
    /// - "hostname:PORT"
    /// - "hostname" (uses default port)
    pub fn connect(addr: &str) -> io::Result<Self> {
        let addr = parse_address(addr)?;
        let stream = open_stream(addr)?;
        log::info!("connected to word service at {}", addr);
        Ok(RemoteService {
            addr,
            stream: Some(stream),
        })
    }

    /// Get the service's address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn call(&mut self, request: &Request) -> Result<Response, ServiceError> {
        if self.stream.is_none() {
            log::info!("reconnecting to {}", self.addr);
            self.stream = Some(open_stream(self.addr)?);
        }

        let exchanged = match self.stream.as_mut() {
            Some(stream) => exchange(stream, request),
            None => Err(ServiceError::Unavailable),
        };

        match exchanged {
            Ok(reply) => reply.into_result(),
            Err(e) => {
                // Stream state is unknown after a failed exchange
                self.stream = None;
                Err(e)
            }
        }
    }
}

fn open_stream(addr: SocketAddr) -> io::Result<TcpStream> {
    let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

fn exchange(stream: &mut TcpStream, request: &Request) -> Result<WireReply, ServiceError> {
    write_frame(stream, request)?;
    read_frame(stream)
}

fn unexpected(call: &str, response: Response) -> ServiceError {
    ServiceError::Protocol(format!("unexpected response to {}: {:?}", call, response))
}

impl WordService for RemoteService {
    fn new_puzzle(&mut self, difficulty: Difficulty) -> Result<Puzzle, ServiceError> {
        match self.call(&Request::NewPuzzle { difficulty })? {
            Response::Puzzle(puzzle) => Ok(puzzle),
            other => Err(unexpected("new_puzzle", other)),
        }
    }

    fn validate_word(&mut self, word: &str, chain: &[String]) -> Result<WordVerdict, ServiceError> {
        let request = Request::ValidateWord {
            word: word.to_string(),
            chain: chain.to_vec(),
        };
        match self.call(&request)? {
            Response::WordVerdict(verdict) => Ok(verdict),
            other => Err(unexpected("validate_word", other)),
        }
    }

    fn submit(
        &mut self,
        start_word: &str,
        end_word: &str,
        path: &[String],
    ) -> Result<PathVerdict, ServiceError> {
        let request = Request::Submit {
            start_word: start_word.to_string(),
            end_word: end_word.to_string(),
            path: path.to_vec(),
        };
        match self.call(&request)? {
            Response::PathVerdict(verdict) => Ok(verdict),
            other => Err(unexpected("submit", other)),
        }
    }

    fn hint(
        &mut self,
        start_word: &str,
        end_word: &str,
        chain: &[String],
        level: u32,
    ) -> Result<HintRecord, ServiceError> {
        let request = Request::Hint {
            start_word: start_word.to_string(),
            end_word: end_word.to_string(),
            chain: chain.to_vec(),
            level,
        };
        match self.call(&request)? {
            Response::Hint(record) => Ok(record),
            other => Err(unexpected("hint", other)),
        }
    }

    fn play_count(&mut self) -> Result<u64, ServiceError> {
        match self.call(&Request::PlayCount)? {
            Response::PlayCount { total } => Ok(total),
            other => Err(unexpected("play_count", other)),
        }
    }
}

/// Parse an address string into a SocketAddr
///
/// Handles formats:
/// - "192.168.1.100:55333" -> parse directly
/// - "192.168.1.100" -> add default port
/// - "hostname:55333" -> resolve and use port
/// - "hostname" -> resolve and use default port
pub fn parse_address(addr: &str) -> io::Result<SocketAddr> {
    let with_port = if addr.contains(':') {
        addr.to_string()
    } else {
        format!("{}:{}", addr, DEFAULT_PORT)
    };
    with_port
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "could not resolve address"))
}
