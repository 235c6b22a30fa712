//! Persistent play log using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - One row per scored game, plus aggregate statistics

use crate::game::scoring::{GameResult, ScoreBand};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and games tables
const SCHEMA_VERSION: u32 = 1;

/// File name of the play log inside the data directory
pub const DB_FILE_NAME: &str = "sixdegrees.db";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Could not determine data directory
    #[error("could not determine data directory")]
    NoDataDirectory,
    /// Failed to create data directory
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
    /// Schema version mismatch (future version)
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
}

/// Aggregate numbers over every recorded game
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStatistics {
    pub total_games: u64,
    pub average_score: f64,
    /// Connected paths shorter than optimal
    pub beat_algorithm_games: u64,
    /// Connected paths exactly as long as optimal
    pub perfect_games: u64,
    /// All connected paths
    pub completed_games: u64,
    pub failed_games: u64,
    /// Percentage of games that connected
    pub success_rate: f64,
    /// Mean links walked, over connected games only
    pub average_path_length: f64,
    /// `(score, games)` pairs, highest score first
    pub score_distribution: Vec<(u32, u64)>,
    /// Latest games, newest first
    pub recent_games: Vec<RecentGame>,
}

/// Games listed in `GameStatistics::recent_games`
pub const RECENT_GAMES_LIMIT: usize = 10;

/// One row of the play log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentGame {
    pub start_word: String,
    pub end_word: String,
    pub player_path: Vec<String>,
    pub player_length: u32,
    pub optimal_length: u32,
    pub score: u32,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

/// The play log handle.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the play log in the OS data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/sixdegrees/` or `~/.local/share/sixdegrees/`
    /// - macOS: `~/Library/Application Support/sixdegrees/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;
        Self::open_at(&data_dir.join(DB_FILE_NAME))
    }

    /// Open or create the play log at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StorageError::CreateDirFailed)?;
        }
        let storage = Storage {
            conn: Connection::open(path)?,
        };
        storage.initialize_schema()?;
        log::info!("play log opened at {}", path.display());
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Raw connection (for testing).
    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get the OS-standard data directory
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "sixdegrees")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Append one scored game to the log.
    pub fn record_game(&self, result: &GameResult) -> Result<(), StorageError> {
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        self.conn.execute(
            "INSERT INTO games (start_word, end_word, player_path, optimal_path,
                                player_length, optimal_length, score, band, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                result.start_word,
                result.end_word,
                result.player_path.join(" "),
                result.optimal_path.join(" "),
                result.player_length,
                result.optimal_length,
                result.score,
                band_name(&result.band),
                created_at,
            ],
        )?;
        Ok(())
    }

    /// Number of games recorded so far.
    pub fn total_games(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Aggregate statistics over the whole log.
    pub fn statistics(&self) -> Result<GameStatistics, StorageError> {
        let (total, average_score, beat, perfect, completed, average_path_length): (
            i64,
            Option<f64>,
            Option<i64>,
            Option<i64>,
            Option<i64>,
            Option<f64>,
        ) = self.conn.query_row(
            "SELECT COUNT(*),
                    AVG(score),
                    SUM(CASE WHEN band = 'beat_optimal' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN band = 'matched_optimal' THEN 1 ELSE 0 END),
                    SUM(CASE WHEN player_length > 0 THEN 1 ELSE 0 END),
                    AVG(CASE WHEN player_length > 0 THEN player_length END)
             FROM games",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )?;

        let total_games = total.max(0) as u64;
        let completed_games = completed.unwrap_or(0).max(0) as u64;
        let success_rate = if total_games > 0 {
            completed_games as f64 * 100.0 / total_games as f64
        } else {
            0.0
        };

        Ok(GameStatistics {
            total_games,
            average_score: average_score.unwrap_or(0.0),
            beat_algorithm_games: beat.unwrap_or(0).max(0) as u64,
            perfect_games: perfect.unwrap_or(0).max(0) as u64,
            completed_games,
            failed_games: total_games - completed_games,
            success_rate,
            average_path_length: average_path_length.unwrap_or(0.0),
            score_distribution: self.score_distribution()?,
            recent_games: self.recent_games(RECENT_GAMES_LIMIT)?,
        })
    }

    /// Games per score, highest score first.
    pub fn score_distribution(&self) -> Result<Vec<(u32, u64)>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT score, COUNT(*) FROM games GROUP BY score ORDER BY score DESC")?;
        let rows = stmt.query_map([], |row| {
            let count: i64 = row.get(1)?;
            Ok((row.get(0)?, count.max(0) as u64))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// The `limit` most recent games, newest first.
    pub fn recent_games(&self, limit: usize) -> Result<Vec<RecentGame>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT start_word, end_word, player_path, player_length, optimal_length,
                    score, created_at
             FROM games
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let player_path: String = row.get(2)?;
            Ok(RecentGame {
                start_word: row.get(0)?,
                end_word: row.get(1)?,
                player_path: player_path.split_whitespace().map(str::to_string).collect(),
                player_length: row.get(3)?,
                optimal_length: row.get(4)?,
                score: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer build
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version and creation time
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Games table: one row per submission
            -- Paths are space-separated intermediate words
            CREATE TABLE games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                start_word TEXT NOT NULL,
                end_word TEXT NOT NULL,
                player_path TEXT NOT NULL,
                optimal_path TEXT NOT NULL,
                player_length INTEGER NOT NULL,
                optimal_length INTEGER NOT NULL,
                score INTEGER NOT NULL,
                band TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX idx_games_created ON games (created_at);
            "#,
        )?;

        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, created_at],
        )?;

        Ok(())
    }
}

fn band_name(band: &ScoreBand) -> &'static str {
    match band {
        ScoreBand::BeatOptimal { .. } => "beat_optimal",
        ScoreBand::MatchedOptimal => "matched_optimal",
        ScoreBand::Longer { .. } => "longer",
        ScoreBand::Disconnected { .. } => "disconnected",
    }
}
