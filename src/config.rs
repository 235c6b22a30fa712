//! Command line options and logging setup

use crate::game::Difficulty;
use crate::service::offline::WordGraph;
use crate::service::{OfflineService, RemoteService, WordService};
use crate::storage::{GameStatistics, Storage, StorageError};
use clap::Parser;
use log::LevelFilter;
use std::error::Error;
use std::fmt::Write;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "sixdegrees.log";

/// Connect two words through a chain of associations in six steps or fewer.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Opts {
    /// Use a remote word service at HOST[:PORT] instead of the offline graph
    #[arg(short = 'c', long, value_name = "ADDR")]
    pub connect: Option<String>,

    /// Difficulty of the first puzzle (easy, medium, hard)
    #[arg(short = 'd', long, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// Play log database for the offline service
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Do not record offline games
    #[arg(long)]
    pub no_record: bool,

    /// Print play log statistics and exit
    #[arg(long)]
    pub stats: bool,

    /// Where to write the log (the terminal belongs to the game)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level; RUST_LOG overrides it
    #[arg(long, default_value_t = LevelFilter::Warn)]
    pub log_level: LevelFilter,
}

impl Opts {
    /// Start `env_logger` writing to the log file. Returns the file used.
    pub fn init_logging(&self) -> Result<PathBuf, Box<dyn Error>> {
        let path = match &self.log_file {
            Some(path) => path.clone(),
            None => {
                let dir = Storage::data_dir()?;
                std::fs::create_dir_all(&dir)?;
                dir.join(LOG_FILE_NAME)
            }
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        env_logger::Builder::new()
            .filter_level(self.log_level)
            .parse_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .format_timestamp_millis()
            .try_init()?;

        log::info!("sixdegrees {} starting", env!("CARGO_PKG_VERSION"));
        Ok(path)
    }

    /// Build the word service these options select.
    pub fn build_service(&self) -> Result<Box<dyn WordService>, Box<dyn Error>> {
        if let Some(addr) = &self.connect {
            let service = RemoteService::connect(addr)?;
            log::info!("using remote word service at {}", service.addr());
            return Ok(Box::new(service));
        }

        let storage = if self.no_record {
            None
        } else {
            Some(self.open_storage()?)
        };
        Ok(Box::new(OfflineService::new(storage)))
    }

    /// Summary of the play log, one figure per line.
    pub fn statistics_report(&self) -> Result<String, Box<dyn Error>> {
        let stats = self.open_storage()?.statistics()?;
        Ok(format_statistics(&stats, WordGraph::embedded()))
    }

    fn open_storage(&self) -> Result<Storage, StorageError> {
        match &self.db {
            Some(path) => Storage::open_at(path),
            None => Storage::open(),
        }
    }
}

fn format_statistics(stats: &GameStatistics, graph: &WordGraph) -> String {
    let mut out = format!(
        "Word graph:          {} words, {} connections\n",
        graph.word_count(),
        graph.connection_count()
    );
    if stats.total_games == 0 {
        out.push_str("No games recorded yet.");
        return out;
    }

    // Writing into a String cannot fail
    let _ = write!(
        out,
        "Games played:        {}\n\
         Completed:           {} ({:.1}%)\n\
         Beat the algorithm:  {}\n\
         Perfect:             {}\n\
         Broken chains:       {}\n\
         Average score:       {:.1}\n\
         Average path length: {:.1}\n",
        stats.total_games,
        stats.completed_games,
        stats.success_rate,
        stats.beat_algorithm_games,
        stats.perfect_games,
        stats.failed_games,
        stats.average_score,
        stats.average_path_length,
    );

    out.push_str("\nScore distribution:\n");
    for (score, games) in &stats.score_distribution {
        let _ = writeln!(out, "  {:>3}  x{}", score, games);
    }

    out.push_str("\nRecent games:\n");
    for game in &stats.recent_games {
        let path = if game.player_path.is_empty() {
            "-".to_string()
        } else {
            game.player_path.join(" ")
        };
        let _ = writeln!(
            out,
            "  {} -> {}  {:>3}  {} ({}/{} steps)",
            game.start_word, game.end_word, game.score, path, game.player_length, game.optimal_length
        );
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecentGame;

    #[test]
    fn test_defaults() {
        let opts = Opts::try_parse_from(["sixdegrees"]).unwrap();
        assert_eq!(opts.difficulty, Difficulty::Medium);
        assert_eq!(opts.log_level, LevelFilter::Warn);
        assert!(opts.connect.is_none());
        assert!(!opts.no_record);
        assert!(!opts.stats);
    }

    #[test]
    fn test_parse_all_options() {
        let opts = Opts::try_parse_from([
            "sixdegrees",
            "--connect",
            "10.0.0.5:4000",
            "--difficulty",
            "hard",
            "--db",
            "/tmp/games.db",
            "--no-record",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(opts.connect.as_deref(), Some("10.0.0.5:4000"));
        assert_eq!(opts.difficulty, Difficulty::Hard);
        assert_eq!(opts.db, Some(PathBuf::from("/tmp/games.db")));
        assert!(opts.no_record);
        assert_eq!(opts.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_bad_difficulty_is_rejected() {
        assert!(Opts::try_parse_from(["sixdegrees", "-d", "brutal"]).is_err());
    }

    #[test]
    fn test_statistics_report_for_empty_log() {
        let opts = Opts::try_parse_from(["sixdegrees", "--db", ":memory:", "--stats"]).unwrap();
        assert!(opts.stats);
        let report = opts.statistics_report().unwrap();
        assert!(report.starts_with("Word graph:"));
        assert!(report.ends_with("No games recorded yet."));
    }

    #[test]
    fn test_format_statistics() {
        let stats = GameStatistics {
            total_games: 4,
            average_score: 75.0,
            beat_algorithm_games: 1,
            perfect_games: 1,
            completed_games: 3,
            failed_games: 1,
            success_rate: 75.0,
            average_path_length: 4.0,
            score_distribution: vec![(110, 1), (100, 2), (0, 1)],
            recent_games: vec![RecentGame {
                start_word: "SUN".to_string(),
                end_word: "MONEY".to_string(),
                player_path: vec!["LIGHT".to_string(), "DAY".to_string(), "WORK".to_string()],
                player_length: 4,
                optimal_length: 4,
                score: 100,
                created_at: 0,
            }],
        };
        let graph = WordGraph::parse("SUN LIGHT\nLIGHT DAY");
        let text = format_statistics(&stats, &graph);

        assert!(text.starts_with("Word graph:          3 words, 2 connections\n"));
        assert!(text.contains("Games played:        4\n"));
        assert!(text.contains("Completed:           3 (75.0%)"));
        assert!(text.contains("Average path length: 4.0"));
        assert!(text.contains("  110  x1\n  100  x2\n    0  x1"));
        assert!(text.ends_with("SUN -> MONEY  100  LIGHT DAY WORK (4/4 steps)"));
    }

    #[test]
    fn test_offline_service_without_recording() {
        let opts = Opts::try_parse_from(["sixdegrees", "--no-record"]).unwrap();
        let mut service = opts.build_service().unwrap();
        assert_eq!(service.play_count().unwrap(), 0);
    }
}
