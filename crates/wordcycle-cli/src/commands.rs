//! Subcommand definitions and handlers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use wordcycle_core::{PracticeTracker, TrackerConfig, UserId, WordId};

/// Seven-day vocabulary practice tracker.
#[derive(Debug, Parser)]
#[command(name = "wordcycle", version, about)]
pub struct Cli {
    /// Configuration file (.toml, .json or .yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overriding the configuration.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show practice progress for one word.
    Status {
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        word: WordId,
        /// Evaluate for this date instead of today (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Record today's practice for one word.
    Practice {
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        word: WordId,
        /// Record for this date instead of today (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List words that may be practiced today.
    Due {
        #[arg(long)]
        user: UserId,
        /// Evaluate for this date instead of today (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show practice history, newest first.
    History {
        #[arg(long)]
        user: UserId,
        /// Only events for this word.
        #[arg(long)]
        word: Option<WordId>,
    },
}

/// Resolve configuration from file, environment and flags.
pub fn load_config(cli: &Cli) -> Result<TrackerConfig> {
    let config = match &cli.config {
        Some(path) => TrackerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?
            .merge_env()?,
        None => TrackerConfig::from_env()?,
    };

    Ok(match &cli.db {
        Some(path) => TrackerConfig {
            database_path: path.clone(),
            in_memory: false,
            ..config
        },
        None => config,
    })
}

/// Run one subcommand against the tracker.
pub async fn run(tracker: &PracticeTracker, command: Command) -> Result<()> {
    debug!(?command, "Running command");

    match command {
        Command::Status { user, word, date } => {
            let today = date.unwrap_or_else(|| tracker.today());
            let access = tracker.authorize(user, word).await?;
            print_json(&tracker.word_progress(&access, today).await?)
        }
        Command::Practice { user, word, date } => {
            let today = date.unwrap_or_else(|| tracker.today());
            let access = tracker.authorize(user, word).await?;
            print_json(&tracker.record_practice(&access, today).await?)
        }
        Command::Due { user, date } => {
            let today = date.unwrap_or_else(|| tracker.today());
            print_json(&tracker.words_eligible_today(user, today).await?)
        }
        Command::History { user, word } => {
            print_json(&tracker.practice_history(user, word).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_practice_with_date() {
        let cli = Cli::parse_from([
            "wordcycle", "practice", "--user", "1", "--word", "5", "--date", "2024-01-02",
        ]);
        match cli.command {
            Command::Practice { user, word, date } => {
                assert_eq!(user, 1);
                assert_eq!(word, 5);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_history_without_word() {
        let cli = Cli::parse_from(["wordcycle", "--db", "/tmp/w.db", "history", "--user", "3"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/w.db")));
        assert!(matches!(cli.command, Command::History { user: 3, word: None }));
    }

    #[test]
    fn test_db_flag_overrides_config() {
        let cli = Cli::parse_from(["wordcycle", "--db", "/tmp/override.db", "due", "--user", "1"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/override.db"));
        assert!(!config.in_memory);
    }

    #[tokio::test]
    async fn test_run_against_in_memory_store() {
        let config = TrackerConfig::builder().in_memory().build();
        let tracker = config.open_tracker().unwrap();

        let result = run(
            &tracker,
            Command::Due {
                user: 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 1),
            },
        )
        .await;
        assert!(result.is_ok());

        let err = run(
            &tracker,
            Command::Practice {
                user: 1,
                word: 1,
                date: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err
            .downcast_ref::<wordcycle_core::TrackerError>()
            .is_some_and(|e| matches!(e, wordcycle_core::TrackerError::NotFound { .. })));
    }
}
