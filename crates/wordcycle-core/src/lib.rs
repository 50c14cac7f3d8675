//! wordcycle-core - Core library for wordcycle.
//!
//! Tracks each vocabulary word through a fixed seven-day practice cycle: a
//! word may be practiced once per calendar date, and each practice is numbered
//! day 1 through day 7.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wordcycle_core::{FixedClock, NewWord, PracticeTracker, SqliteRecordStore};
//!
//! let store = Arc::new(SqliteRecordStore::in_memory()?);
//! let word = store.insert_word(&NewWord::new(1, 1, "Hund", "dog"))?;
//! let tracker = PracticeTracker::new(store, Arc::new(FixedClock(today)));
//!
//! let access = tracker.authorize(1, word.id).await?;
//! let event = tracker.record_practice(&access, today).await?;
//! assert_eq!(event.day_number, 1);
//!
//! let due = tracker.words_eligible_today(1, today).await?;
//! ```

pub mod config;
pub mod error;
pub mod store;
pub mod tracker;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::TrackerConfig;
pub use error::{ErrorCode, TrackerError, TrackerResult};
pub use store::{InMemoryRecordStore, SqliteRecordStore};
pub use tracker::{evaluate, PracticeTracker, WordAccess};
pub use traits::{Clock, DayBoundary, FixedClock, RecordStore, SystemClock};
pub use types::{
    EligibilityState, NewWord, PracticeEvent, UserId, Word, WordId, WordPracticeSummary,
    WordProgress, CYCLE_LENGTH,
};
