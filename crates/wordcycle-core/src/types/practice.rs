//! Practice cycle types.
//!
//! A word is practiced at most once per calendar date, for at most
//! [`CYCLE_LENGTH`] dates in total. Day numbers are derived from how many
//! events already exist and never supplied by callers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, UserId, Word, WordId};

/// Number of practice days in a full cycle.
pub const CYCLE_LENGTH: u32 = 7;

/// One completed practice of a word on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeEvent {
    /// Event ID.
    pub id: EventId,
    /// User who practiced.
    pub user_id: UserId,
    /// Word practiced.
    pub word_id: WordId,
    /// Calendar date of the practice.
    pub practice_date: NaiveDate,
    /// Position in the cycle, 1 through 7.
    pub day_number: u32,
    /// Always true for recorded events.
    pub completed: bool,
    /// Audit timestamp, not used for eligibility.
    pub created_at: DateTime<Utc>,
}

/// Eligibility verdict for one (user, word) pair on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityState {
    /// Number of recorded practice days.
    pub completed_count: u32,
    /// Whether an event exists for the evaluated date.
    pub practiced_today: bool,
    /// Whether a new event may be recorded for the evaluated date.
    pub can_practice_today: bool,
    /// Day number the next event would get, `None` once the cycle is complete.
    pub next_day_number: Option<u32>,
}

impl EligibilityState {
    /// Derive the verdict from an event count and today's-date presence.
    pub fn from_parts(completed_count: u32, practiced_today: bool) -> Self {
        let open = completed_count < CYCLE_LENGTH;
        Self {
            completed_count,
            practiced_today,
            can_practice_today: !practiced_today && open,
            next_day_number: open.then_some(completed_count + 1),
        }
    }

    /// Whether all seven days are recorded.
    pub fn is_cycle_complete(&self) -> bool {
        self.next_day_number.is_none()
    }
}

/// Per-word aggregate produced by a record store in a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPracticeSummary {
    pub word: Word,
    pub completed_count: u32,
    pub practiced_today: bool,
}

impl WordPracticeSummary {
    pub fn eligibility(&self) -> EligibilityState {
        EligibilityState::from_parts(self.completed_count, self.practiced_today)
    }
}

/// A word together with its practice progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordProgress {
    /// The word.
    #[serde(flatten)]
    pub word: Word,
    /// Number of practice days done.
    pub practice_days_completed: u32,
    /// Whether the word may be practiced on the evaluated date.
    pub can_practice_today: bool,
    /// Next day number, omitted once the cycle is complete.
    pub next_practice_day: Option<u32>,
}

impl WordProgress {
    pub fn new(word: Word, state: EligibilityState) -> Self {
        Self {
            word,
            practice_days_completed: state.completed_count,
            can_practice_today: state.can_practice_today,
            next_practice_day: state.next_day_number,
        }
    }
}
