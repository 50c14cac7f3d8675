//! Pure eligibility rules.

use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};
use crate::types::{EligibilityState, PracticeEvent, WordId};

/// Evaluate a (user, word) history for the given date.
///
/// The history may be in any order. Every event counts toward the cycle
/// regardless of its date.
pub fn evaluate(history: &[PracticeEvent], today: NaiveDate) -> EligibilityState {
    let completed_count = history.len() as u32;
    let practiced_today = history.iter().any(|e| e.practice_date == today);
    EligibilityState::from_parts(completed_count, practiced_today)
}

/// Decide whether a new event may be recorded and which day number it gets.
///
/// A same-day practice is reported before a completed cycle.
pub fn admit(state: &EligibilityState, word_id: WordId, today: NaiveDate) -> TrackerResult<u32> {
    if state.practiced_today {
        return Err(TrackerError::already_practiced(word_id, today));
    }
    match state.next_day_number {
        Some(day_number) => Ok(day_number),
        None => Err(TrackerError::cycle_complete(word_id, state.completed_count)),
    }
}
