//! Practice tracker service.
//!
//! Wraps an injected [`RecordStore`] and [`Clock`] and exposes the
//! eligibility queries and the single mutation of the practice cycle.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::access::WordAccess;
use super::eligibility::{admit, evaluate};
use super::locks::PairLocks;
use crate::error::{TrackerError, TrackerResult};
use crate::traits::{Clock, DayBoundary, RecordStore, SystemClock};
use crate::types::{
    EligibilityState, PracticeEvent, UserId, Word, WordId, WordProgress, CYCLE_LENGTH,
};

/// Tracks each word through its seven-day practice cycle.
///
/// `record_practice` calls for the same (user, word) pair are serialized
/// inside one tracker; writers in other processes are caught by the store's
/// uniqueness backstop.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use wordcycle_core::{DayBoundary, PracticeTracker, SqliteRecordStore};
///
/// let store = Arc::new(SqliteRecordStore::new("wordcycle.db")?);
/// let tracker = PracticeTracker::with_system_clock(store, DayBoundary::Utc);
///
/// let access = tracker.authorize(user_id, word_id).await?;
/// let event = tracker.record_practice_today(&access).await?;
/// ```
pub struct PracticeTracker {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    locks: PairLocks,
}

impl PracticeTracker {
    /// Create a tracker over the given store and clock.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: PairLocks::default(),
        }
    }

    /// Create a tracker reading "today" from the wall clock.
    pub fn with_system_clock(store: Arc<dyn RecordStore>, boundary: DayBoundary) -> Self {
        Self::new(store, Arc::new(SystemClock::new(boundary)))
    }

    /// The underlying record store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Today's date according to the tracker's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Verify that `user_id` owns `word_id`.
    pub async fn authorize(&self, user_id: UserId, word_id: WordId) -> TrackerResult<WordAccess> {
        WordAccess::authorize(self.store.as_ref(), user_id, word_id).await
    }

    /// Eligibility of an authorized word on the given date.
    pub async fn evaluate(
        &self,
        access: &WordAccess,
        today: NaiveDate,
    ) -> TrackerResult<EligibilityState> {
        let history = self
            .store
            .list_events(access.user_id(), Some(access.word_id()))
            .await?;
        check_count(access.word_id(), history.len() as u32)?;
        let state = evaluate(&history, today);

        debug!(
            user_id = access.user_id(),
            word_id = access.word_id(),
            %today,
            completed = state.completed_count,
            can_practice = state.can_practice_today,
            "Evaluated practice eligibility"
        );
        Ok(state)
    }

    /// Word together with its practice progress on the given date.
    pub async fn word_progress(
        &self,
        access: &WordAccess,
        today: NaiveDate,
    ) -> TrackerResult<WordProgress> {
        let state = self.evaluate(access, today).await?;
        Ok(WordProgress::new(access.word().clone(), state))
    }

    /// Record one practice of an authorized word on the given date.
    ///
    /// Fails with `AlreadyPracticedToday` when an event exists for `today`,
    /// otherwise with `CycleComplete` once seven days are recorded. A storage
    /// conflict is resolved by re-reading state rather than repeating the write.
    pub async fn record_practice(
        &self,
        access: &WordAccess,
        today: NaiveDate,
    ) -> TrackerResult<PracticeEvent> {
        let user_id = access.user_id();
        let word_id = access.word_id();

        let pair = self.locks.handle(user_id, word_id)?;
        let _guard = pair.lock().await;

        let state = self.current_state(user_id, word_id, today).await?;
        let day_number = admit(&state, word_id, today)?;

        match self
            .store
            .append_event(user_id, word_id, today, day_number)
            .await
        {
            Ok(event) => {
                info!(
                    user_id,
                    word_id,
                    %today,
                    day_number = event.day_number,
                    event_id = event.id,
                    "Recorded practice"
                );
                Ok(event)
            }
            Err(TrackerError::Conflict { .. }) => {
                warn!(
                    user_id,
                    word_id,
                    %today,
                    day_number,
                    "Practice write rejected by storage backstop, re-evaluating"
                );
                let state = self.current_state(user_id, word_id, today).await?;
                admit(&state, word_id, today)?;
                Err(TrackerError::conflict(word_id, today))
            }
            Err(e) => Err(e),
        }
    }

    /// Record one practice dated by the tracker's clock.
    pub async fn record_practice_today(&self, access: &WordAccess) -> TrackerResult<PracticeEvent> {
        self.record_practice(access, self.today()).await
    }

    /// Words of a user that may be practiced on the given date, by ascending id.
    pub async fn words_eligible_today(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> TrackerResult<Vec<Word>> {
        let summaries = self.store.word_summaries(user_id, today).await?;
        let total = summaries.len();

        let eligible: Vec<Word> = summaries
            .into_iter()
            .filter(|summary| summary.eligibility().can_practice_today)
            .map(|summary| summary.word)
            .collect();

        debug!(user_id, %today, total, eligible = eligible.len(), "Computed eligible words");
        Ok(eligible)
    }

    /// Practice events of a user, newest first, optionally for one word.
    pub async fn practice_history(
        &self,
        user_id: UserId,
        word_id: Option<WordId>,
    ) -> TrackerResult<Vec<PracticeEvent>> {
        self.store.list_events(user_id, word_id).await
    }

    async fn current_state(
        &self,
        user_id: UserId,
        word_id: WordId,
        today: NaiveDate,
    ) -> TrackerResult<EligibilityState> {
        let practiced_today = self
            .store
            .find_event(user_id, word_id, today)
            .await?
            .is_some();
        let completed_count = self.store.count_events(user_id, word_id).await?;
        check_count(word_id, completed_count)?;
        Ok(EligibilityState::from_parts(completed_count, practiced_today))
    }
}

/// More events than cycle days means the store lost its uniqueness backstop.
fn check_count(word_id: WordId, completed_count: u32) -> TrackerResult<()> {
    if completed_count > CYCLE_LENGTH {
        return Err(TrackerError::corrupted(format!(
            "word {} has {} practice events, more than the {}-day cycle",
            word_id, completed_count, CYCLE_LENGTH
        )));
    }
    Ok(())
}
