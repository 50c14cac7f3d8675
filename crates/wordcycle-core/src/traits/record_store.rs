//! Record store trait consumed by the practice tracker.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::TrackerResult;
use crate::types::{PracticeEvent, UserId, Word, WordId, WordPracticeSummary};

/// Persistence seam between the tracker and the surrounding CRUD layer.
///
/// Implementations must reject a second event for the same
/// (user, word, date) or the same (user, word, day number) with
/// [`TrackerError::Conflict`](crate::error::TrackerError::Conflict).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a practice event and return it with its assigned id.
    async fn append_event(
        &self,
        user_id: UserId,
        word_id: WordId,
        date: NaiveDate,
        day_number: u32,
    ) -> TrackerResult<PracticeEvent>;

    /// Count the events recorded for a (user, word) pair.
    async fn count_events(&self, user_id: UserId, word_id: WordId) -> TrackerResult<u32>;

    /// Find the event recorded for a (user, word) pair on a date.
    async fn find_event(
        &self,
        user_id: UserId,
        word_id: WordId,
        date: NaiveDate,
    ) -> TrackerResult<Option<PracticeEvent>>;

    /// List events for a user, optionally for one word.
    ///
    /// Ordered by practice date descending, then event id descending.
    async fn list_events(
        &self,
        user_id: UserId,
        word_id: Option<WordId>,
    ) -> TrackerResult<Vec<PracticeEvent>>;

    /// List a user's words in ascending id order.
    async fn list_words(&self, user_id: UserId) -> TrackerResult<Vec<Word>>;

    /// Look up a word by id regardless of owner.
    async fn get_word(&self, word_id: WordId) -> TrackerResult<Option<Word>>;

    /// Event count and presence of a `today` event for every word of a user.
    ///
    /// Words without events are included with a zero count. Ordered by
    /// ascending word id.
    async fn word_summaries(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> TrackerResult<Vec<WordPracticeSummary>>;
}
