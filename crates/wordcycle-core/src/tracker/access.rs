//! Ownership capability for per-word operations.

use tracing::debug;

use crate::error::{TrackerError, TrackerResult};
use crate::traits::RecordStore;
use crate::types::{UserId, Word, WordId};

/// Proof that a word exists and belongs to the acting user.
///
/// Obtained once through [`WordAccess::authorize`] and passed to every
/// per-word tracker operation, so ownership is not re-queried per call.
#[derive(Debug, Clone)]
pub struct WordAccess {
    user_id: UserId,
    word: Word,
}

impl WordAccess {
    /// Look up the word and check that `user_id` owns it.
    pub async fn authorize<S>(store: &S, user_id: UserId, word_id: WordId) -> TrackerResult<Self>
    where
        S: RecordStore + ?Sized,
    {
        let word = store
            .get_word(word_id)
            .await?
            .ok_or_else(|| TrackerError::word_not_found(word_id))?;

        if !word.is_owned_by(user_id) {
            debug!(user_id, word_id, owner = word.user_id, "Rejected access to foreign word");
            return Err(TrackerError::word_not_owned(user_id, word_id));
        }

        Ok(Self { user_id, word })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn word_id(&self) -> WordId {
        self.word.id
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn into_word(self) -> Word {
        self.word
    }
}
