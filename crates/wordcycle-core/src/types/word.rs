//! Word records as seen by the tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LanguageId, UserId, WordId};

/// A vocabulary word owned by one user in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Word ID.
    pub id: WordId,
    /// Owning user.
    pub user_id: UserId,
    /// Language the word belongs to.
    pub language_id: LanguageId,
    /// The word itself.
    pub word: String,
    /// Its meaning.
    pub meaning: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Word {
    /// Whether the word belongs to the given user.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Data needed to seed a word into a record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWord {
    pub user_id: UserId,
    pub language_id: LanguageId,
    pub word: String,
    pub meaning: String,
}

impl NewWord {
    /// Create a new word for the given user and language.
    pub fn new(
        user_id: UserId,
        language_id: LanguageId,
        word: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            language_id,
            word: word.into(),
            meaning: meaning.into(),
        }
    }
}
