//! Error types for wordcycle operations.
//!
//! Domain errors carry the word id (and the date where one applies) so callers
//! can render a user-facing message, plus a structured error code for
//! programmatic mapping onto transport status codes.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{UserId, WordId};

/// Result type alias for wordcycle operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Main error type for all wordcycle operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Word is missing or owned by another user.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        user_id: Option<UserId>,
        word_id: Option<WordId>,
    },

    /// A practice event already exists for the given date.
    #[error("Word {word_id} already practiced on {date}")]
    AlreadyPracticedToday {
        word_id: WordId,
        date: NaiveDate,
        code: ErrorCode,
    },

    /// All seven days of the cycle are recorded.
    #[error("Practice cycle for word {word_id} already completed ({completed} days)")]
    CycleComplete {
        word_id: WordId,
        completed: u32,
        code: ErrorCode,
    },

    /// Storage uniqueness backstop rejected a write the application check allowed.
    #[error("Conflicting practice write for word {word_id} on {date}")]
    Conflict {
        word_id: WordId,
        date: NaiveDate,
        code: ErrorCode,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lookup (NF_xxx)
    WordNotFound,
    WordNotOwned,

    // Practice (PRC_xxx)
    PracticeAlreadyToday,
    PracticeCycleComplete,
    PracticeConflict,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,
    DbCorrupted,

    // Configuration
    Configuration,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::WordNotFound => "NF_001",
            ErrorCode::WordNotOwned => "NF_002",
            ErrorCode::PracticeAlreadyToday => "PRC_001",
            ErrorCode::PracticeCycleComplete => "PRC_002",
            ErrorCode::PracticeConflict => "PRC_003",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::DbCorrupted => "DB_003",
            ErrorCode::Configuration => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl TrackerError {
    /// Create a not found error for a word id.
    pub fn word_not_found(word_id: WordId) -> Self {
        Self::NotFound {
            message: format!("Word with id '{}' not found", word_id),
            code: ErrorCode::WordNotFound,
            user_id: None,
            word_id: Some(word_id),
        }
    }

    /// Create a not found error for a word that belongs to someone else.
    ///
    /// The message is the same as for a missing word so ownership is not leaked.
    pub fn word_not_owned(user_id: UserId, word_id: WordId) -> Self {
        Self::NotFound {
            message: format!("Word with id '{}' not found", word_id),
            code: ErrorCode::WordNotOwned,
            user_id: Some(user_id),
            word_id: Some(word_id),
        }
    }

    /// Create an already-practiced error.
    pub fn already_practiced(word_id: WordId, date: NaiveDate) -> Self {
        Self::AlreadyPracticedToday {
            word_id,
            date,
            code: ErrorCode::PracticeAlreadyToday,
        }
    }

    /// Create a cycle-complete error.
    pub fn cycle_complete(word_id: WordId, completed: u32) -> Self {
        Self::CycleComplete {
            word_id,
            completed,
            code: ErrorCode::PracticeCycleComplete,
        }
    }

    /// Create a storage conflict error.
    pub fn conflict(word_id: WordId, date: NaiveDate) -> Self {
        Self::Conflict {
            word_id,
            date,
            code: ErrorCode::PracticeConflict,
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a database error for rows that violate a stored invariant.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbCorrupted,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { code, .. } => *code,
            Self::AlreadyPracticedToday { code, .. } => *code,
            Self::CycleComplete { code, .. } => *code,
            Self::Conflict { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::Configuration,
            _ => ErrorCode::Internal,
        }
    }

    /// Word id the error refers to, if any.
    pub fn word_id(&self) -> Option<WordId> {
        match self {
            Self::NotFound { word_id, .. } => *word_id,
            Self::AlreadyPracticedToday { word_id, .. }
            | Self::CycleComplete { word_id, .. }
            | Self::Conflict { word_id, .. } => Some(*word_id),
            _ => None,
        }
    }

    /// True for `AlreadyPracticedToday` and for storage `Conflict`, which means the same thing.
    pub fn is_already_practiced(&self) -> bool {
        matches!(
            self,
            Self::AlreadyPracticedToday { .. } | Self::Conflict { .. }
        )
    }

    /// Whether repeating the same call could succeed without any state change.
    ///
    /// Domain errors are never retryable; a conflict is resolved by re-evaluating.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database { code, .. } => *code == ErrorCode::DbConnectionFailed,
            _ => false,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::NotFound { .. } => Some("Please check the word ID and ensure it belongs to you"),
            Self::AlreadyPracticedToday { .. } | Self::Conflict { .. } => {
                Some("This word was already practiced today, try again tomorrow")
            }
            Self::CycleComplete { .. } => Some("All seven practice days are done for this word"),
            Self::Configuration(_) => Some("Please check your wordcycle configuration file"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::CannotOpen
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                ErrorCode::DbConnectionFailed
            }
            _ => ErrorCode::DbOperationFailed,
        };
        Self::Database {
            message: err.to_string(),
            code,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_not_found_error() {
        let err = TrackerError::word_not_found(42);
        assert_eq!(err.code(), ErrorCode::WordNotFound);
        assert_eq!(err.word_id(), Some(42));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_not_owned_hides_ownership() {
        let missing = TrackerError::word_not_found(7);
        let foreign = TrackerError::word_not_owned(1, 7);
        assert_eq!(missing.to_string(), foreign.to_string());
        assert_eq!(foreign.code(), ErrorCode::WordNotOwned);
    }

    #[test]
    fn test_conflict_counts_as_already_practiced() {
        let conflict = TrackerError::conflict(3, date(2024, 1, 1));
        let already = TrackerError::already_practiced(3, date(2024, 1, 1));
        assert!(conflict.is_already_practiced());
        assert!(already.is_already_practiced());
        assert!(!TrackerError::cycle_complete(3, 7).is_already_practiced());
        assert_eq!(conflict.suggestion(), already.suggestion());
    }

    #[test]
    fn test_domain_errors_not_retryable() {
        assert!(!TrackerError::conflict(1, date(2024, 1, 1)).is_retryable());
        assert!(!TrackerError::cycle_complete(1, 7).is_retryable());
        assert!(!TrackerError::word_not_found(1).is_retryable());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = TrackerError::already_practiced(9, date(2024, 3, 5));
        assert!(err.to_string().contains("9"));
        assert!(err.to_string().contains("2024-03-05"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::WordNotFound.as_str(), "NF_001");
        assert_eq!(ErrorCode::PracticeAlreadyToday.as_str(), "PRC_001");
        assert_eq!(ErrorCode::PracticeCycleComplete.as_str(), "PRC_002");
    }
}
