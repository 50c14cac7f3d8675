//! SQLite-backed record store.
//!
//! Events reference their word with `ON DELETE CASCADE`, and two unique
//! constraints back the one-event-per-date and gap-free day number rules for
//! writers that do not share a tracker.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::{TrackerError, TrackerResult};
use crate::traits::RecordStore;
use crate::types::{NewWord, PracticeEvent, UserId, Word, WordId, WordPracticeSummary};

const DATE_FORMAT: &str = "%Y-%m-%d";

const EVENT_COLUMNS: &str =
    "id, user_id, word_id, practice_date, day_number, completed, created_at";

const WORD_COLUMNS: &str = "id, user_id, language_id, word, meaning, created_at";

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directory and schema if they don't exist.
    pub fn new(path: impl AsRef<Path>) -> TrackerResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!(path = %path.as_ref().display(), "Opening SQLite record store");
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> TrackerResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> TrackerResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> TrackerResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| TrackerError::database(e.to_string()))
    }

    fn init_schema(&self) -> TrackerResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                language_id INTEGER NOT NULL,
                word TEXT NOT NULL,
                meaning TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_words_user
                ON words(user_id, id);

            CREATE TABLE IF NOT EXISTS practice_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
                practice_date TEXT NOT NULL,
                day_number INTEGER NOT NULL CHECK (day_number BETWEEN 1 AND 7),
                completed INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, word_id, practice_date),
                UNIQUE(user_id, word_id, day_number)
            );

            -- History queries: newest first per user
            CREATE INDEX IF NOT EXISTS idx_events_user_date
                ON practice_events(user_id, practice_date DESC);

            CREATE INDEX IF NOT EXISTS idx_events_word
                ON practice_events(word_id);
            "#,
        )?;
        Ok(())
    }

    /// Seed a word, assigning the next id.
    pub fn insert_word(&self, new_word: &NewWord) -> TrackerResult<Word> {
        let conn = self.lock()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO words (user_id, language_id, word, meaning, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new_word.user_id,
                new_word.language_id,
                new_word.word,
                new_word.meaning,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Word {
            id: conn.last_insert_rowid(),
            user_id: new_word.user_id,
            language_id: new_word.language_id,
            word: new_word.word.clone(),
            meaning: new_word.meaning.clone(),
            created_at,
        })
    }

    /// Delete a word; its practice events go with it.
    pub fn delete_word(&self, word_id: WordId) -> TrackerResult<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM words WHERE id = ?1", params![word_id])?;
        Ok(deleted > 0)
    }

    fn row_to_event(row: &Row<'_>) -> rusqlite::Result<PracticeEvent> {
        let practice_date: String = row.get(3)?;
        let completed: i64 = row.get(5)?;
        let created_at: String = row.get(6)?;

        Ok(PracticeEvent {
            id: row.get(0)?,
            user_id: row.get(1)?,
            word_id: row.get(2)?,
            practice_date: parse_date(3, &practice_date)?,
            day_number: row.get(4)?,
            completed: completed != 0,
            created_at: parse_timestamp(6, &created_at)?,
        })
    }

    fn row_to_word(row: &Row<'_>) -> rusqlite::Result<Word> {
        let created_at: String = row.get(5)?;

        Ok(Word {
            id: row.get(0)?,
            user_id: row.get(1)?,
            language_id: row.get(2)?,
            word: row.get(3)?,
            meaning: row.get(4)?,
            created_at: parse_timestamp(5, &created_at)?,
        })
    }
}

fn parse_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn append_event(
        &self,
        user_id: UserId,
        word_id: WordId,
        date: NaiveDate,
        day_number: u32,
    ) -> TrackerResult<PracticeEvent> {
        let conn = self.lock()?;
        let created_at = Utc::now();

        let inserted = conn.execute(
            "INSERT INTO practice_events
             (user_id, word_id, practice_date, day_number, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
            params![
                user_id,
                word_id,
                format_date(date),
                day_number,
                created_at.to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => Ok(PracticeEvent {
                id: conn.last_insert_rowid(),
                user_id,
                word_id,
                practice_date: date,
                day_number,
                completed: true,
                created_at,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(TrackerError::conflict(word_id, date))
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Err(TrackerError::word_not_found(word_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn count_events(&self, user_id: UserId, word_id: WordId) -> TrackerResult<u32> {
        let conn = self.lock()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM practice_events WHERE user_id = ?1 AND word_id = ?2",
            params![user_id, word_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    async fn find_event(
        &self,
        user_id: UserId,
        word_id: WordId,
        date: NaiveDate,
    ) -> TrackerResult<Option<PracticeEvent>> {
        let conn = self.lock()?;
        let event = conn
            .query_row(
                &format!(
                    "SELECT {} FROM practice_events
                     WHERE user_id = ?1 AND word_id = ?2 AND practice_date = ?3",
                    EVENT_COLUMNS
                ),
                params![user_id, word_id, format_date(date)],
                Self::row_to_event,
            )
            .optional()?;
        Ok(event)
    }

    async fn list_events(
        &self,
        user_id: UserId,
        word_id: Option<WordId>,
    ) -> TrackerResult<Vec<PracticeEvent>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM practice_events
             WHERE user_id = ?1 AND (?2 IS NULL OR word_id = ?2)
             ORDER BY practice_date DESC, id DESC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map(params![user_id, word_id], Self::row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    async fn list_words(&self, user_id: UserId) -> TrackerResult<Vec<Word>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM words WHERE user_id = ?1 ORDER BY id ASC",
            WORD_COLUMNS
        ))?;

        let words = stmt
            .query_map(params![user_id], Self::row_to_word)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words)
    }

    async fn get_word(&self, word_id: WordId) -> TrackerResult<Option<Word>> {
        let conn = self.lock()?;
        let word = conn
            .query_row(
                &format!("SELECT {} FROM words WHERE id = ?1", WORD_COLUMNS),
                params![word_id],
                Self::row_to_word,
            )
            .optional()?;
        Ok(word)
    }

    async fn word_summaries(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> TrackerResult<Vec<WordPracticeSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT w.id, w.user_id, w.language_id, w.word, w.meaning, w.created_at,
                    COUNT(e.id),
                    COALESCE(MAX(e.practice_date = ?2), 0)
             FROM words w
             LEFT JOIN practice_events e
                ON e.word_id = w.id AND e.user_id = w.user_id
             WHERE w.user_id = ?1
             GROUP BY w.id
             ORDER BY w.id ASC",
        )?;

        let summaries = stmt
            .query_map(params![user_id, format_date(today)], |row| {
                let practiced_today: i64 = row.get(7)?;
                Ok(WordPracticeSummary {
                    word: Self::row_to_word(row)?,
                    completed_count: row.get(6)?,
                    practiced_today: practiced_today != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }
}
