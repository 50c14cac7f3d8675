//! In-memory record store.
//!
//! Keeps words and events in process memory behind a mutex and enforces the
//! same uniqueness backstop as the SQLite store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::error::{TrackerError, TrackerResult};
use crate::traits::RecordStore;
use crate::types::{
    EventId, NewWord, PracticeEvent, UserId, Word, WordId, WordPracticeSummary,
};

#[derive(Default)]
struct Inner {
    words: BTreeMap<WordId, Word>,
    events: Vec<PracticeEvent>,
    last_word_id: WordId,
    last_event_id: EventId,
}

impl Inner {
    fn events_for(&self, user_id: UserId, word_id: WordId) -> impl Iterator<Item = &PracticeEvent> {
        self.events
            .iter()
            .filter(move |e| e.user_id == user_id && e.word_id == word_id)
    }
}

/// Record store backed by process memory.
#[derive(Default)]
pub struct InMemoryRecordStore {
    inner: Mutex<Inner>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TrackerResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| TrackerError::database(e.to_string()))
    }

    /// Seed a word, assigning the next id.
    pub fn insert_word(&self, new_word: &NewWord) -> TrackerResult<Word> {
        let mut inner = self.lock()?;
        inner.last_word_id += 1;
        let word = Word {
            id: inner.last_word_id,
            user_id: new_word.user_id,
            language_id: new_word.language_id,
            word: new_word.word.clone(),
            meaning: new_word.meaning.clone(),
            created_at: Utc::now(),
        };
        inner.words.insert(word.id, word.clone());
        Ok(word)
    }

    /// Delete a word and, by cascade, its practice events.
    pub fn delete_word(&self, word_id: WordId) -> TrackerResult<bool> {
        let mut inner = self.lock()?;
        if inner.words.remove(&word_id).is_none() {
            return Ok(false);
        }
        inner.events.retain(|e| e.word_id != word_id);
        Ok(true)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn append_event(
        &self,
        user_id: UserId,
        word_id: WordId,
        date: NaiveDate,
        day_number: u32,
    ) -> TrackerResult<PracticeEvent> {
        let mut inner = self.lock()?;

        if !inner.words.contains_key(&word_id) {
            return Err(TrackerError::word_not_found(word_id));
        }

        let clash = inner
            .events_for(user_id, word_id)
            .any(|e| e.practice_date == date || e.day_number == day_number);
        if clash {
            return Err(TrackerError::conflict(word_id, date));
        }

        inner.last_event_id += 1;
        let event = PracticeEvent {
            id: inner.last_event_id,
            user_id,
            word_id,
            practice_date: date,
            day_number,
            completed: true,
            created_at: Utc::now(),
        };
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn count_events(&self, user_id: UserId, word_id: WordId) -> TrackerResult<u32> {
        let inner = self.lock()?;
        let count = inner.events_for(user_id, word_id).count() as u32;
        Ok(count)
    }

    async fn find_event(
        &self,
        user_id: UserId,
        word_id: WordId,
        date: NaiveDate,
    ) -> TrackerResult<Option<PracticeEvent>> {
        let inner = self.lock()?;
        let found = inner
            .events_for(user_id, word_id)
            .find(|e| e.practice_date == date)
            .cloned();
        Ok(found)
    }

    async fn list_events(
        &self,
        user_id: UserId,
        word_id: Option<WordId>,
    ) -> TrackerResult<Vec<PracticeEvent>> {
        let inner = self.lock()?;
        let mut events: Vec<PracticeEvent> = inner
            .events
            .iter()
            .filter(|e| e.user_id == user_id && word_id.map_or(true, |w| e.word_id == w))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            b.practice_date
                .cmp(&a.practice_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(events)
    }

    async fn list_words(&self, user_id: UserId) -> TrackerResult<Vec<Word>> {
        let inner = self.lock()?;
        let words = inner
            .words
            .values()
            .filter(|w| w.is_owned_by(user_id))
            .cloned()
            .collect();
        Ok(words)
    }

    async fn get_word(&self, word_id: WordId) -> TrackerResult<Option<Word>> {
        let inner = self.lock()?;
        let word = inner.words.get(&word_id).cloned();
        Ok(word)
    }

    async fn word_summaries(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> TrackerResult<Vec<WordPracticeSummary>> {
        let inner = self.lock()?;

        let mut counts: BTreeMap<WordId, (u32, bool)> = BTreeMap::new();
        for event in inner.events.iter().filter(|e| e.user_id == user_id) {
            let entry = counts.entry(event.word_id).or_default();
            entry.0 += 1;
            entry.1 |= event.practice_date == today;
        }

        let summaries = inner
            .words
            .values()
            .filter(|w| w.is_owned_by(user_id))
            .map(|word| {
                let (completed_count, practiced_today) =
                    counts.get(&word.id).copied().unwrap_or_default();
                WordPracticeSummary {
                    word: word.clone(),
                    completed_count,
                    practiced_today,
                }
            })
            .collect();
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_append_and_count() {
        let store = InMemoryRecordStore::new();
        let word = store.insert_word(&NewWord::new(1, 1, "gato", "cat")).unwrap();

        store.append_event(1, word.id, date(2024, 1, 1), 1).await.unwrap();
        store.append_event(1, word.id, date(2024, 1, 2), 2).await.unwrap();

        assert_eq!(store.count_events(1, word.id).await.unwrap(), 2);
        assert_eq!(store.count_events(2, word.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_same_date_conflicts() {
        let store = InMemoryRecordStore::new();
        let word = store.insert_word(&NewWord::new(1, 1, "gato", "cat")).unwrap();

        store.append_event(1, word.id, date(2024, 1, 1), 1).await.unwrap();
        let err = store
            .append_event(1, word.id, date(2024, 1, 1), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_same_day_number_conflicts() {
        let store = InMemoryRecordStore::new();
        let word = store.insert_word(&NewWord::new(1, 1, "gato", "cat")).unwrap();

        store.append_event(1, word.id, date(2024, 1, 1), 1).await.unwrap();
        let err = store
            .append_event(1, word.id, date(2024, 1, 2), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_find_event_by_date() {
        let store = InMemoryRecordStore::new();
        let word = store.insert_word(&NewWord::new(1, 1, "gato", "cat")).unwrap();
        let event = store.append_event(1, word.id, date(2024, 1, 1), 1).await.unwrap();

        let found = store.find_event(1, word.id, date(2024, 1, 1)).await.unwrap();
        assert_eq!(found, Some(event));
        assert!(store
            .find_event(1, word.id, date(2024, 1, 2))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_event(2, word.id, date(2024, 1, 1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_append_for_missing_word() {
        let store = InMemoryRecordStore::new();
        let err = store.append_event(1, 99, date(2024, 1, 1), 1).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_word_cascades() {
        let store = InMemoryRecordStore::new();
        let word = store.insert_word(&NewWord::new(1, 1, "gato", "cat")).unwrap();
        store.append_event(1, word.id, date(2024, 1, 1), 1).await.unwrap();

        assert!(store.delete_word(word.id).unwrap());
        assert!(!store.delete_word(word.id).unwrap());
        assert!(store.list_events(1, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summaries_include_unpracticed_words() {
        let store = InMemoryRecordStore::new();
        let a = store.insert_word(&NewWord::new(1, 1, "uno", "one")).unwrap();
        let b = store.insert_word(&NewWord::new(1, 1, "dos", "two")).unwrap();
        store.insert_word(&NewWord::new(2, 1, "tres", "three")).unwrap();

        store.append_event(1, a.id, date(2024, 1, 1), 1).await.unwrap();
        store.append_event(1, a.id, date(2024, 1, 2), 2).await.unwrap();

        let summaries = store.word_summaries(1, date(2024, 1, 2)).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].word.id, a.id);
        assert_eq!(summaries[0].completed_count, 2);
        assert!(summaries[0].practiced_today);
        assert_eq!(summaries[1].word.id, b.id);
        assert_eq!(summaries[1].completed_count, 0);
        assert!(!summaries[1].practiced_today);
    }
}
