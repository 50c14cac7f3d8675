//! Per-(user, word) write serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::Mutex as AsyncMutex;

use crate::error::{TrackerError, TrackerResult};
use crate::types::{UserId, WordId};

type PairKey = (UserId, WordId);

/// Registry of async mutexes, one per (user, word) pair with a write in flight.
///
/// Entries are weak so idle pairs do not accumulate; dead entries are pruned
/// whenever a handle is requested.
#[derive(Default)]
pub(crate) struct PairLocks {
    inner: Mutex<HashMap<PairKey, Weak<AsyncMutex<()>>>>,
}

impl PairLocks {
    /// Get the mutex for a pair, creating it if no writer holds one.
    pub(crate) fn handle(&self, user_id: UserId, word_id: WordId) -> TrackerResult<Arc<AsyncMutex<()>>> {
        let mut map = self
            .inner
            .lock()
            .map_err(|e| TrackerError::Internal(format!("pair lock registry poisoned: {}", e)))?;

        map.retain(|_, lock| lock.strong_count() > 0);

        let key = (user_id, word_id);
        if let Some(existing) = map.get(&key).and_then(Weak::upgrade) {
            return Ok(existing);
        }

        let fresh = Arc::new(AsyncMutex::new(()));
        map.insert(key, Arc::downgrade(&fresh));
        Ok(fresh)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_pair_shares_lock() {
        let locks = PairLocks::default();
        let a = locks.handle(1, 1).unwrap();
        let b = locks.handle(1, 1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_different_pairs_independent() {
        let locks = PairLocks::default();
        let a = locks.handle(1, 1).unwrap();
        let b = locks.handle(1, 2).unwrap();
        let c = locks.handle(2, 1).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_idle_pairs_pruned() {
        let locks = PairLocks::default();
        drop(locks.handle(1, 1).unwrap());
        drop(locks.handle(1, 2).unwrap());
        let _held = locks.handle(3, 3).unwrap();
        assert_eq!(locks.len(), 1);
    }
}
