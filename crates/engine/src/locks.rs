//! Per-key write serialization.
//!
//! Every mutation of a ledger runs while holding the lock of its user key,
//! so two writers of the same ledger never interleave their
//! read-modify-write. Different keys never contend.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// Held for the duration of one mutation. Dropping it releases the key and
/// forgets the entry once nobody else is waiting on it.
#[derive(Debug)]
pub(crate) struct KeyGuard {
    key: String,
    map: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    pub(crate) async fn lock(&self, key: &str) -> KeyGuard {
        let entry = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(key.to_string()).or_default())
        };
        let guard = entry.lock_owned().await;

        KeyGuard {
            key: key.to_string(),
            map: Arc::clone(&self.inner),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one inside our guard.
        if map
            .get(&self.key)
            .is_some_and(|entry| Arc::strong_count(entry) == 2)
        {
            map.remove(&self.key);
        }
        self.guard.take();
    }
}
