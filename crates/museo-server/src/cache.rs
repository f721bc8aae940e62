use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// Read-through cache whose entries expire a fixed time after insertion.
///
/// The lock is never held while a value is being produced, so two requests
/// that miss at the same time may both compute; the later insert wins.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value for `key`, if it has not expired
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.lock().await.insert(
            key.into(),
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Return the cached value or produce, store and return a fresh one.
    ///
    /// Errors are passed through and never cached.
    pub async fn get_or_try_insert<F, Fut, E>(&self, key: &str, produce: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for {}", key);
        let value = produce().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
