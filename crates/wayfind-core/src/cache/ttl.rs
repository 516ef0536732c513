use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Default time-to-live for cached responses.
/// Five minutes keeps browsing snappy without serving noticeably old data.
pub const DEFAULT_TTL_SECS: i64 = 300;

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.stored_at
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() <= ttl
    }

    pub fn age_minutes(&self) -> i64 {
        self.age().num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative age)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// In-memory key/value cache with a fixed time-to-live.
///
/// Staleness is checked lazily: a stale entry is dropped the moment it is
/// read and reported as a miss. There is no capacity bound and no
/// background sweep. Not synchronized; owners that share it across tasks
/// wrap it in a mutex.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        self.entry(key).map(|entry| entry.value.clone())
    }

    /// The live entry for `key`, with its storage time.
    pub fn entry(&mut self, key: &K) -> Option<&CacheEntry<V>> {
        let fresh = self.entries.get(key)?.is_fresh(self.ttl);
        if !fresh {
            debug!("Dropping stale cache entry");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key)
    }

    pub fn put(&mut self, key: K, value: V) {
        self.entries.insert(key, CacheEntry::new(value));
    }

    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, stale ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &K, by: Duration) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stored_at = entry.stored_at - by;
        }
    }
}

impl<K: Eq + Hash, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
