use lru::LruCache;
use parking_lot::{Mutex, MutexGuard};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, interval};
use tracing::{debug, trace};

use crate::config::LimiterConfig;
use crate::error::ConfigError;
use crate::metrics::LIMITER_KEYS;

// Counter entry with its expiry deadline
#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u32,
    expires_at: Instant,
}

// unlocked view, handed out by TokenRegistry::entries
pub struct Entries {
    cache: LruCache<String, Counter>,
    window: Duration,
}

impl Entries {
    // bumps recency only; count and expiry stay as they are
    pub fn get(&mut self, key: &str) -> Option<u32> {
        let now = Instant::now();
        match self.cache.get(key) {
            Some(counter) if now < counter.expires_at => return Some(counter.count),
            Some(_) => {}
            None => return None,
        }
        self.cache.pop(key);
        trace!("expired entry dropped on read");
        None
    }

    // fresh window; returns the evicted key, if any
    pub fn set(&mut self, key: &str, count: u32) -> Option<String> {
        let counter = Counter {
            count,
            expires_at: Instant::now() + self.window,
        };
        match self.cache.push(key.to_owned(), counter) {
            Some((evicted, _)) if evicted != key => {
                debug!("limiter at capacity, evicted least recently used key");
                Some(evicted)
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let stale: Vec<String> = self
            .cache
            .iter()
            .filter(|(_, counter)| now >= counter.expires_at)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            self.cache.pop(key);
        }
        stale.len()
    }
}

// process-wide LRU + TTL counters behind one lock
pub struct TokenRegistry {
    entries: Mutex<Entries>,
    capacity: NonZeroUsize,
    window: Duration,
}

impl TokenRegistry {
    pub fn new(config: LimiterConfig) -> Result<Self, ConfigError> {
        let capacity = config.validate()?;
        Ok(Self {
            entries: Mutex::new(Entries {
                cache: LruCache::new(capacity),
                window: config.window,
            }),
            capacity,
            window: config.window,
        })
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.entries.lock().get(key)
    }

    pub fn set(&self, key: &str, count: u32) -> Option<String> {
        self.entries.lock().set(key, count)
    }

    pub fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock()
    }

    // counts expired entries until they are purged
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn purge_expired(&self) -> usize {
        self.entries.lock().purge_expired()
    }
}

// Expiry sweeper - purges stale counters and publishes the resident key count
pub async fn expiry_sweeper(registry: Arc<TokenRegistry>, scope: &'static str, every: Duration) {
    let mut interval = interval(every);

    debug!(scope, ?every, "expiry sweeper started");

    loop {
        interval.tick().await;

        let purged = registry.purge_expired();
        let resident = registry.len();
        LIMITER_KEYS.with_label_values(&[scope]).set(resident as f64);

        if purged > 0 {
            trace!(scope, purged, resident, "purged expired limiter entries");
        }
    }
}
