//! In-process session cache: token -> User with a fixed TTL per entry.
//!
//! This is the first tier of session resolution. It exists so that we do
//! not round-trip to the session authority on every request; an entry is
//! trusted for the configured TTL and then re-verified.
//!
//! Notes:
//! - The cache is local to one process instance. Cross-instance
//!   invalidation is a known limitation, not a goal.
//! - Expiration is enforced twice: lazily on `get` (no stale entry is
//!   ever returned, even if the sweeper is behind) and proactively by a
//!   background sweep task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::types::User;

/// Default time an entry is trusted without re-verification.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default wake interval of the background sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    user: User,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Token-keyed TTL cache.
///
/// One instance is created at startup and shared as `Arc<SessionCache>`
/// between the resolver, the invalidation handler and the sweep task.
/// Reads take the read lock and may proceed concurrently; `set`/`delete`
/// and the sweep take the write lock for a brief critical section.
#[derive(Debug)]
pub struct SessionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached User if present and not expired.
    ///
    /// An entry observed past its expiration is removed on the spot and
    /// reported absent, so correctness never depends on the sweep having
    /// run.
    pub fn get(&self, token: &str) -> Option<User> {
        let now = Instant::now();

        {
            let entries = self.entries.read();
            match entries.get(token) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.user.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: take the write lock and drop the entry. Re-check the
        // deadline in case a concurrent `set` replaced it between the
        // two locks.
        let mut entries = self.entries.write();
        if entries.get(token).is_some_and(|e| e.is_expired(now)) {
            entries.remove(token);
        }
        None
    }

    /// Inserts or replaces the entry for `token`.
    ///
    /// The expiration is reset to now + TTL either way; at most one entry
    /// per token exists at any time, the last write prevails.
    pub fn set(&self, token: &str, user: User) {
        let entry = CacheEntry {
            user,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().insert(token.to_string(), entry);
    }

    /// Removes the entry if present. Absent tokens are a silent no-op.
    ///
    /// Returns whether an entry was actually removed, so callers can log
    /// real invalidations without a separate lookup.
    pub fn delete(&self, token: &str) -> bool {
        self.entries.write().remove(token).is_some()
    }

    /// Drops every expired entry. Returns the number evicted.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Spawns the background sweep task.
    ///
    /// The task wakes every `interval`, evicts expired entries and goes
    /// back to sleep. It holds only a `Weak` reference to the cache and
    /// exits once the cache is dropped; the returned handle additionally
    /// aborts it on drop so shutdown does not wait for the next tick.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> SweeperHandle {
        let cache = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it, there is
            // nothing to evict at startup.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let evicted = cache.evict_expired();
                if evicted > 0 {
                    tracing::debug!(evicted, "session cache sweep");
                }
            }
        });

        SweeperHandle { task }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Owner handle for the sweep task. Dropping it stops the sweep.
#[derive(Debug)]
pub struct SweeperHandle {
    task: tokio::task::JoinHandle<()>,
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
