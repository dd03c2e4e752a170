//! Generation Lock: at most one in-flight generation per field key.
//!
//! The key is the field alone, not (template, field): generating `summary` for two
//! templates at once is still rejected.
//!
//! Acquisition is a single check-and-set under the mutex. Release is tied to
//! `GenerationGuard::drop`, so a generation that fails, times out, panics, or whose
//! future is dropped by a disconnecting caller still frees its field.
//!
//! Each acquisition carries a token. `invalidate` can evict a key early; the evicted
//! guard then finds a different (or no) token under its key and leaves it alone.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

#[derive(Debug, Default)]
pub struct GenerationLocks {
    held: Mutex<HashMap<String, u64>>,
    next_token: AtomicU64,
}

impl GenerationLocks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // A poisoned map is still consistent: every mutation is a single insert/remove.
    fn held(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `field_key`, or returns `None` if another generation holds it.
    pub fn try_acquire(self: &Arc<Self>, field_key: &str) -> Option<GenerationGuard> {
        let mut held = self.held();
        if held.contains_key(field_key) {
            return None;
        }
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        held.insert(field_key.to_string(), token);
        debug!("Generation lock acquired for '{field_key}' (token {token})");

        Some(GenerationGuard {
            locks: Arc::clone(self),
            field_key: field_key.to_string(),
            token,
        })
    }

    #[cfg(test)]
    pub fn is_locked(&self, field_key: &str) -> bool {
        self.held().contains_key(field_key)
    }

    /// Drops the lock on `field_key` regardless of who holds it.
    /// Returns whether a lock was held.
    pub fn invalidate(&self, field_key: &str) -> bool {
        self.held().remove(field_key).is_some()
    }

    /// Field keys currently generating, sorted.
    pub fn in_flight(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.held().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn release(&self, field_key: &str, token: u64) {
        let mut held = self.held();
        if held.get(field_key) == Some(&token) {
            held.remove(field_key);
            debug!("Generation lock released for '{field_key}' (token {token})");
        }
    }
}

/// Proof of holding the generation lock for one field. Releases on drop.
pub struct GenerationGuard {
    locks: Arc<GenerationLocks>,
    field_key: String,
    token: u64,
}

impl GenerationGuard {
    #[cfg(test)]
    pub fn field_key(&self) -> &str {
        &self.field_key
    }
}

impl fmt::Debug for GenerationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationGuard")
            .field("field_key", &self.field_key)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        self.locks.release(&self.field_key, self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_for_same_field_is_rejected() {
        let locks = GenerationLocks::new();
        let guard = locks.try_acquire("summary").unwrap();
        assert_eq!(guard.field_key(), "summary");
        assert!(locks.try_acquire("summary").is_none());
        assert!(locks.is_locked("summary"));
    }

    #[test]
    fn test_distinct_fields_lock_independently() {
        let locks = GenerationLocks::new();
        let _summary = locks.try_acquire("summary").unwrap();
        let _bio = locks.try_acquire("bio").unwrap();
        assert_eq!(locks.in_flight(), vec!["bio", "summary"]);
    }

    #[test]
    fn test_drop_releases_the_field() {
        let locks = GenerationLocks::new();
        drop(locks.try_acquire("summary").unwrap());
        assert!(!locks.is_locked("summary"));
        assert!(locks.try_acquire("summary").is_some());
    }

    #[test]
    fn test_stale_guard_does_not_release_reacquired_field() {
        let locks = GenerationLocks::new();
        let stale = locks.try_acquire("summary").unwrap();
        assert!(locks.invalidate("summary"));

        let fresh = locks.try_acquire("summary").unwrap();
        drop(stale);
        assert!(locks.is_locked("summary"), "stale guard must not free the new holder");

        drop(fresh);
        assert!(!locks.is_locked("summary"));
    }

    #[test]
    fn test_invalidate_unlocked_field_is_noop() {
        let locks = GenerationLocks::new();
        assert!(!locks.invalidate("summary"));
    }

    #[test]
    fn test_concurrent_acquire_admits_exactly_one() {
        let locks = GenerationLocks::new();
        let start = Arc::new(std::sync::Barrier::new(8));
        let tried = Arc::new(std::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let start = Arc::clone(&start);
                let tried = Arc::clone(&tried);
                std::thread::spawn(move || {
                    start.wait();
                    let guard = locks.try_acquire("summary");
                    let won = guard.is_some();
                    // keep the guard alive until every thread has tried
                    tried.wait();
                    drop(guard);
                    won
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
