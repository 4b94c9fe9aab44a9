//! Time-boxed single-slot read cache.
//!
//! Holds one derived value (the message listing) for a fixed TTL. Writes
//! that could change the value call [`ReadCache::invalidate`], which drops
//! the entry regardless of age.
//!
//! # Design
//!
//! - One slot, no eviction policy, no size bound
//! - An entry is served iff `now - written_at < ttl`
//! - The lock is never held while computing; overlapping recomputations
//!   race benignly and the later write wins
//! - Every invalidation bumps a generation counter; a computation that
//!   started before an invalidation does not store its (possibly stale)
//!   result
//!
//! ```text
//!  get_or_compute ──▶ fresh? ──yes──▶ clone value
//!                       │no
//!                       ▼
//!                    compute ──▶ store if generation unchanged ──▶ value
//! ```

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Default listing TTL (60 seconds).
pub const DEFAULT_TTL: Duration = Duration::from_millis(60_000);

struct Entry<V> {
    value: V,
    written_at: Instant,
}

struct Slot<V> {
    entry: Option<Entry<V>>,
    generation: u64,
}

/// A single memoized value with a TTL.
pub struct ReadCache<V> {
    slot: Mutex<Slot<V>>,
    ttl: Duration,
}

impl<V: Clone> ReadCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(Slot {
                entry: None,
                generation: 0,
            }),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The slot only holds derived data, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Slot<V>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached value, if present and fresh.
    pub fn get(&self) -> Option<V> {
        self.lookup().0
    }

    /// Whether a fresh entry exists.
    pub fn is_fresh(&self) -> bool {
        self.get().is_some()
    }

    fn lookup(&self) -> (Option<V>, u64) {
        let slot = self.lock();
        let value = slot
            .entry
            .as_ref()
            .filter(|e| e.written_at.elapsed() < self.ttl)
            .map(|e| e.value.clone());
        (value, slot.generation)
    }

    fn store(&self, value: V, generation: u64) {
        let mut slot = self.lock();
        if slot.generation == generation {
            slot.entry = Some(Entry {
                value,
                written_at: Instant::now(),
            });
        } else {
            tracing::debug!("listing cache invalidated during compute; result not stored");
        }
    }

    /// Return the fresh value, or compute, store and return a new one.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> V) -> V {
        let (cached, generation) = self.lookup();
        if let Some(value) = cached {
            tracing::debug!("listing cache hit");
            return value;
        }

        tracing::debug!("listing cache miss");
        let value = compute();
        self.store(value.clone(), generation);
        value
    }

    /// Async, fallible form of [`get_or_compute`](Self::get_or_compute).
    ///
    /// A failed computation stores nothing and leaves any entry untouched.
    pub async fn get_or_try_compute<F, Fut, E>(&self, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let (cached, generation) = self.lookup();
        if let Some(value) = cached {
            tracing::debug!("listing cache hit");
            return Ok(value);
        }

        tracing::debug!("listing cache miss");
        let value = compute().await?;
        self.store(value.clone(), generation);
        Ok(value)
    }

    /// Drop the entry unconditionally.
    pub fn invalidate(&self) {
        let mut slot = self.lock();
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
    }
}

impl<V: Clone> Default for ReadCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
