//! Coalescing scheduler: at most one pending operation per key.
//!
//! Scheduling a key that is already pending cancels the old operation and
//! replaces it, pushing the deadline out again. Due operations are collected
//! by polling with the current time; `flush` runs one early (e.g. on
//! gesture end).

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Pending<V> {
    value: V,
    due_ms: f64,
}

/// Cancel-and-replace scheduler keyed by `K`.
#[derive(Debug, Clone)]
pub struct Coalescer<K, V> {
    window_ms: f64,
    pending: HashMap<K, Pending<V>>,
}

impl<K, V> Coalescer<K, V>
where
    K: Eq + Hash + Clone,
{
    /// A scheduler that delays each operation by `window_ms`.
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms, pending: HashMap::new() }
    }

    #[must_use]
    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Schedule `value` under `key`, due at `now_ms + window`. Returns the
    /// operation it replaced, if any.
    pub fn schedule(&mut self, key: K, value: V, now_ms: f64) -> Option<V> {
        self.schedule_at(key, value, now_ms + self.window_ms)
    }

    /// Schedule `value` under `key` at an explicit deadline.
    pub fn schedule_at(&mut self, key: K, value: V, due_ms: f64) -> Option<V> {
        self.pending
            .insert(key, Pending { value, due_ms })
            .map(|old| old.value)
    }

    /// Drop the pending operation for `key`.
    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|p| p.value)
    }

    /// Take the pending operation for `key` regardless of its deadline.
    pub fn flush(&mut self, key: &K) -> Option<V> {
        self.cancel(key)
    }

    /// Take every pending operation, earliest deadline first.
    pub fn flush_all(&mut self) -> Vec<(K, V)> {
        let mut all: Vec<(K, Pending<V>)> = self.pending.drain().collect();
        all.sort_by(|a, b| a.1.due_ms.total_cmp(&b.1.due_ms));
        all.into_iter().map(|(k, p)| (k, p.value)).collect()
    }

    /// Take every operation due at or before `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(K, V)> {
        let keys: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due_ms <= now_ms)
            .map(|(k, _)| k.clone())
            .collect();
        let mut due: Vec<(K, Pending<V>)> = keys
            .into_iter()
            .filter_map(|k| self.pending.remove(&k).map(|p| (k, p)))
            .collect();
        due.sort_by(|a, b| a.1.due_ms.total_cmp(&b.1.due_ms));
        due.into_iter().map(|(k, p)| (k, p.value)).collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.pending.values().map(|p| p.due_ms).min_by(f64::total_cmp)
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
