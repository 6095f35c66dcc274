//! # Keyed Debouncer
//!
//! One deferred action per key. Arming a key that is already armed replaces
//! both its payload and its deadline, so a burst of updates yields a single
//! trailing action carrying the last payload. The debouncer never runs
//! anything itself; whoever owns it asks for due payloads with
//! [`Debouncer::take_due`], which keeps it independent of any event loop.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

struct Pending<P> {
    deadline: Instant,
    payload: P,
}

/// Arm/cancel a single deferred payload per key
pub struct Debouncer<K, P> {
    pending: HashMap<K, Pending<P>>,
}

impl<K, P> Debouncer<K, P>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Arm `key` to fire `payload` at `deadline`.
    ///
    /// Returns `true` if an earlier pending payload for the key was replaced.
    pub fn arm(&mut self, key: K, payload: P, deadline: Instant) -> bool {
        self.pending
            .insert(key, Pending { deadline, payload })
            .is_some()
    }

    /// Disarm `key`, returning the payload that would have fired
    pub fn cancel(&mut self, key: K) -> Option<P> {
        self.pending.remove(&key).map(|pending| pending.payload)
    }

    pub fn is_armed(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among armed keys
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|pending| pending.deadline).min()
    }

    /// Disarm and return every payload whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<P> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(key, _)| *key)
            .collect();

        let mut fired: Vec<Pending<P>> = due
            .into_iter()
            .filter_map(|key| self.pending.remove(&key))
            .collect();
        fired.sort_by_key(|pending| pending.deadline);
        fired.into_iter().map(|pending| pending.payload).collect()
    }

    /// Disarm everything, earliest deadline first
    pub fn drain(&mut self) -> Vec<P> {
        let mut fired: Vec<Pending<P>> = self.pending.drain().map(|(_, pending)| pending).collect();
        fired.sort_by_key(|pending| pending.deadline);
        fired.into_iter().map(|pending| pending.payload).collect()
    }
}

impl<K, P> Default for Debouncer<K, P>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
