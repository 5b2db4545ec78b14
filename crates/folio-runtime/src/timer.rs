#![forbid(unsafe_code)]

//! Deterministic deadline queue.
//!
//! Every delayed action in the runtime (settle passes, preload timeout,
//! cosmetic finish delays, scroll retries) is a keyed deadline in a
//! [`TimerQueue`]. Nothing sleeps and nothing fires on its own: the host
//! advances time and calls `drain_due`, which makes timer behavior exact
//! under a simulated clock.
//!
//! # Invariants
//!
//! 1. At most one deadline per key; scheduling an existing key replaces it.
//! 2. `drain_due(now)` returns keys with `deadline <= now` ordered by
//!    deadline, then by scheduling order.
//! 3. Drained and cancelled keys never fire again.

use core::time::Duration;

#[derive(Debug, Clone)]
struct TimerEntry<K> {
    key: K,
    deadline: Duration,
    seq: u64,
}

/// Keyed one-shot deadlines.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<TimerEntry<K>>,
    next_seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + PartialEq> TimerQueue<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `key` to fire at `deadline`, replacing any earlier arming.
    pub fn schedule(&mut self, key: K, deadline: Duration) {
        self.cancel(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(TimerEntry { key, deadline, seq });
    }

    /// Disarm `key`. Returns whether it was armed.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    /// Whether `key` is armed.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Deadline of `key`, if armed.
    #[must_use]
    pub fn deadline_of(&self, key: K) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.deadline)
    }

    /// Remove and return every key due at `now`.
    pub fn drain_due(&mut self, now: Duration) -> Vec<K> {
        let mut due: Vec<TimerEntry<K>> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.key).collect()
    }

    /// Earliest armed deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Disarm everything. Returns how many timers were armed.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        A,
        B,
        C,
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(Key::A, ms(600));
        q.schedule(Key::B, ms(200));
        q.schedule(Key::C, ms(400));
        assert_eq!(q.drain_due(ms(1000)), vec![Key::B, Key::C, Key::A]);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(Key::C, ms(100));
        q.schedule(Key::A, ms(100));
        q.schedule(Key::B, ms(100));
        assert_eq!(q.drain_due(ms(100)), vec![Key::C, Key::A, Key::B]);
    }

    #[test]
    fn not_yet_due_stays_armed() {
        let mut q = TimerQueue::new();
        q.schedule(Key::A, ms(200));
        assert!(q.drain_due(ms(199)).is_empty());
        assert_eq!(q.next_deadline(), Some(ms(200)));
        assert_eq!(q.drain_due(ms(200)), vec![Key::A]);
        assert!(q.drain_due(ms(10_000)).is_empty());
    }

    #[test]
    fn reschedule_replaces() {
        let mut q = TimerQueue::new();
        q.schedule(Key::A, ms(100));
        q.schedule(Key::A, ms(900));
        assert_eq!(q.len(), 1);
        assert_eq!(q.deadline_of(Key::A), Some(ms(900)));
        assert!(q.drain_due(ms(500)).is_empty());
    }

    #[test]
    fn cancel_and_clear() {
        let mut q = TimerQueue::new();
        q.schedule(Key::A, ms(1));
        q.schedule(Key::B, ms(2));
        assert!(q.cancel(Key::A));
        assert!(!q.cancel(Key::A));
        assert!(!q.contains(Key::A));
        assert_eq!(q.clear(), 1);
        assert_eq!(q.next_deadline(), None);
    }
}
