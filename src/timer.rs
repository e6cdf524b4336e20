use std::cell::Cell;
use std::time::Instant;

/// Milliseconds on the session's monotonic clock.
pub type Millis = u64;

/// Source of "now" for the engines. Engines never read a clock themselves.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Wall clock measured from the moment it was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Millis) -> Millis {
        let next = self.now.get() + by;
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<K> {
    due: Millis,
    seq: u64,
    kind: K,
}

/// One-shot timers owned by a single session.
///
/// Periodic behaviour is expressed by rescheduling from the callback. Entries
/// with the same due time fire in scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
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

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, due: Millis, kind: K) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due, seq, kind });
        TimerId(seq)
    }

    pub fn schedule_in(&mut self, now: Millis, delay: Millis, kind: K) -> TimerId {
        self.schedule_at(now.saturating_add(delay), kind)
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.seq != id.0);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn earliest(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.earliest().map(|i| self.entries[i].due)
    }

    /// Removes and returns the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, K)> {
        let idx = self.earliest()?;
        if self.entries[idx].due > now {
            return None;
        }
        let entry = self.entries.swap_remove(idx);
        Some((entry.due, entry.kind))
    }
}

impl<K: PartialEq> TimerQueue<K> {
    pub fn due_of(&self, kind: &K) -> Option<Millis> {
        self.entries
            .iter()
            .filter(|e| &e.kind == kind)
            .map(|e| e.due)
            .min()
    }
}
