//! Virtual-time timer registry driving every periodic and deferred callback.
//!
//! Time is an abstract millisecond counter that only moves when the owner
//! pops due timers. Timers are tagged with a caller-defined kind and either
//! repeat on a fixed period or fire once. A cancelled timer never fires, even
//! if its deadline is already queued.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Handle to a scheduled timer. Never reused within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct TimerEntry<K> {
    kind: K,
    period: Option<u64>,
    due: u64,
}

pub struct Scheduler<K> {
    now: u64,
    next_id: u64,
    next_seq: u64,
    timers: HashMap<TimerId, TimerEntry<K>>,
    /// (due, seq, id). Entries for cancelled or re-armed timers are skipped lazily.
    queue: BinaryHeap<Reverse<(u64, u64, TimerId)>>,
}

impl<K: Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 1,
            next_seq: 0,
            timers: HashMap::new(),
            queue: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedules `kind` to fire every `period` ms, first at `now + period`.
    pub fn schedule_repeating(&mut self, kind: K, period: u64) -> TimerId {
        self.insert(kind, Some(period.max(1)), period.max(1))
    }

    /// Schedules `kind` to fire once after `delay` ms.
    pub fn schedule_once(&mut self, kind: K, delay: u64) -> TimerId {
        self.insert(kind, None, delay)
    }

    fn insert(&mut self, kind: K, period: Option<u64>, delay: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        self.timers.insert(id, TimerEntry { kind, period, due });
        self.push(due, id);
        id
    }

    fn push(&mut self, due: u64, id: TimerId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse((due, seq, id)));
    }

    /// Returns true if the timer was still active.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn kind_of(&self, id: TimerId) -> Option<K> {
        self.timers.get(&id).map(|entry| entry.kind)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of active timers whose kind satisfies `pred`.
    pub fn count_matching(&self, pred: impl Fn(&K) -> bool) -> usize {
        self.timers.values().filter(|entry| pred(&entry.kind)).count()
    }

    /// Earliest pending deadline among active timers.
    pub fn next_deadline(&mut self) -> Option<u64> {
        self.discard_stale();
        self.queue.peek().map(|Reverse((due, _, _))| *due)
    }

    /// Pops the earliest active timer due at or before `until`, moving the
    /// clock to its deadline. Repeating timers are re-armed before being
    /// returned, so the caller may cancel them during dispatch.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, K)> {
        self.discard_stale();
        let Reverse((due, _, id)) = *self.queue.peek()?;
        if due > until {
            return None;
        }
        self.queue.pop();
        self.now = self.now.max(due);

        let (kind, period) = {
            let entry = self.timers.get(&id)?;
            (entry.kind, entry.period)
        };
        match period {
            Some(period) => {
                let next_due = due + period;
                if let Some(entry) = self.timers.get_mut(&id) {
                    entry.due = next_due;
                }
                self.push(next_due, id);
            }
            None => {
                self.timers.remove(&id);
            }
        }
        Some((id, kind))
    }

    /// Moves the clock forward without firing anything. Used once all due
    /// timers up to `time` have been popped.
    pub fn set_now(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    fn discard_stale(&mut self) {
        while let Some(&Reverse((due, _, id))) = self.queue.peek() {
            match self.timers.get(&id) {
                Some(entry) if entry.due == due => break,
                _ => {
                    self.queue.pop();
                }
            }
        }
    }
}

impl<K: Copy> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
