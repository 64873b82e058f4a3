//! Cooperative timer table
//!
//! Delayed and repeating actions keyed by `(owner, tag)`. One task per key;
//! scheduling under a taken key replaces the old task. Everything runs on the
//! simulation clock, never wall time.

use std::collections::BTreeMap;

/// Which entity a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Owner {
    Scene,
    Player,
    Collectible(u32),
}

/// How many times a task fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Times(u32),
    Forever,
}

#[derive(Debug, Clone)]
struct Task<A> {
    action: A,
    due: f64,
    interval: f64,
    /// Fires left including the pending one (None = forever)
    remaining: Option<u32>,
    seq: u64,
    /// Sweep this task last fired in; a zero-interval repeat waits for a later one
    fired_through: f64,
}

/// A task that came due
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<A> {
    pub owner: Owner,
    pub tag: &'static str,
    pub action: A,
    /// Simulation time the task was due at
    pub at: f64,
}

/// Per-entity task table
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: f64,
    tasks: BTreeMap<(Owner, &'static str), Task<A>>,
    next_seq: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            tasks: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Current simulation time (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Fire `action` once after `delay` seconds
    pub fn schedule_after(&mut self, owner: Owner, tag: &'static str, delay: f32, action: A) {
        self.schedule_repeating(owner, tag, delay, Repeat::Once, action);
    }

    /// Wait `interval`, fire, and repeat as requested.
    ///
    /// `Repeat::Times(0)` schedules nothing (and drops any task under the key).
    /// A non-positive interval repeats once per sweep instead of spinning.
    pub fn schedule_repeating(
        &mut self,
        owner: Owner,
        tag: &'static str,
        interval: f32,
        repeat: Repeat,
        action: A,
    ) {
        let remaining = match repeat {
            Repeat::Once => Some(1),
            Repeat::Times(0) => {
                self.tasks.remove(&(owner, tag));
                return;
            }
            Repeat::Times(n) => Some(n),
            Repeat::Forever => None,
        };
        let interval = f64::from(interval.max(0.0));
        let seq = self.bump_seq();
        let task = Task {
            action,
            due: self.now + interval,
            interval,
            remaining,
            seq,
            fired_through: f64::NEG_INFINITY,
        };
        if self.tasks.insert((owner, tag), task).is_some() {
            log::debug!("Replaced scheduled task {:?}/{}", owner, tag);
        }
    }

    /// Cancel one task. No-op if absent.
    pub fn cancel(&mut self, owner: Owner, tag: &'static str) {
        if self.tasks.remove(&(owner, tag)).is_some() {
            log::debug!("Cancelled task {:?}/{}", owner, tag);
        }
    }

    /// Cancel every task of an owner. No-op if none.
    pub fn cancel_owner(&mut self, owner: Owner) {
        self.tasks.retain(|(o, _), _| *o != owner);
    }

    pub fn is_scheduled(&self, owner: Owner, tag: &'static str) -> bool {
        self.tasks.contains_key(&(owner, tag))
    }

    /// Fires still pending for a task (None = absent, Some(None) = forever)
    pub fn remaining(&self, owner: Owner, tag: &'static str) -> Option<Option<u32>> {
        self.tasks.get(&(owner, tag)).map(|t| t.remaining)
    }

    /// Seconds until a task is next due
    pub fn time_until(&self, owner: Owner, tag: &'static str) -> Option<f64> {
        self.tasks.get(&(owner, tag)).map(|t| t.due - self.now)
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<A: Clone> Scheduler<A> {
    /// Pop the earliest task due at or before `until`, moving the clock to it.
    ///
    /// Callers drain this in a loop so each fired action can reschedule or
    /// cancel before the next one is considered.
    pub fn pop_due(&mut self, until: f64) -> Option<Fired<A>> {
        let key = self
            .tasks
            .iter()
            .filter(|(_, t)| t.due <= until && until > t.fired_through)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(k, _)| *k)?;

        let seq = self.bump_seq();
        let task = self.tasks.get_mut(&key)?;
        self.now = self.now.max(task.due);
        let fired = Fired {
            owner: key.0,
            tag: key.1,
            action: task.action.clone(),
            at: task.due,
        };

        let exhausted = match task.remaining {
            Some(n) if n <= 1 => true,
            Some(ref mut n) => {
                *n -= 1;
                false
            }
            None => false,
        };
        if exhausted {
            self.tasks.remove(&key);
        } else if task.interval > 0.0 {
            task.due += task.interval;
            task.seq = seq;
        } else {
            task.due = until;
            task.fired_through = until;
            task.seq = seq;
        }
        Some(fired)
    }

    /// Move the clock to `until` once all due tasks are drained
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }

    /// Advance by `dt`, returning everything that fired in order
    pub fn advance(&mut self, dt: f32) -> Vec<Fired<A>> {
        let until = self.now + f64::from(dt);
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(until) {
            fired.push(f);
        }
        self.settle(until);
        fired
    }
}
