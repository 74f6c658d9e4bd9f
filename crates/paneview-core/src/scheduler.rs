#![forbid(unsafe_code)]

//! Host-driven time and deferred work.
//!
//! Controls never read the wall clock or block. The embedding host advances
//! time explicitly and the [`Scheduler`] hands back whatever work became due:
//!
//! - **Deferred tasks** run on the next drain, in FIFO order (the equivalent of
//!   a microtask continuation).
//! - **Timers** become ready once the host's clock passes their deadline and
//!   are released in `(deadline, insertion)` order.
//!
//! Every entry carries a [`CancellationToken`]; entries whose scope was
//! cancelled are silently dropped and never returned.

use std::collections::VecDeque;
use std::time::Duration;

use crate::cancellation::CancellationToken;

/// Monotonic clock abstraction.
pub trait Clock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now(&self) -> Duration {
        self.now
    }
}

#[derive(Debug)]
struct Entry<T> {
    token: CancellationToken,
    task: T,
}

#[derive(Debug)]
struct Timer<T> {
    deadline: Duration,
    seq: u64,
    entry: Entry<T>,
}

/// Cancellation-aware queue of deferred tasks and timers.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    seq: u64,
    ready: VecDeque<Entry<T>>,
    /// Sorted by `(deadline, seq)`.
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            ready: VecDeque::new(),
            timers: Vec::new(),
        }
    }

    /// The last time passed to [`advance_to`](Self::advance_to).
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `task` to run on the next drain.
    pub fn defer(&mut self, token: CancellationToken, task: T) {
        self.ready.push_back(Entry { token, task });
    }

    /// Queue `task` to become ready `delay` after the current time.
    ///
    /// A zero delay still waits for the next [`advance_to`](Self::advance_to),
    /// like a zero-length `setTimeout`.
    pub fn defer_after(&mut self, delay: Duration, token: CancellationToken, task: T) {
        let deadline = self.now.saturating_add(delay);
        self.seq += 1;
        let timer = Timer {
            deadline,
            seq: self.seq,
            entry: Entry { token, task },
        };
        let at = self
            .timers
            .partition_point(|t| (t.deadline, t.seq) <= (deadline, timer.seq));
        self.timers.insert(at, timer);
    }

    /// Move the clock forward and release every timer due at or before `now`.
    ///
    /// Time never moves backwards; an earlier `now` only releases timers that
    /// are already due.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
        let due = self.timers.partition_point(|t| t.deadline <= self.now);
        for timer in self.timers.drain(..due) {
            self.ready.push_back(timer.entry);
        }
    }

    /// Pop the next ready task whose scope is still live.
    pub fn pop(&mut self) -> Option<T> {
        while let Some(entry) = self.ready.pop_front() {
            if !entry.token.is_cancelled() {
                return Some(entry.task);
            }
        }
        None
    }

    /// Drop every queued entry whose scope was cancelled.
    pub fn purge_cancelled(&mut self) {
        self.ready.retain(|e| !e.token.is_cancelled());
        self.timers.retain(|t| !t.entry.token.is_cancelled());
    }

    /// Earliest pending timer deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .iter()
            .find(|t| !t.entry.token.is_cancelled())
            .map(|t| t.deadline)
    }

    /// Number of live entries (ready or waiting).
    pub fn pending(&self) -> usize {
        self.ready.iter().filter(|e| !e.token.is_cancelled()).count()
            + self
                .timers
                .iter()
                .filter(|t| !t.entry.token.is_cancelled())
                .count()
    }

    /// Whether any deferred task is ready to run right now.
    pub fn has_ready(&self) -> bool {
        self.ready.iter().any(|e| !e.token.is_cancelled())
    }

    /// Whether nothing live is queued.
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}
