use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};
use core::time::Duration;

/// Handle to a scheduled task, used to cancel it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

#[derive(Clone, Debug)]
struct ScheduledTask<T> {
    due: Duration,
    token: TimerToken,
    task: T,
}

impl<T> PartialEq for ScheduledTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl<T> Eq for ScheduledTask<T> {}

impl<T> PartialOrd for ScheduledTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTask<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // earliest first, ties in scheduling order
        self.due
            .cmp(&other.due)
            .then_with(|| self.token.cmp(&other.token))
    }
}

/// Cooperative timer queue driven by explicit clock advances.
///
/// Nothing runs on its own: the owner advances the clock and pops due tasks one at a time, so a task may
/// schedule follow-ups relative to the moment it fired.
///
/// ```
/// use core::time::Duration;
/// use pairflip_core::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// scheduler.schedule(Duration::from_secs(1), "flip back");
///
/// let deadline = scheduler.deadline_after(Duration::from_millis(500));
/// assert_eq!(scheduler.pop_due(deadline), None);
/// scheduler.advance_to(deadline);
///
/// let deadline = scheduler.deadline_after(Duration::from_millis(500));
/// assert_eq!(scheduler.pop_due(deadline), Some("flip back"));
/// ```
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Duration,
    pending: BinaryHeap<Reverse<ScheduledTask<T>>>,
    next_token: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            pending: BinaryHeap::new(),
            next_token: 0,
        }
    }

    /// Current scheduler clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Reverse(ScheduledTask {
            due: self.now + delay,
            token,
            task,
        }));
        token
    }

    /// Returns whether the task was still pending.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|Reverse(entry)| entry.token != token);
        self.pending.len() != before
    }

    /// Time left until the earliest pending task.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .peek()
            .map(|Reverse(entry)| entry.due.saturating_sub(self.now))
    }

    pub fn deadline_after(&self, delta: Duration) -> Duration {
        self.now + delta
    }

    /// Pops the earliest task due at or before `deadline`, moving the clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let due = self.pending.peek().map(|Reverse(entry)| entry.due)?;
        if due > deadline {
            return None;
        }
        let Reverse(entry) = self.pending.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
