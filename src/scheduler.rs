//! Deferred execution for cooperative, single-threaded hosts

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::time::Duration;

/// A deferred callback. It receives the context the scheduler is driven with.
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// Identifies a scheduled task so it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

/// The host's deferred-execution primitive
pub trait Schedule<C: ?Sized> {
    /// Run `task` once `delay` has elapsed. Never blocks the caller.
    fn after(&mut self, delay: Duration, task: Task<C>) -> TimerId;

    /// Drop a task that has not run yet. Returns `false` if it already ran or
    /// was cancelled before.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Timer driven by discrete steps, for per-frame update loops.
///
/// Time only moves when [`advance`](FrameScheduler::advance) is called, and due
/// tasks run inside that call on the caller's thread.
///
/// # Examples
///
/// ```
/// use recycling_pool::{FrameScheduler, Schedule};
/// use std::time::Duration;
///
/// let mut frames = FrameScheduler::<Vec<&'static str>>::new();
/// let mut log = Vec::new();
///
/// frames.after(
///     Duration::from_millis(20),
///     Box::new(|log: &mut Vec<&'static str>| log.push("fired")),
/// );
///
/// frames.advance(Duration::from_millis(16), &mut log);
/// assert!(log.is_empty());
///
/// frames.advance(Duration::from_millis(16), &mut log);
/// assert_eq!(log, ["fired"]);
/// ```
pub struct FrameScheduler<C: ?Sized> {
    now: Duration,
    next_id: u64,
    // Ties on due time are broken by id, so equal deadlines run in scheduling order.
    queue: BinaryHeap<Reverse<(Duration, TimerId)>>,
    tasks: HashMap<TimerId, Task<C>>,
}

impl<C: ?Sized> FrameScheduler<C> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }

    /// Scheduled time elapsed so far
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Move the clock forward by `dt` and run every task that has come due.
    ///
    /// Returns how many tasks ran.
    pub fn advance(&mut self, dt: Duration, ctx: &mut C) -> usize {
        self.now = self.now.saturating_add(dt);
        let mut ran = 0;

        while let Some(&Reverse((due, id))) = self.queue.peek() {
            if due > self.now {
                break;
            }
            self.queue.pop();

            // Cancelled tasks leave their queue entry behind.
            if let Some(task) = self.tasks.remove(&id) {
                task(ctx);
                ran += 1;
            }
        }

        ran
    }
}

impl<C: ?Sized> Default for FrameScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for FrameScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("now", &self.now)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

impl<C: ?Sized> Schedule<C> for FrameScheduler<C> {
    fn after(&mut self, delay: Duration, task: Task<C>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        self.queue.push(Reverse((self.now.saturating_add(delay), id)));
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        if self.tasks.remove(&id).is_none() {
            return false;
        }

        // Drop heap entries of cancelled tasks once they outnumber live ones.
        if self.queue.len() > 2 * self.tasks.len() {
            let tasks = &self.tasks;
            self.queue.retain(|Reverse((_, id))| tasks.contains_key(id));
        }
        true
    }
}
