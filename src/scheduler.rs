//! Cooperative Scheduler - virtual-clock timer source
//!
//! All polling loops in the engine (state-controller polling, the
//! INITIALIZING auto-advance, refresh ticks) register here instead of
//! spawning real timers. `advance()` walks a virtual clock forward and
//! reports which tasks came due, in firing order, so the whole engine can
//! be driven deterministically in tests and embedded in any host loop.
//!
//! Single-threaded by design: tasks are ids, not callbacks, so firing a
//! task never re-enters the scheduler.

use serde::{Deserialize, Serialize};

/// Opaque handle to a scheduled task. Cancel with [`Scheduler::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    /// Human-readable tag, for logs only.
    tag: String,
    next_due_ms: u64,
    /// None = one-shot, removed after firing.
    period_ms: Option<u64>,
}

/// A task that came due during an `advance()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Firing {
    pub id: TaskId,
    pub tag: String,
    /// Virtual time at which the task fired.
    pub at_ms: u64,
}

#[derive(Debug)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Register a repeating task. First firing is one full period from now.
    pub fn schedule_repeating(&mut self, tag: &str, period_ms: u64) -> TaskId {
        debug_assert!(period_ms > 0, "repeating task needs a positive period");
        let id = self.alloc_id();
        self.tasks.push(Task {
            id,
            tag: tag.to_string(),
            next_due_ms: self.now_ms + period_ms,
            period_ms: Some(period_ms),
        });
        log::debug!("scheduled repeating task '{}' every {}ms", tag, period_ms);
        id
    }

    /// Register a one-shot task due after `delay_ms`.
    pub fn schedule_once(&mut self, tag: &str, delay_ms: u64) -> TaskId {
        let id = self.alloc_id();
        self.tasks.push(Task {
            id,
            tag: tag.to_string(),
            next_due_ms: self.now_ms + delay_ms,
            period_ms: None,
        });
        log::debug!("scheduled one-shot task '{}' in {}ms", tag, delay_ms);
        id
    }

    /// Remove a task. Returns false if the id is not registered (already
    /// fired one-shot, or cancelled twice) - callers treat that as a no-op.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        before != self.tasks.len()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Advance the virtual clock by `delta_ms` and collect every firing in
    /// chronological order. Repeating tasks can fire more than once in a
    /// single advance; ties at the same instant fire in registration order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<Firing> {
        let target = self.now_ms + delta_ms;
        let mut firings = Vec::new();

        loop {
            // Earliest due task within the window; registration order
            // breaks ties because ids are monotonically increasing.
            let next = self
                .tasks
                .iter()
                .filter(|t| t.next_due_ms <= target)
                .min_by_key(|t| (t.next_due_ms, t.id.0))
                .map(|t| t.id);

            let Some(id) = next else { break };
            let idx = self.tasks.iter().position(|t| t.id == id).unwrap();

            let due = self.tasks[idx].next_due_ms;
            self.now_ms = due;
            firings.push(Firing {
                id,
                tag: self.tasks[idx].tag.clone(),
                at_ms: due,
            });

            match self.tasks[idx].period_ms {
                Some(period) => self.tasks[idx].next_due_ms = due + period,
                None => {
                    self.tasks.remove(idx);
                }
            }
        }

        self.now_ms = target;
        firings
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    fn alloc_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }
}
