//! Idle-chunked work scheduler.
//!
//! The dashboard's analysis producers all share one shape: process up to N
//! items per invocation, report fractional progress, yield a result when
//! every item has been consumed. This module owns that control flow once,
//! instead of each producer hand-rolling it.
//!
//! Host integration: call [`IdleScheduler::pulse`] from the host's idle
//! callback with the slice budget for that window. A host without an idle
//! primitive calls the same method from a deferred timer; only the cadence
//! changes, never the semantics. One pulse runs at most one bounded slice,
//! so the interaction loop is never blocked for longer than a single slice.

use crate::budget::SliceBudget;
use crate::task_queue::{QueueFull, TaskId, TaskQueue};

/// A unit of work that can be consumed in bounded slices.
pub trait ChunkedTask {
    type Output;

    /// Total number of items this task will process. Fixed for the task's
    /// lifetime; progress is reported against it.
    fn total_items(&self) -> usize;

    /// Processes up to `max_items` items and returns how many were actually
    /// consumed. Returning 0 while items were allowed means the task has
    /// nothing left to do.
    fn process(&mut self, max_items: usize) -> usize;

    /// Consumes the task once processing is complete.
    fn finish(self) -> Self::Output;
}

/// Progress of the task currently being sliced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TaskProgress {
    pub id: TaskId,
    pub label: &'static str,
    pub percent: f64,
}

/// What one pulse did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PulseOutcome {
    /// Task the slice ran against; `None` when the scheduler was idle.
    pub task: Option<TaskId>,
    pub items_processed: usize,
    /// Progress after the slice, 0–100.
    pub percent: Option<f64>,
    /// Whether this pulse completed the task (completion callback has fired).
    pub completed: bool,
}

impl PulseOutcome {
    fn idle() -> Self {
        Self {
            task: None,
            items_processed: 0,
            percent: None,
            completed: false,
        }
    }
}

trait ErasedTask {
    fn label(&self) -> &'static str;
    fn total_items(&self) -> usize;
    fn items_done(&self) -> usize;
    fn run_slice(&mut self, max_items: usize) -> usize;
    fn complete(&mut self);
}

struct Scheduled<T: ChunkedTask> {
    label: &'static str,
    task: Option<T>,
    on_complete: Option<Box<dyn FnOnce(T::Output)>>,
    // Progress counter owned by this scheduling, never shared between
    // tasks: a re-entrant schedule cannot corrupt an in-flight one.
    done: usize,
    total: usize,
}

impl<T: ChunkedTask> ErasedTask for Scheduled<T> {
    fn label(&self) -> &'static str {
        self.label
    }

    fn total_items(&self) -> usize {
        self.total
    }

    fn items_done(&self) -> usize {
        self.done
    }

    fn run_slice(&mut self, max_items: usize) -> usize {
        let task = match self.task.as_mut() {
            Some(t) => t,
            None => return 0,
        };
        let n = task.process(max_items).min(max_items);
        self.done = (self.done + n).min(self.total);
        n
    }

    fn complete(&mut self) {
        if let (Some(task), Some(cb)) = (self.task.take(), self.on_complete.take()) {
            cb(task.finish());
        }
    }
}

/// Runs queued [`ChunkedTask`]s one bounded slice at a time.
pub struct IdleScheduler {
    pending: TaskQueue<Box<dyn ErasedTask>>,
    active: Option<(TaskId, Box<dyn ErasedTask>)>,
}

impl Default for IdleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleScheduler {
    pub fn new() -> Self {
        Self {
            pending: TaskQueue::new(),
            active: None,
        }
    }

    pub fn with_max_pending(max_pending: usize) -> Self {
        Self {
            pending: TaskQueue::with_max_pending(max_pending),
            active: None,
        }
    }

    pub fn has_work(&self) -> bool {
        self.active.is_some() || !self.pending.is_empty()
    }

    /// Queues a task. The completion callback fires exactly once, during the
    /// pulse that consumes the task's last item.
    pub fn schedule<T>(
        &mut self,
        priority: i32,
        label: &'static str,
        task: T,
        on_complete: impl FnOnce(T::Output) + 'static,
    ) -> Result<TaskId, QueueFull>
    where
        T: ChunkedTask + 'static,
    {
        let total = task.total_items();
        let scheduled: Box<dyn ErasedTask> = Box::new(Scheduled {
            label,
            task: Some(task),
            on_complete: Some(Box::new(on_complete)),
            done: 0,
            total,
        });
        self.pending.try_push(priority, scheduled)
    }

    /// Cancels a task. A canceled task's completion callback never fires.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some((active_id, _)) = &self.active {
            if *active_id == id {
                self.active = None;
                return true;
            }
        }
        self.pending.cancel(id)
    }

    /// Progress of the in-flight task, if any.
    pub fn progress(&self) -> Option<TaskProgress> {
        let (id, task) = self.active.as_ref()?;
        Some(TaskProgress {
            id: *id,
            label: task.label(),
            percent: percent_of(task.items_done(), task.total_items()),
        })
    }

    /// Runs at most one bounded slice of the current (or next pending) task.
    ///
    /// Progress per task is monotonically non-decreasing across pulses. An
    /// exhausted budget leaves the task in flight untouched.
    pub fn pulse(&mut self, budget: &mut SliceBudget) -> PulseOutcome {
        let (id, mut task) = match self.active.take() {
            Some(active) => active,
            None => match self.pending.pop_next() {
                Some(next) => next,
                None => return PulseOutcome::idle(),
            },
        };

        let max_items = budget.remaining_items() as usize;
        if max_items == 0 && task.total_items() > 0 {
            let percent = percent_of(task.items_done(), task.total_items());
            self.active = Some((id, task));
            return PulseOutcome {
                task: Some(id),
                items_processed: 0,
                percent: Some(percent),
                completed: false,
            };
        }

        let n = task.run_slice(max_items);
        budget.try_consume(n as u32);

        let total = task.total_items();
        let exhausted = total == 0 || task.items_done() >= total || n == 0;
        if exhausted {
            task.complete();
            return PulseOutcome {
                task: Some(id),
                items_processed: n,
                percent: Some(100.0),
                completed: true,
            };
        }

        let percent = percent_of(task.items_done(), total);
        self.active = Some((id, task));
        PulseOutcome {
            task: Some(id),
            items_processed: n,
            percent: Some(percent),
            completed: false,
        }
    }
}

fn percent_of(done: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        (done as f64 / total as f64 * 100.0).min(100.0)
    }
}
