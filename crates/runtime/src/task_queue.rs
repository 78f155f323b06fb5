/// Deterministic queue of pending idle tasks.
///
/// Key properties:
/// - Total ordering on `(priority, id)`; smaller priority values run first.
/// - Equal priorities drain in insertion order.
/// - Cancellation does not perturb the order of remaining tasks.
/// - Optional backpressure via a maximum pending length.
///
/// Vec-backed on purpose: the dashboard queues a handful of analysis tasks,
/// and predictable behavior matters more than asymptotics here.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QueueFull {
    pub max_pending: usize,
}

#[derive(Debug)]
struct Pending<T> {
    priority: i32,
    id: TaskId,
    payload: T,
    canceled: bool,
}

#[derive(Debug)]
pub struct TaskQueue<T> {
    next_id: u64,
    items: Vec<Pending<T>>,
    max_pending: Option<usize>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
            max_pending: None,
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pending(max_pending: usize) -> Self {
        Self {
            max_pending: Some(max_pending),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.items.iter().filter(|i| !i.canceled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, priority: i32, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(Pending {
            priority,
            id,
            payload,
            canceled: false,
        });
        id
    }

    pub fn try_push(&mut self, priority: i32, payload: T) -> Result<TaskId, QueueFull> {
        if let Some(max_pending) = self.max_pending {
            if self.len() >= max_pending {
                return Err(QueueFull { max_pending });
            }
        }
        Ok(self.push(priority, payload))
    }

    /// Returns `true` if the task was pending; canceling twice is a no-op.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id && !i.canceled) {
            item.canceled = true;
            return true;
        }
        false
    }

    /// Pops the next (highest priority, then oldest) task.
    pub fn pop_next(&mut self) -> Option<(TaskId, T)> {
        let mut best: Option<usize> = None;
        for (idx, item) in self.items.iter().enumerate() {
            if item.canceled {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => {
                    (item.priority, item.id) < (self.items[b].priority, self.items[b].id)
                }
            };
            if better {
                best = Some(idx);
            }
        }

        let idx = best?;
        let item = self.items.swap_remove(idx);
        Some((item.id, item.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::{QueueFull, TaskQueue};

    #[test]
    fn same_priority_is_insertion_order() {
        let mut q = TaskQueue::new();
        q.push(0, "a");
        q.push(0, "b");
        q.push(0, "c");

        let order: Vec<_> = std::iter::from_fn(|| q.pop_next()).map(|(_, v)| v).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn lower_priority_value_runs_first() {
        let mut q = TaskQueue::new();
        q.push(10, "late");
        q.push(-1, "early");
        let (_, v) = q.pop_next().unwrap();
        assert_eq!(v, "early");
    }

    #[test]
    fn cancel_skips_task() {
        let mut q = TaskQueue::new();
        let a = q.push(0, "a");
        q.push(0, "b");
        assert!(q.cancel(a));
        assert!(!q.cancel(a));

        let (_, v) = q.pop_next().unwrap();
        assert_eq!(v, "b");
        assert!(q.pop_next().is_none());
    }

    #[test]
    fn backpressure_rejects_when_full() {
        let mut q = TaskQueue::with_max_pending(2);
        assert!(q.try_push(0, "a").is_ok());
        assert!(q.try_push(0, "b").is_ok());

        let err = q.try_push(0, "c").unwrap_err();
        assert_eq!(err, QueueFull { max_pending: 2 });
    }
}
