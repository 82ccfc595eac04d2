//! Delayed tasks on the page's single thread.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// A task to run once, later.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after a delay. Everything happens on one thread; tasks may
/// schedule further tasks.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Handle to a scheduled task. Dropping it leaves the task scheduled.
#[must_use = "dropping a TaskHandle does not cancel the task"]
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Prevent the task from running if it has not run yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancelable", &self.cancel.is_some())
            .finish()
    }
}

/// A scheduler driven by hand, with its own notion of time.
///
/// Tasks run only inside [`ManualScheduler::advance`], in due order; tasks
/// due at the same instant run in the order they were scheduled.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    seq: u64,
    pending: Vec<Pending>,
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
    cancelled: Rc<Cell<bool>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed virtual time.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Tasks scheduled and not cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .pending
            .iter()
            .filter(|p| !p.cancelled.get())
            .count()
    }

    /// Move time forward, running every task that falls due. Returns how many
    /// tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;

        while let Some(next) = self.pop_due(target) {
            if !next.cancelled.get() {
                (next.task)();
                ran += 1;
            }
        }

        self.queue.borrow_mut().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Pending> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let next = queue.pending.swap_remove(index);
        queue.now = next.due;
        Some(next)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let cancelled = Rc::new(Cell::new(false));
        {
            let mut queue = self.queue.borrow_mut();
            let due = queue.now + delay;
            let seq = queue.seq;
            queue.seq += 1;
            queue.pending.push(Pending {
                due,
                seq,
                task,
                cancelled: cancelled.clone(),
            });
        }
        TaskHandle::new(move || cancelled.set(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_runs_in_due_order() {
        let scheduler = ManualScheduler::new();
        let seen = log();
        for (ms, tag) in [(300, "c"), (100, "a"), (200, "b"), (100, "a2")] {
            let seen = seen.clone();
            let _ = scheduler.schedule(
                Duration::from_millis(ms),
                Box::new(move || seen.borrow_mut().push(tag)),
            );
        }

        assert_eq!(scheduler.advance(Duration::from_millis(150)), 2);
        assert_eq!(*seen.borrow(), ["a", "a2"]);
        assert_eq!(scheduler.advance(Duration::from_millis(1000)), 2);
        assert_eq!(*seen.borrow(), ["a", "a2", "b", "c"]);
        assert_eq!(scheduler.now(), Duration::from_millis(1150));
    }

    #[test]
    fn test_cancelled_task_does_not_run() {
        let scheduler = ManualScheduler::new();
        let seen = log();
        let s = seen.clone();
        let handle = scheduler.schedule(
            Duration::from_millis(10),
            Box::new(move || s.borrow_mut().push("ran")),
        );
        assert_eq!(scheduler.pending(), 1);
        handle.cancel();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_task_can_schedule_followup_within_same_advance() {
        let scheduler = ManualScheduler::new();
        let seen = log();
        let inner_scheduler = scheduler.clone();
        let s = seen.clone();
        let _ = scheduler.schedule(
            Duration::from_millis(5000),
            Box::new(move || {
                s.borrow_mut().push("fade");
                let s = s.clone();
                let _ = inner_scheduler.schedule(
                    Duration::from_millis(300),
                    Box::new(move || s.borrow_mut().push("remove")),
                );
            }),
        );

        scheduler.advance(Duration::from_millis(5200));
        assert_eq!(*seen.borrow(), ["fade"]);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(*seen.borrow(), ["fade", "remove"]);
    }

    #[test]
    fn test_detached_handle_cancel_is_noop() {
        TaskHandle::detached().cancel();
    }
}
