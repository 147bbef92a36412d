//! Deferred work with cancellation handles.
//!
//! Every timer in the page (throttle trailing edge, staggered skill bars,
//! toast sequencing, simulated form latency) goes through [`Scheduler`] so a
//! component can drop a superseded task instead of letting it fire against a
//! changed element. The browser implementation lives in the front end; tests
//! use [`ManualScheduler`].

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskHandle;
}

/// Owning handle for a scheduled task. Dropping it cancels the task, the same
/// way dropping a `gloo_timers` timeout clears it.
#[must_use = "dropping a TaskHandle cancels the task; call `forget` to detach it"]
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce()>>,
    detach: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
            detach: None,
        }
    }

    /// `detach` runs instead of `cancel` when the handle is forgotten, for
    /// timers whose owner would clear them when dropped.
    pub fn with_detach(cancel: impl FnOnce() + 'static, detach: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
            detach: Some(Box::new(detach)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Let the task run to completion without keeping the handle around.
    pub fn forget(mut self) {
        self.cancel = None;
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

struct PendingTask {
    due: u64,
    seq: u64,
    cancelled: Rc<Cell<bool>>,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: u64,
    next_seq: u64,
    tasks: Vec<PendingTask>,
}

/// Virtual clock: nothing runs until [`ManualScheduler::advance`] is called.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<ManualQueue>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.queue.borrow().now
    }

    /// Number of tasks still waiting that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .tasks
            .iter()
            .filter(|task| !task.cancelled.get())
            .count()
    }

    /// Move the clock forward by `ms`, running every task that falls due on the
    /// way in (due time, scheduling order) order. Tasks scheduled by a running
    /// task are picked up if they fall due inside the same window.
    pub fn advance(&self, ms: u64) {
        let target = self.now().saturating_add(ms);

        while let Some(next) = self.pop_due(target) {
            if !next.cancelled.get() {
                (next.task)();
            }
        }

        self.queue.borrow_mut().now = target;
    }

    fn pop_due(&self, target: u64) -> Option<PendingTask> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= target)
            .min_by_key(|(_, task)| (task.due, task.seq))
            .map(|(index, _)| index)?;

        let task = queue.tasks.swap_remove(index);
        queue.now = queue.now.max(task.due);
        Some(task)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskHandle {
        let cancelled = Rc::new(Cell::new(false));
        {
            let mut queue = self.queue.borrow_mut();
            let due = queue.now.saturating_add(u64::from(delay_ms));
            let seq = queue.next_seq;
            queue.next_seq += 1;
            queue.tasks.push(PendingTask {
                due,
                seq,
                cancelled: Rc::clone(&cancelled),
                task,
            });
        }

        TaskHandle::new(move || cancelled.set(true))
    }
}

/// Delay for the `index`-th item of a staggered sequence.
pub fn stagger_delay(index: usize, step_ms: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(step_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let push = {
            let log = Rc::clone(&log);
            move |label: &'static str| -> Task {
                let log = Rc::clone(&log);
                Box::new(move || log.borrow_mut().push(label))
            }
        };
        (log, push)
    }

    #[test]
    fn tasks_run_in_due_then_scheduling_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.schedule(200, task("late")).forget();
        scheduler.schedule(100, task("first")).forget();
        scheduler.schedule(100, task("second")).forget();

        scheduler.advance(99);
        assert!(log.borrow().is_empty());

        scheduler.advance(200);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(scheduler.now(), 299);
    }

    #[test]
    fn dropping_handle_cancels_task() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        let handle = scheduler.schedule(10, task("dropped"));
        drop(handle);
        scheduler.schedule(10, task("kept")).forget();

        assert_eq!(scheduler.pending(), 1);
        scheduler.advance(10);
        assert_eq!(*log.borrow(), vec!["kept"]);
    }

    #[test]
    fn explicit_cancel_prevents_run() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.schedule(5, task("cancelled")).cancel();
        scheduler.advance(50);

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn nested_tasks_due_inside_window_run() {
        let scheduler = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_scheduler = Rc::clone(&scheduler);
        let inner_log = Rc::clone(&log);
        scheduler
            .schedule(
                100,
                Box::new(move || {
                    inner_log.borrow_mut().push(inner_scheduler.now());
                    let log = Rc::clone(&inner_log);
                    let clock = Rc::clone(&inner_scheduler);
                    inner_scheduler
                        .schedule(300, Box::new(move || log.borrow_mut().push(clock.now())))
                        .forget();
                }),
            )
            .forget();

        scheduler.advance(1_000);
        assert_eq!(*log.borrow(), vec![100, 400]);
    }

    #[test]
    fn forget_runs_detach_instead_of_cancel() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let handle = |calls: &Rc<RefCell<Vec<&'static str>>>| {
            let on_cancel = Rc::clone(calls);
            let on_detach = Rc::clone(calls);
            TaskHandle::with_detach(
                move || on_cancel.borrow_mut().push("cancel"),
                move || on_detach.borrow_mut().push("detach"),
            )
        };

        handle(&calls).forget();
        drop(handle(&calls));

        assert_eq!(*calls.borrow(), vec!["detach", "cancel"]);
    }

    #[test]
    fn stagger_delay_saturates() {
        assert_eq!(stagger_delay(0, 200), 0);
        assert_eq!(stagger_delay(3, 200), 600);
        assert_eq!(stagger_delay(usize::MAX, 200), u32::MAX);
    }
}
