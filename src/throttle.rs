//! Trailing-edge rate limiter.
//!
//! Each call replaces whatever call is still waiting, so a burst collapses to
//! the last call, run `wait_ms` after the burst goes quiet.

use std::{cell::RefCell, rc::Rc};

use crate::schedule::{Scheduler, TaskHandle};

pub struct Throttle {
    scheduler: Rc<dyn Scheduler>,
    wait_ms: u32,
    pending: RefCell<Option<TaskHandle>>,
}

impl Throttle {
    pub fn new(scheduler: Rc<dyn Scheduler>, wait_ms: u32) -> Self {
        Self {
            scheduler,
            wait_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    pub fn call(&self, f: impl FnOnce() + 'static) {
        let handle = self.scheduler.schedule(self.wait_ms, Box::new(f));
        // Replacing drops the previous handle, which cancels it.
        *self.pending.borrow_mut() = Some(handle);
    }

    pub fn cancel(&self) {
        *self.pending.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    #[test]
    fn burst_collapses_to_last_call() {
        let scheduler = Rc::new(ManualScheduler::new());
        let throttle = Throttle::new(scheduler.clone(), 100);
        let seen = Rc::new(RefCell::new(Vec::new()));

        for value in 1..=5 {
            let seen = Rc::clone(&seen);
            throttle.call(move || seen.borrow_mut().push(value));
            scheduler.advance(40);
        }

        assert!(seen.borrow().is_empty());
        scheduler.advance(60);
        assert_eq!(*seen.borrow(), vec![5]);
    }

    #[test]
    fn window_restarts_on_each_call() {
        let scheduler = Rc::new(ManualScheduler::new());
        let throttle = Throttle::new(scheduler.clone(), 250);
        let fired_at = Rc::new(RefCell::new(Vec::new()));

        let record = |throttle: &Throttle| {
            let fired_at = Rc::clone(&fired_at);
            let clock = Rc::clone(&scheduler);
            throttle.call(move || fired_at.borrow_mut().push(clock.now()));
        };

        record(&throttle);
        scheduler.advance(200);
        record(&throttle);
        scheduler.advance(1_000);

        assert_eq!(*fired_at.borrow(), vec![450]);
    }

    #[test]
    fn separated_calls_each_fire() {
        let scheduler = Rc::new(ManualScheduler::new());
        let throttle = Throttle::new(scheduler.clone(), 100);
        let count = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            let count = Rc::clone(&count);
            throttle.call(move || *count.borrow_mut() += 1);
            scheduler.advance(150);
        }

        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn cancel_drops_pending_call() {
        let scheduler = Rc::new(ManualScheduler::new());
        let throttle = Throttle::new(scheduler.clone(), 100);
        let count = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&count);
        throttle.call(move || *counter.borrow_mut() += 1);
        throttle.cancel();
        scheduler.advance(500);

        assert_eq!(*count.borrow(), 0);
    }
}
