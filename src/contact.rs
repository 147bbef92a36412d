//! Simulated contact form submission and floating field labels.

use log::debug;
use std::{cell::RefCell, rc::Rc};

use crate::{
    notify::{NotificationKind, Notifier},
    schedule::{Scheduler, TaskHandle},
};

pub const PENDING_LABEL: &str = "Sending...";
pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been received.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Sending { original_label: String },
}

pub trait ContactFormView {
    fn submit_label(&self) -> String;
    fn set_submit_state(&self, label: &str, disabled: bool);
    fn reset_fields(&self);
}

pub struct ContactFormController {
    phase: Rc<RefCell<FormPhase>>,
    view: Rc<dyn ContactFormView>,
    notifier: Rc<Notifier>,
    scheduler: Rc<dyn Scheduler>,
    latency_ms: u32,
    pending: RefCell<Option<TaskHandle>>,
}

impl ContactFormController {
    pub fn new(
        view: Rc<dyn ContactFormView>,
        notifier: Rc<Notifier>,
        scheduler: Rc<dyn Scheduler>,
        latency_ms: u32,
    ) -> Self {
        Self {
            phase: Rc::new(RefCell::new(FormPhase::Idle)),
            view,
            notifier,
            scheduler,
            latency_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase.borrow().clone()
    }

    /// Disable the submit control and finish after the simulated latency. The
    /// simulation always succeeds. A submit while one is in flight is ignored.
    /// Returns whether a submission started.
    pub fn submit(&self) -> bool {
        if matches!(*self.phase.borrow(), FormPhase::Sending { .. }) {
            return false;
        }

        let original_label = self.view.submit_label();
        self.view.set_submit_state(PENDING_LABEL, true);
        *self.phase.borrow_mut() = FormPhase::Sending {
            original_label: original_label.clone(),
        };
        debug!("contact form submitted");

        let phase = Rc::clone(&self.phase);
        let view = Rc::clone(&self.view);
        let notifier = Rc::clone(&self.notifier);
        let handle = self.scheduler.schedule(
            self.latency_ms,
            Box::new(move || {
                notifier.show(SUCCESS_MESSAGE, NotificationKind::Success);
                view.reset_fields();
                view.set_submit_state(&original_label, false);
                *phase.borrow_mut() = FormPhase::Idle;
            }),
        );
        *self.pending.borrow_mut() = Some(handle);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldEvent {
    Focus,
    Blur,
}

/// New state of the `focused` class on a field's container, or `None` when it
/// stays as it is. Blur keeps the label floating while the field has content.
pub fn floating_label(event: FieldEvent, value: &str) -> Option<bool> {
    match event {
        FieldEvent::Focus => Some(true),
        FieldEvent::Blur if value.is_empty() => Some(false),
        FieldEvent::Blur => None,
    }
}
