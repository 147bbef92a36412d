//! Transient toast notifications.
//!
//! Each call creates an independent toast: it enters after a short delay,
//! holds, slides out and is removed. Toasts are neither queued nor
//! de-duplicated.

use log::debug;
use std::{cell::RefCell, rc::Rc};

use crate::{
    config::ToastTimings,
    schedule::{Scheduler, Task},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Unknown variants fall back to info.
    pub fn from_str(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Success => "#27ae60",
            Self::Error => "#e74c3c",
            Self::Info => "#3498db",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    /// Appended off-screen, not yet slid in.
    Entering,
    Shown,
    Leaving,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: ToastPhase,
}

impl Toast {
    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.kind.as_str())
    }

    pub fn is_on_screen(&self) -> bool {
        self.phase == ToastPhase::Shown
    }
}

pub trait NotificationView {
    fn render(&self, toasts: &[Toast]);
}

#[derive(Default)]
struct ToastStack {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastStack {
    fn set_phase(&mut self, id: u64, phase: ToastPhase) -> bool {
        match self.toasts.iter_mut().find(|toast| toast.id == id) {
            Some(toast) => {
                toast.phase = phase;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }
}

pub struct Notifier {
    scheduler: Rc<dyn Scheduler>,
    view: Rc<dyn NotificationView>,
    timings: ToastTimings,
    stack: Rc<RefCell<ToastStack>>,
}

impl Notifier {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        view: Rc<dyn NotificationView>,
        timings: ToastTimings,
    ) -> Self {
        Self {
            scheduler,
            view,
            timings,
            stack: Rc::new(RefCell::new(ToastStack::default())),
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.stack.borrow().toasts.clone()
    }

    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = {
            let mut stack = self.stack.borrow_mut();
            let id = stack.next_id;
            stack.next_id += 1;
            stack.toasts.push(Toast {
                id,
                message: message.into(),
                kind,
                phase: ToastPhase::Entering,
            });
            id
        };
        debug!("showing {} notification {id}", kind.as_str());
        self.render();

        let ToastTimings {
            enter_delay_ms,
            hold_ms,
            exit_ms,
        } = self.timings;

        self.detach(
            enter_delay_ms,
            self.step(move |stack| stack.set_phase(id, ToastPhase::Shown)),
        );

        let leave = self.step(move |stack| stack.set_phase(id, ToastPhase::Leaving));
        let remove = self.step(move |stack| stack.remove(id));
        let scheduler = Rc::clone(&self.scheduler);
        self.detach(
            hold_ms,
            Box::new(move || {
                leave();
                scheduler.schedule(exit_ms, remove).forget();
            }),
        );

        id
    }

    fn detach(&self, delay_ms: u32, task: Task) {
        self.scheduler.schedule(delay_ms, task).forget();
    }

    /// A task that mutates the stack and re-renders when anything changed.
    /// Steps for a toast that is already gone do nothing.
    fn step(&self, apply: impl Fn(&mut ToastStack) -> bool + 'static) -> Task {
        let stack = Rc::clone(&self.stack);
        let view = Rc::clone(&self.view);
        Box::new(move || {
            let mut stack = stack.borrow_mut();
            if apply(&mut *stack) {
                view.render(&stack.toasts);
            }
        })
    }

    fn render(&self) {
        self.view.render(&self.stack.borrow().toasts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    #[derive(Default)]
    struct RecordingView {
        frames: RefCell<Vec<Vec<Toast>>>,
    }

    impl NotificationView for RecordingView {
        fn render(&self, toasts: &[Toast]) {
            self.frames.borrow_mut().push(toasts.to_vec());
        }
    }

    fn notifier() -> (Rc<ManualScheduler>, Rc<RecordingView>, Notifier) {
        let scheduler = Rc::new(ManualScheduler::new());
        let view = Rc::new(RecordingView::default());
        let notifier = Notifier::new(
            scheduler.clone(),
            view.clone(),
            ToastTimings {
                enter_delay_ms: 100,
                hold_ms: 3_000,
                exit_ms: 300,
            },
        );
        (scheduler, view, notifier)
    }

    #[test]
    fn toast_lifecycle_follows_timings() {
        let (scheduler, _, notifier) = notifier();
        notifier.show("Saved", NotificationKind::Success);

        assert_eq!(notifier.toasts()[0].phase, ToastPhase::Entering);

        scheduler.advance(100);
        assert!(notifier.toasts()[0].is_on_screen());

        scheduler.advance(2_899);
        assert!(notifier.toasts()[0].is_on_screen());

        scheduler.advance(1);
        assert_eq!(notifier.toasts()[0].phase, ToastPhase::Leaving);

        scheduler.advance(299);
        assert_eq!(notifier.toasts().len(), 1);

        scheduler.advance(1);
        assert!(notifier.toasts().is_empty());
    }

    #[test]
    fn toasts_stack_independently() {
        let (scheduler, view, notifier) = notifier();
        let first = notifier.show("one", NotificationKind::Info);
        scheduler.advance(1_000);
        let second = notifier.show("one", NotificationKind::Info);

        assert_ne!(first, second);
        assert_eq!(notifier.toasts().len(), 2);

        scheduler.advance(2_300);
        let remaining: Vec<u64> = notifier.toasts().iter().map(|toast| toast.id).collect();
        assert_eq!(remaining, vec![second]);

        scheduler.advance(1_000);
        assert!(notifier.toasts().is_empty());
        assert!(view.frames.borrow().last().is_some_and(Vec::is_empty));
    }

    #[test]
    fn kind_presentation() {
        assert_eq!(NotificationKind::from_str("error"), NotificationKind::Error);
        assert_eq!(NotificationKind::from_str("warning"), NotificationKind::Info);
        assert_eq!(NotificationKind::default().background(), "#3498db");
        assert_eq!(NotificationKind::Success.background(), "#27ae60");

        let toast = Toast {
            id: 0,
            message: "x".to_string(),
            kind: NotificationKind::Error,
            phase: ToastPhase::Entering,
        };
        assert_eq!(toast.class_name(), "notification notification-error");
    }
}
