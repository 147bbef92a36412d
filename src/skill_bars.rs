//! Staggered reveal of skill progress bars.
//!
//! Declared widths are captured at startup and every bar is collapsed to zero
//! before first paint. A trigger restores bar `i` after `i * stagger_ms`.

use log::debug;
use std::{cell::RefCell, rc::Rc};

use crate::schedule::{stagger_delay, Scheduler, TaskHandle};

pub const COLLAPSED_WIDTH: &str = "0%";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillBar {
    pub target_width: String,
    pub width: String,
    pub animated: bool,
}

pub trait SkillBarView {
    fn project(&self, index: usize, bar: &SkillBar);
}

pub struct SkillBarAnimator {
    bars: Rc<RefCell<Vec<SkillBar>>>,
    view: Rc<dyn SkillBarView>,
    scheduler: Rc<dyn Scheduler>,
    stagger_ms: u32,
    pending: RefCell<Vec<TaskHandle>>,
}

impl SkillBarAnimator {
    /// Capture each declared width and collapse the live width to zero.
    pub fn capture(
        declared_widths: impl IntoIterator<Item = String>,
        view: Rc<dyn SkillBarView>,
        scheduler: Rc<dyn Scheduler>,
        stagger_ms: u32,
    ) -> Self {
        let bars: Vec<SkillBar> = declared_widths
            .into_iter()
            .map(|target_width| SkillBar {
                target_width,
                width: COLLAPSED_WIDTH.to_string(),
                animated: false,
            })
            .collect();

        for (index, bar) in bars.iter().enumerate() {
            view.project(index, bar);
        }

        Self {
            bars: Rc::new(RefCell::new(bars)),
            view,
            scheduler,
            stagger_ms,
            pending: RefCell::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.borrow().is_empty()
    }

    pub fn bars(&self) -> Vec<SkillBar> {
        self.bars.borrow().clone()
    }

    /// Schedule the staggered restore. Calling again cancels restores still
    /// waiting from the previous call and starts a fresh sequence.
    pub fn trigger(&self) {
        let count = self.len();
        debug!("animating {count} skill bars");

        let handles = (0..count)
            .map(|index| {
                let bars = Rc::clone(&self.bars);
                let view = Rc::clone(&self.view);
                self.scheduler.schedule(
                    stagger_delay(index, self.stagger_ms),
                    Box::new(move || {
                        let mut bars = bars.borrow_mut();
                        if let Some(bar) = bars.get_mut(index) {
                            bar.width.clone_from(&bar.target_width);
                            bar.animated = true;
                            view.project(index, bar);
                        }
                    }),
                )
            })
            .collect();

        *self.pending.borrow_mut() = handles;
    }
}
