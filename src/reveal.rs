//! One-shot reveal bookkeeping for elements entering the viewport.

use log::debug;

pub type RevealId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// Not intersecting, unknown id, or already visible.
    Unchanged,
    Revealed { trigger_skill_bars: bool },
}

#[derive(Clone, Copy, Debug)]
struct RevealTarget {
    triggers_skill_bars: bool,
    visible: bool,
}

#[derive(Clone, Debug, Default)]
pub struct RevealTracker {
    targets: Vec<RevealTarget>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element before observation starts. Every registered element
    /// begins pending (not visible).
    pub fn register(&mut self, triggers_skill_bars: bool) -> RevealId {
        self.targets.push(RevealTarget {
            triggers_skill_bars,
            visible: false,
        });
        self.targets.len() - 1
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_visible(&self, id: RevealId) -> bool {
        self.targets.get(id).is_some_and(|target| target.visible)
    }

    /// Visibility only ever moves from pending to visible, so the skill bar
    /// trigger is reported on exactly one notification per element.
    pub fn on_intersection(&mut self, id: RevealId, intersecting: bool) -> Reveal {
        if !intersecting {
            return Reveal::Unchanged;
        }

        let Some(target) = self.targets.get_mut(id) else {
            return Reveal::Unchanged;
        };

        if target.visible {
            return Reveal::Unchanged;
        }

        target.visible = true;
        debug!("reveal target {id} became visible");
        Reveal::Revealed {
            trigger_skill_bars: target.triggers_skill_bars,
        }
    }
}
