//! Skill detail tooltip: selection state and viewport-clamped placement.

use log::debug;
use std::rc::Rc;

use crate::skills::{SkillCatalog, SkillDescriptor};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Horizontal extent and top edge of the visible page area, in the same
/// coordinate space as the click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub top: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
    /// Minimum distance from the viewport edges.
    pub margin: f64,
    /// Distance between the click point and the tooltip.
    pub gap: f64,
}

/// Centre the tooltip above the click, keep it inside the viewport
/// horizontally, and drop it below the click when there is no room above.
///
/// When the tooltip is wider than the viewport minus both margins, the left
/// margin wins.
pub fn place_tooltip(anchor: Point, size: Size, viewport: Viewport, spacing: Spacing) -> Point {
    let min_left = spacing.margin;
    let max_left = (viewport.width - size.width - spacing.margin).max(min_left);
    let left = (anchor.x - size.width / 2.0).clamp(min_left, max_left);

    let above = anchor.y - size.height - spacing.gap;
    let top = if above < viewport.top + spacing.margin {
        anchor.y + spacing.gap
    } else {
        above
    };

    Point { x: left, y: top }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipViewState {
    pub visible: bool,
    pub anchor: Point,
    pub position: Option<Point>,
    pub content: SkillDescriptor,
}

pub struct TooltipController {
    catalog: Rc<SkillCatalog>,
    labels: Vec<String>,
    active_item: Option<usize>,
    view: Option<TooltipViewState>,
    spacing: Spacing,
}

impl TooltipController {
    pub fn new(catalog: Rc<SkillCatalog>, labels: Vec<String>, spacing: Spacing) -> Self {
        Self {
            catalog,
            labels,
            active_item: None,
            view: None,
            spacing,
        }
    }

    /// Entries whose label has no descriptor never react to clicks.
    pub fn is_interactive(&self, item: usize) -> bool {
        self.labels
            .get(item)
            .is_some_and(|label| self.catalog.contains(label))
    }

    pub fn active_item(&self) -> Option<usize> {
        self.active_item
    }

    pub fn view(&self) -> Option<&TooltipViewState> {
        self.view.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.view.as_ref().is_some_and(|view| view.visible)
    }

    /// Select `item` and load its descriptor. The tooltip stays hidden until
    /// [`TooltipController::place`] runs with the rendered size.
    pub fn open(&mut self, item: usize, anchor: Point) -> Option<&TooltipViewState> {
        let label = self.labels.get(item)?;
        let descriptor = self.catalog.get(label)?.clone();
        debug!("opening skill tooltip for {label}");

        self.active_item = Some(item);
        self.view = Some(TooltipViewState {
            visible: false,
            anchor,
            position: None,
            content: descriptor,
        });
        self.view.as_ref()
    }

    pub fn place(&mut self, size: Size, viewport: Viewport) -> Option<Point> {
        let spacing = self.spacing;
        let view = self.view.as_mut()?;
        let position = place_tooltip(view.anchor, size, viewport, spacing);
        view.position = Some(position);
        view.visible = true;
        Some(position)
    }

    /// Returns whether anything was showing or selected.
    pub fn dismiss(&mut self) -> bool {
        let changed = self.view.is_some() || self.active_item.is_some();
        self.view = None;
        self.active_item = None;
        changed
    }

    pub fn on_document_click(&mut self, inside_skill_or_tooltip: bool) -> bool {
        if inside_skill_or_tooltip {
            return false;
        }
        self.dismiss()
    }

    pub fn on_scroll(&mut self) -> bool {
        self.dismiss()
    }
}
