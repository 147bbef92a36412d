//! Active-section tracking, navbar scroll state and in-page anchor targets.

use log::debug;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Half-open scroll interval `[top - offset, top - offset + height)`.
    fn interval(&self, offset: f64) -> (f64, f64) {
        let start = self.top - offset;
        (start, start + self.height.max(0.0))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("section id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("sections `{first}` and `{second}` overlap")]
    Overlap { first: String, second: String },
}

/// Measured section geometry in document order.
#[derive(Clone, Debug, Default)]
pub struct SectionLayout {
    sections: Vec<SectionBounds>,
    offset: f64,
}

impl SectionLayout {
    /// Accept only layouts whose ids are unique and whose scroll intervals are
    /// pairwise disjoint, so at most one section can ever be current.
    pub fn new(sections: Vec<SectionBounds>, offset: f64) -> Result<Self, LayoutError> {
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(LayoutError::DuplicateId(section.id.clone()));
            }
        }

        let mut ordered: Vec<&SectionBounds> = sections.iter().collect();
        ordered.sort_by(|a, b| a.top.total_cmp(&b.top));
        for pair in ordered.windows(2) {
            let (_, first_end) = pair[0].interval(offset);
            let (second_start, _) = pair[1].interval(offset);
            if second_start < first_end {
                return Err(LayoutError::Overlap {
                    first: pair[0].id.clone(),
                    second: pair[1].id.clone(),
                });
            }
        }

        Ok(Self { sections, offset })
    }

    /// Keep a layout that failed validation. Lookups fall back to the last
    /// matching section in document order.
    pub fn new_unchecked(sections: Vec<SectionBounds>, offset: f64) -> Self {
        Self { sections, offset }
    }

    pub fn sections(&self) -> &[SectionBounds] {
        &self.sections
    }

    pub fn find(&self, id: &str) -> Option<&SectionBounds> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Section whose interval contains `scroll_y`.
    pub fn current(&self, scroll_y: f64) -> Option<&str> {
        let mut current = None;
        for section in &self.sections {
            let (start, end) = section.interval(self.offset);
            if scroll_y >= start && scroll_y < end {
                current = Some(section.id.as_str());
            }
        }
        current
    }
}

/// Which navigation entry carries the active designation.
#[derive(Clone, Debug, Default)]
pub struct NavLinks {
    targets: Vec<Option<String>>,
    active: Option<usize>,
}

impl NavLinks {
    pub fn new<'a>(hrefs: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            targets: hrefs
                .into_iter()
                .map(|href| anchor_target(href).map(str::to_string))
                .collect(),
            active: None,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Clear, then mark the entry targeting `section`. If several entries
    /// target the same section the last one wins, so at most one is active.
    /// Returns whether the active entry changed.
    pub fn activate(&mut self, section: Option<&str>) -> bool {
        let mut next = None;
        if let Some(section) = section {
            for (index, target) in self.targets.iter().enumerate() {
                if target.as_deref() == Some(section) {
                    next = Some(index);
                }
            }
        }

        let changed = next != self.active;
        if changed {
            debug!("active nav link {:?} -> {:?}", self.active, next);
        }
        self.active = next;
        changed
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }
}

/// Navbar `scrolled` flag and scroll indicator visibility.
#[derive(Clone, Debug)]
pub struct ScrollChrome {
    threshold: f64,
    scrolled: bool,
}

impl ScrollChrome {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scrolled: false,
        }
    }

    /// Returns whether the flag flipped.
    pub fn update(&mut self, scroll_y: f64) -> bool {
        let scrolled = scroll_y > self.threshold;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn indicator_opacity(&self) -> &'static str {
        if self.scrolled {
            "0"
        } else {
            "1"
        }
    }
}

/// `"#about"` targets `about`; bare `"#"` and non-fragment links target nothing.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Scroll offset for a smooth jump to a section starting at `section_top`.
pub fn scroll_destination(section_top: f64, offset: f64) -> f64 {
    (section_top - offset).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_layout() -> SectionLayout {
        SectionLayout::new(
            vec![
                SectionBounds::new("home", 0.0, 600.0),
                SectionBounds::new("about", 600.0, 800.0),
                SectionBounds::new("skills", 1_400.0, 700.0),
                SectionBounds::new("contact", 2_100.0, 500.0),
            ],
            100.0,
        )
        .expect("disjoint layout")
    }

    #[test]
    fn current_section_uses_lead_in_offset() {
        let layout = page_layout();

        assert_eq!(layout.current(0.0), Some("home"));
        assert_eq!(layout.current(499.0), Some("home"));
        assert_eq!(layout.current(500.0), Some("about"));
        assert_eq!(layout.current(1_299.9), Some("about"));
        assert_eq!(layout.current(1_300.0), Some("skills"));
        assert_eq!(layout.current(2_499.0), Some("contact"));
        assert_eq!(layout.current(2_500.0), None);
    }

    #[test]
    fn gaps_between_sections_have_no_current() {
        let layout = SectionLayout::new(
            vec![
                SectionBounds::new("a", 100.0, 100.0),
                SectionBounds::new("b", 400.0, 100.0),
            ],
            100.0,
        )
        .expect("disjoint layout");

        assert_eq!(layout.current(150.0), None);
        assert_eq!(layout.current(-50.0), None);
    }

    #[test]
    fn overlapping_sections_are_rejected() {
        let result = SectionLayout::new(
            vec![
                SectionBounds::new("a", 0.0, 500.0),
                SectionBounds::new("b", 400.0, 500.0),
            ],
            100.0,
        );

        assert_eq!(
            result.err(),
            Some(LayoutError::Overlap {
                first: "a".to_string(),
                second: "b".to_string()
            })
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = SectionLayout::new(
            vec![
                SectionBounds::new("a", 0.0, 100.0),
                SectionBounds::new("a", 100.0, 100.0),
            ],
            100.0,
        );

        assert_eq!(result.err(), Some(LayoutError::DuplicateId("a".to_string())));
    }

    #[test]
    fn unchecked_layout_prefers_last_match() {
        let layout = SectionLayout::new_unchecked(
            vec![
                SectionBounds::new("a", 0.0, 500.0),
                SectionBounds::new("b", 300.0, 500.0),
            ],
            0.0,
        );

        assert_eq!(layout.current(350.0), Some("b"));
        assert_eq!(layout.current(100.0), Some("a"));
    }

    #[test]
    fn at_most_one_link_is_active_for_every_offset() {
        let layout = page_layout();
        let mut links = NavLinks::new(["#home", "#about", "#skills", "#contact", "/resume.pdf"]);

        let mut offset = -200.0;
        while offset < 3_000.0 {
            links.activate(layout.current(offset));
            let expected = layout.current(offset).and_then(|id| {
                ["home", "about", "skills", "contact"]
                    .iter()
                    .position(|candidate| *candidate == id)
            });
            assert_eq!(links.active(), expected, "offset {offset}");
            offset += 37.0;
        }
    }

    #[test]
    fn duplicate_link_targets_resolve_to_last_entry() {
        let mut links = NavLinks::new(["#about", "#skills", "#about"]);

        assert!(links.activate(Some("about")));
        assert_eq!(links.active(), Some(2));
        assert!(!links.activate(Some("about")));
        assert!(links.activate(None));
        assert_eq!(links.active(), None);
    }

    #[test]
    fn scroll_chrome_flips_past_threshold() {
        let mut chrome = ScrollChrome::new(100.0);

        assert!(!chrome.update(100.0));
        assert_eq!(chrome.indicator_opacity(), "1");
        assert!(chrome.update(100.5));
        assert!(chrome.is_scrolled());
        assert_eq!(chrome.indicator_opacity(), "0");
        assert!(!chrome.update(400.0));
        assert!(chrome.update(10.0));
    }

    #[test]
    fn anchor_helpers() {
        assert_eq!(anchor_target("#skills"), Some("skills"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("https://example.com/#skills"), None);
        assert_eq!(scroll_destination(600.0, 80.0), 520.0);
        assert_eq!(scroll_destination(40.0, 80.0), 0.0);
    }
}
