//! Mobile menu open/closed state.

use log::debug;

#[derive(Clone, Debug)]
pub struct MobileMenu {
    open: bool,
    breakpoint: f64,
}

impl MobileMenu {
    pub fn new(breakpoint: f64) -> Self {
        Self {
            open: false,
            breakpoint,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        debug!("mobile menu open = {}", self.open);
        self.open
    }

    /// Returns whether the menu was open. Closing a closed menu is a no-op.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn on_document_click(&mut self, inside_menu: bool) -> bool {
        !inside_menu && self.close()
    }

    pub fn on_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close()
    }

    pub fn on_resize(&mut self, viewport_width: f64) -> bool {
        viewport_width > self.breakpoint && self.close()
    }

    pub fn on_nav_link(&mut self) -> bool {
        self.close()
    }
}
