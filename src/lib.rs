//! # portfolio-interactions
//!
//! Client-side behaviour for the static portfolio page: active-section
//! navigation, theme toggle, mobile menu, scroll reveals, animated skill bars,
//! the skill detail tooltip, the simulated contact form and toast
//! notifications.
//!
//! Every component is a plain state object. The browser front end in the
//! binary projects that state onto the document; tests drive it directly with
//! [`schedule::ManualScheduler`] standing in for browser timers.

pub mod config;
pub mod contact;
pub mod menu;
pub mod navigation;
pub mod notify;
pub mod reveal;
pub mod schedule;
pub mod skill_bars;
pub mod skills;
pub mod theme;
pub mod throttle;
pub mod tooltip;
