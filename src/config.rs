//! Timing and geometry knobs for every component.
//!
//! Values come from a key lookup so the browser can read `data-*` attributes
//! on `<body>` and the native checker can read environment variables. Anything
//! missing, unparsable, or outside its bounds keeps the default.

pub const DEFAULT_SECTION_OFFSET: f64 = 100.0;
pub const DEFAULT_SCROLLED_THRESHOLD: f64 = 100.0;
pub const DEFAULT_SMOOTH_SCROLL_OFFSET: f64 = 80.0;
pub const DEFAULT_NAV_THROTTLE_MS: u32 = 100;
pub const DEFAULT_RESIZE_THROTTLE_MS: u32 = 250;
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 768.0;
pub const DEFAULT_SKILL_STAGGER_MS: u32 = 200;
pub const DEFAULT_TOOLTIP_MARGIN: f64 = 10.0;
pub const DEFAULT_TOOLTIP_GAP: f64 = 20.0;
pub const DEFAULT_FORM_LATENCY_MS: u32 = 2_000;
pub const DEFAULT_TOAST_ENTER_DELAY_MS: u32 = 100;
pub const DEFAULT_TOAST_HOLD_MS: u32 = 3_000;
pub const DEFAULT_TOAST_EXIT_MS: u32 = 300;
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
pub const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

const OFFSET_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const BREAKPOINT_BOUNDS: (f64, f64) = (320.0, 4_096.0);
const TOOLTIP_SPACING_BOUNDS: (f64, f64) = (0.0, 200.0);
const THROTTLE_MS_BOUNDS: (u32, u32) = (0, 5_000);
const STAGGER_MS_BOUNDS: (u32, u32) = (0, 5_000);
const LATENCY_MS_BOUNDS: (u32, u32) = (0, 60_000);
const TOAST_MS_BOUNDS: (u32, u32) = (0, 60_000);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);

#[derive(Clone, Debug, PartialEq)]
pub struct ToastTimings {
    pub enter_delay_ms: u32,
    pub hold_ms: u32,
    pub exit_ms: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    pub section_offset: f64,
    pub scrolled_threshold: f64,
    pub smooth_scroll_offset: f64,
    pub nav_throttle_ms: u32,
    pub resize_throttle_ms: u32,
    pub mobile_breakpoint: f64,
    pub skill_stagger_ms: u32,
    pub tooltip_margin: f64,
    pub tooltip_gap: f64,
    pub form_latency_ms: u32,
    pub toast: ToastTimings,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            section_offset: DEFAULT_SECTION_OFFSET,
            scrolled_threshold: DEFAULT_SCROLLED_THRESHOLD,
            smooth_scroll_offset: DEFAULT_SMOOTH_SCROLL_OFFSET,
            nav_throttle_ms: DEFAULT_NAV_THROTTLE_MS,
            resize_throttle_ms: DEFAULT_RESIZE_THROTTLE_MS,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            skill_stagger_ms: DEFAULT_SKILL_STAGGER_MS,
            tooltip_margin: DEFAULT_TOOLTIP_MARGIN,
            tooltip_gap: DEFAULT_TOOLTIP_GAP,
            form_latency_ms: DEFAULT_FORM_LATENCY_MS,
            toast: ToastTimings {
                enter_delay_ms: DEFAULT_TOAST_ENTER_DELAY_MS,
                hold_ms: DEFAULT_TOAST_HOLD_MS,
                exit_ms: DEFAULT_TOAST_EXIT_MS,
            },
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_root_margin: DEFAULT_REVEAL_ROOT_MARGIN.to_string(),
        }
    }
}

impl InteractionConfig {
    /// Build a config from a lookup keyed by kebab-case names such as
    /// `nav-throttle-ms`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let f64_key = |key: &str, default: f64, bounds: (f64, f64)| {
            parse_f64_with_bounds(lookup(key).as_deref(), default, bounds)
        };
        let ms_key = |key: &str, default: u32, bounds: (u32, u32)| {
            parse_u32_with_bounds(lookup(key).as_deref(), default, bounds)
        };

        Self {
            section_offset: f64_key("section-offset", DEFAULT_SECTION_OFFSET, OFFSET_BOUNDS),
            scrolled_threshold: f64_key(
                "scrolled-threshold",
                DEFAULT_SCROLLED_THRESHOLD,
                OFFSET_BOUNDS,
            ),
            smooth_scroll_offset: f64_key(
                "smooth-scroll-offset",
                DEFAULT_SMOOTH_SCROLL_OFFSET,
                OFFSET_BOUNDS,
            ),
            nav_throttle_ms: ms_key("nav-throttle-ms", DEFAULT_NAV_THROTTLE_MS, THROTTLE_MS_BOUNDS),
            resize_throttle_ms: ms_key(
                "resize-throttle-ms",
                DEFAULT_RESIZE_THROTTLE_MS,
                THROTTLE_MS_BOUNDS,
            ),
            mobile_breakpoint: f64_key(
                "mobile-breakpoint",
                DEFAULT_MOBILE_BREAKPOINT,
                BREAKPOINT_BOUNDS,
            ),
            skill_stagger_ms: ms_key("skill-stagger-ms", DEFAULT_SKILL_STAGGER_MS, STAGGER_MS_BOUNDS),
            tooltip_margin: f64_key("tooltip-margin", DEFAULT_TOOLTIP_MARGIN, TOOLTIP_SPACING_BOUNDS),
            tooltip_gap: f64_key("tooltip-gap", DEFAULT_TOOLTIP_GAP, TOOLTIP_SPACING_BOUNDS),
            form_latency_ms: ms_key("form-latency-ms", DEFAULT_FORM_LATENCY_MS, LATENCY_MS_BOUNDS),
            toast: ToastTimings {
                enter_delay_ms: ms_key(
                    "toast-enter-delay-ms",
                    DEFAULT_TOAST_ENTER_DELAY_MS,
                    TOAST_MS_BOUNDS,
                ),
                hold_ms: ms_key("toast-hold-ms", DEFAULT_TOAST_HOLD_MS, TOAST_MS_BOUNDS),
                exit_ms: ms_key("toast-exit-ms", DEFAULT_TOAST_EXIT_MS, TOAST_MS_BOUNDS),
            },
            reveal_threshold: f64_key(
                "reveal-threshold",
                DEFAULT_REVEAL_THRESHOLD,
                REVEAL_THRESHOLD_BOUNDS,
            ),
            reveal_root_margin: lookup("reveal-root-margin")
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_REVEAL_ROOT_MARGIN.to_string()),
        }
    }
}

/// `nav-throttle-ms` becomes `PORTFOLIO_NAV_THROTTLE_MS`.
pub fn env_var_name(key: &str) -> String {
    format!("PORTFOLIO_{}", key.replace('-', "_").to_ascii_uppercase())
}

fn parse_u32_with_bounds(value: Option<&str>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_f64_with_bounds(value: Option<&str>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        assert_eq!(InteractionConfig::from_lookup(|_| None), InteractionConfig::default());
    }

    #[test]
    fn valid_overrides_are_applied() {
        let config = InteractionConfig::from_lookup(lookup_from(&[
            ("nav-throttle-ms", "50"),
            ("mobile-breakpoint", " 1024 "),
            ("toast-hold-ms", "5000"),
            ("reveal-root-margin", "0px 0px -80px 0px"),
        ]));

        assert_eq!(config.nav_throttle_ms, 50);
        assert_eq!(config.mobile_breakpoint, 1024.0);
        assert_eq!(config.toast.hold_ms, 5_000);
        assert_eq!(config.reveal_root_margin, "0px 0px -80px 0px");
    }

    #[test]
    fn out_of_bounds_and_garbage_fall_back() {
        let config = InteractionConfig::from_lookup(lookup_from(&[
            ("form-latency-ms", "999999"),
            ("reveal-threshold", "1.5"),
            ("section-offset", "NaN"),
            ("skill-stagger-ms", "-3"),
            ("reveal-root-margin", "   "),
        ]));

        assert_eq!(config.form_latency_ms, DEFAULT_FORM_LATENCY_MS);
        assert_eq!(config.reveal_threshold, DEFAULT_REVEAL_THRESHOLD);
        assert_eq!(config.section_offset, DEFAULT_SECTION_OFFSET);
        assert_eq!(config.skill_stagger_ms, DEFAULT_SKILL_STAGGER_MS);
        assert_eq!(config.reveal_root_margin, DEFAULT_REVEAL_ROOT_MARGIN);
    }

    #[test]
    fn env_var_names_are_prefixed() {
        assert_eq!(env_var_name("nav-throttle-ms"), "PORTFOLIO_NAV_THROTTLE_MS");
    }
}
