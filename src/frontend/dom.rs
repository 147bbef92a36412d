use gloo_timers::callback::Timeout;
use log::warn;
use portfolio_interactions::schedule::{Scheduler, Task, TaskHandle};
use std::{cell::Cell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Document, Element, Event, EventTarget, HtmlElement, Node, Storage};

/// Timers backed by `setTimeout`. A forgotten handle leaks its timeout so it
/// still fires; a dropped one clears it.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskHandle {
        let slot = Rc::new(Cell::new(Some(Timeout::new(delay_ms, task))));
        let detach_slot = Rc::clone(&slot);

        TaskHandle::with_detach(
            move || drop(slot.take()),
            move || {
                if let Some(timeout) = detach_slot.take() {
                    let _ = timeout.forget();
                }
            },
        )
    }
}

pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

pub fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, enabled: bool) {
    let classes = element.class_list();
    let _ = if enabled {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}

pub fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

pub fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

pub fn contains_target(container: &Element, target: Option<&Element>) -> bool {
    target.is_some_and(|target| {
        let node: &Node = target.as_ref();
        container.contains(Some(node))
    })
}

pub fn has_ancestor(target: Option<&Element>, selector: &str) -> bool {
    target.is_some_and(|target| target.closest(selector).ok().flatten().is_some())
}

/// Value of `data-<key>` on `<body>`.
pub fn body_data(document: &Document, key: &str) -> Option<String> {
    document.body()?.get_attribute(&format!("data-{key}"))
}

/// Attach a page-lifetime listener. Events that are not an `E` are ignored.
pub fn listen<E>(target: &EventTarget, event: &str, mut handler: impl FnMut(E) + 'static)
where
    E: JsCast + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });

    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        warn!("could not attach {event} listener");
    }

    closure.forget();
}
