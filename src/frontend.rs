mod dom;
mod overlay;
mod styles;

use js_sys::{Array, Function, Reflect};
use log::{debug, error, info, warn};
use portfolio_interactions::{
    config::InteractionConfig,
    contact::{floating_label, ContactFormController, ContactFormView, FieldEvent},
    menu::MobileMenu,
    navigation::{anchor_target, scroll_destination, NavLinks, ScrollChrome, SectionBounds, SectionLayout},
    notify::Notifier,
    reveal::{Reveal, RevealTracker},
    schedule::{Scheduler, TaskHandle},
    skill_bars::{SkillBar, SkillBarAnimator, SkillBarView},
    skills::SkillCatalog,
    theme::{Theme, ThemeController, ThemeStore},
    throttle::Throttle,
    tooltip::{Point, Spacing, TooltipController, Viewport},
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement,
    HtmlInputElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MouseEvent, ScrollBehavior, ScrollToOptions,
};

use dom::{
    body_data, contains_target, event_element, has_ancestor, listen, local_storage, query,
    query_all, query_all_in, scroll_y, set_class, set_style, viewport_size, BrowserScheduler,
};
use overlay::OverlayHandle;

const REVEAL_CARD_SELECTOR: &str =
    ".project-card, .achievement-card, .competency-item, .experience-content, .education-item";
const REVEAL_ID_ATTRIBUTE: &str = "data-reveal-id";
const SKILLS_CONTAINER_CLASS: &str = "skills";

struct Page {
    document: Document,
    config: InteractionConfig,
    scheduler: Rc<dyn Scheduler>,
    overlay: Rc<OverlayHandle>,
    notifier: Rc<Notifier>,
    menu: Option<MenuHandle>,
}

pub fn run() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(document) = window().and_then(|w| w.document()) else {
        error!("no document available; interactions disabled");
        return;
    };

    styles::inject(&document);

    let config = InteractionConfig::from_lookup(|key| body_data(&document, key));
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);

    let Some(overlay) = OverlayHandle::mount(&document).map(Rc::new) else {
        error!("could not mount overlay host; interactions disabled");
        return;
    };

    let notifier = Rc::new(Notifier::new(
        Rc::clone(&scheduler),
        overlay.clone(),
        config.toast.clone(),
    ));
    let menu = MenuHandle::find(&document, config.mobile_breakpoint);

    let page = Page {
        document,
        config,
        scheduler,
        overlay,
        notifier,
        menu,
    };

    setup_navigation(&page);
    setup_theme_toggle(&page);
    setup_mobile_menu(&page);
    setup_scroll_animations(&page);
    setup_skill_tooltips(&page);
    setup_contact_form(&page);
    setup_smooth_scrolling(&page);

    info!("portfolio interactions initialized");
}

fn measure_sections(sections: &[Element], offset: f64, warned: &Cell<bool>) -> SectionLayout {
    let bounds: Vec<SectionBounds> = sections
        .iter()
        .filter(|section| !section.id().is_empty())
        .filter_map(|section| {
            let html = section.dyn_ref::<HtmlElement>()?;
            Some(SectionBounds::new(
                section.id(),
                f64::from(html.offset_top()),
                f64::from(section.client_height()),
            ))
        })
        .collect();

    match SectionLayout::new(bounds.clone(), offset) {
        Ok(layout) => layout,
        Err(err) => {
            if !warned.replace(true) {
                warn!("section layout is ambiguous ({err}); using last matching section");
            }
            SectionLayout::new_unchecked(bounds, offset)
        }
    }
}

fn setup_navigation(page: &Page) {
    let Some(navbar) = query(&page.document, ".navbar") else {
        warn!("no .navbar found; navigation tracking disabled");
        return;
    };

    let links = query_all(&page.document, ".nav-link");
    let hrefs: Vec<String> = links
        .iter()
        .map(|link| link.get_attribute("href").unwrap_or_default())
        .collect();
    let nav_links = Rc::new(RefCell::new(NavLinks::new(hrefs.iter().map(String::as_str))));
    let sections = Rc::new(query_all(&page.document, "section"));
    let section_offset = page.config.section_offset;
    let warned = Rc::new(Cell::new(false));

    let refresh_active: Rc<dyn Fn()> = Rc::new(move || {
        let layout = measure_sections(&sections, section_offset, &warned);
        let mut nav_links = nav_links.borrow_mut();
        if nav_links.activate(layout.current(scroll_y())) {
            for (index, link) in links.iter().enumerate() {
                set_class(link, "active", nav_links.is_active(index));
            }
        }
    });
    refresh_active();

    let chrome = RefCell::new(ScrollChrome::new(page.config.scrolled_threshold));
    let indicator = query(&page.document, ".scroll-indicator");
    let throttle = Throttle::new(Rc::clone(&page.scheduler), page.config.nav_throttle_ms);

    let Some(win) = window() else {
        return;
    };

    listen(&win, "scroll", move |_: Event| {
        let mut chrome = chrome.borrow_mut();
        if chrome.update(scroll_y()) {
            set_class(&navbar, "scrolled", chrome.is_scrolled());
            if let Some(indicator) = indicator.as_ref() {
                set_style(indicator, "opacity", chrome.indicator_opacity());
            }
        }

        let refresh_active = Rc::clone(&refresh_active);
        throttle.call(move || refresh_active());
    });
}

struct LocalThemeStore;

impl ThemeStore for LocalThemeStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

#[derive(Clone)]
struct ThemeTargets {
    body: Option<HtmlElement>,
    icon: Option<Element>,
    toggle: Element,
}

impl ThemeTargets {
    fn apply(&self, theme: Theme) {
        if let Some(body) = self.body.as_ref() {
            let _ = match theme.body_attribute() {
                Some(value) => body.set_attribute("data-theme", value),
                None => body.remove_attribute("data-theme"),
            };
        }

        if let Some(icon) = self.icon.as_ref() {
            icon.set_class_name(theme.icon_class());
        }

        let _ = self.toggle.set_attribute("aria-label", &theme.toggle_label());
    }

    fn apply_with_transition(&self, theme: Theme, document: &Document) {
        if prefers_reduced_motion() {
            self.apply(theme);
            return;
        }

        let document_js: JsValue = document.clone().into();
        let Ok(start_view_transition) =
            Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
        else {
            self.apply(theme);
            return;
        };

        let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
            self.apply(theme);
            return;
        };

        let targets = self.clone();
        let callback = Closure::once_into_js(move || targets.apply(theme));

        if start_view_transition
            .call1(&document_js, &callback)
            .is_err()
        {
            self.apply(theme);
        }
    }
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn setup_theme_toggle(page: &Page) {
    let Some(toggle) = query(&page.document, ".theme-toggle") else {
        warn!("no .theme-toggle found; theme switching disabled");
        return;
    };

    let targets = ThemeTargets {
        body: page.document.body(),
        icon: page.document.get_element_by_id("theme-icon"),
        toggle: toggle.clone(),
    };

    let controller = RefCell::new(ThemeController::load(LocalThemeStore));
    targets.apply(controller.borrow().theme());

    let document = page.document.clone();
    listen(&toggle, "click", move |_: Event| {
        let next = controller.borrow_mut().toggle();
        debug!("theme toggled to {}", next.as_str());
        targets.apply_with_transition(next, &document);
    });
}

#[derive(Clone)]
struct MenuHandle {
    state: Rc<RefCell<MobileMenu>>,
    hamburger: Element,
    panel: Element,
}

impl MenuHandle {
    fn find(document: &Document, breakpoint: f64) -> Option<Self> {
        let hamburger = query(document, ".hamburger")?;
        let panel = query(document, ".nav-menu")?;
        Some(Self {
            state: Rc::new(RefCell::new(MobileMenu::new(breakpoint))),
            hamburger,
            panel,
        })
    }

    fn update(&self, change: impl FnOnce(&mut MobileMenu) -> bool) {
        let mut state = self.state.borrow_mut();
        if change(&mut *state) {
            set_class(&self.hamburger, "active", state.is_open());
            set_class(&self.panel, "active", state.is_open());
        }
    }
}

fn setup_mobile_menu(page: &Page) {
    let Some(menu) = page.menu.clone() else {
        warn!("no .hamburger/.nav-menu pair found; mobile menu disabled");
        return;
    };

    {
        let menu = menu.clone();
        listen(&menu.hamburger.clone(), "click", move |_: Event| {
            menu.update(|state| {
                state.toggle();
                true
            });
        });
    }

    {
        let menu = menu.clone();
        listen(&page.document, "click", move |event: Event| {
            let target = event_element(&event);
            let inside = contains_target(&menu.hamburger, target.as_ref())
                || contains_target(&menu.panel, target.as_ref());
            menu.update(|state| state.on_document_click(inside));
        });
    }

    {
        let menu = menu.clone();
        listen(&page.document, "keydown", move |event: KeyboardEvent| {
            let key = event.key();
            menu.update(|state| state.on_key(&key));
        });
    }

    let Some(win) = window() else {
        return;
    };

    let throttle = Throttle::new(Rc::clone(&page.scheduler), page.config.resize_throttle_ms);
    listen(&win, "resize", move |_: Event| {
        let menu = menu.clone();
        throttle.call(move || {
            let (width, _) = viewport_size();
            menu.update(|state| state.on_resize(width));
        });
    });
}

struct DomSkillBars {
    bars: Vec<Element>,
}

impl SkillBarView for DomSkillBars {
    fn project(&self, index: usize, bar: &SkillBar) {
        let Some(element) = self.bars.get(index) else {
            return;
        };

        set_style(element, "width", &bar.width);
        let _ = element.set_attribute("data-width", &bar.target_width);
        if bar.animated {
            set_class(element, "animate", true);
        }
    }
}

fn setup_skill_bars(page: &Page) -> Rc<SkillBarAnimator> {
    let bars = query_all(&page.document, ".skill-progress");
    let declared: Vec<String> = bars
        .iter()
        .map(|bar| {
            bar.dyn_ref::<HtmlElement>()
                .and_then(|html| html.style().get_property_value("width").ok())
                .unwrap_or_default()
        })
        .collect();

    Rc::new(SkillBarAnimator::capture(
        declared,
        Rc::new(DomSkillBars { bars }),
        Rc::clone(&page.scheduler),
        page.config.skill_stagger_ms,
    ))
}

fn setup_scroll_animations(page: &Page) {
    let animator = setup_skill_bars(page);

    let mut tracker = RevealTracker::new();
    let mut targets = query_all(&page.document, "section");
    targets.extend(query_all(&page.document, REVEAL_CARD_SELECTOR));

    for target in &targets {
        let id = tracker.register(target.class_list().contains(SKILLS_CONTAINER_CLASS));
        set_class(target, "fade-in", true);
        let _ = target.set_attribute(REVEAL_ID_ATTRIBUTE, &id.to_string());
    }

    let tracker = Rc::new(RefCell::new(tracker));
    let reveal = {
        let animator = Rc::clone(&animator);
        move |target: &Element, intersecting: bool| -> bool {
            let Some(id) = target
                .get_attribute(REVEAL_ID_ATTRIBUTE)
                .and_then(|value| value.parse::<usize>().ok())
            else {
                return false;
            };

            let outcome = tracker.borrow_mut().on_intersection(id, intersecting);
            match outcome {
                Reveal::Revealed { trigger_skill_bars } => {
                    set_class(target, "visible", true);
                    if trigger_skill_bars {
                        animator.trigger();
                    }
                    true
                }
                Reveal::Unchanged => false,
            }
        }
    };

    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                if reveal(&target, entry.is_intersecting()) {
                    observer.unobserve(&target);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(page.config.reveal_threshold));
    options.set_root_margin(&page.config.reveal_root_margin);

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
        Ok(observer) => {
            for target in &targets {
                observer.observe(target);
            }
            callback.forget();
        }
        Err(_) => {
            warn!("IntersectionObserver unavailable; revealing everything");
            for target in &targets {
                set_class(target, "visible", true);
            }
            animator.trigger();
        }
    }
}

fn setup_skill_tooltips(page: &Page) {
    let catalog = match SkillCatalog::bundled() {
        Ok(catalog) => Rc::new(catalog),
        Err(err) => {
            error!("skill data unavailable: {err}");
            return;
        }
    };

    let items = Rc::new(query_all(&page.document, ".skill-item"));
    let labels: Vec<String> = items
        .iter()
        .map(|item| {
            item.query_selector("span")
                .ok()
                .flatten()
                .and_then(|label| label.text_content())
                .unwrap_or_default()
        })
        .collect();

    let controller = Rc::new(RefCell::new(TooltipController::new(
        catalog,
        labels,
        Spacing {
            margin: page.config.tooltip_margin,
            gap: page.config.tooltip_gap,
        },
    )));
    let measure: Rc<RefCell<Option<TaskHandle>>> = Rc::new(RefCell::new(None));

    let project_items = {
        let items = Rc::clone(&items);
        move |active: Option<usize>| {
            for (index, item) in items.iter().enumerate() {
                set_class(item, "active", active == Some(index));
            }
        }
    };
    let project_items = Rc::new(project_items);

    for (index, item) in items.iter().enumerate() {
        if !controller.borrow().is_interactive(index) {
            continue;
        }

        set_style(item, "cursor", "pointer");

        let controller = Rc::clone(&controller);
        let overlay = Rc::clone(&page.overlay);
        let scheduler = Rc::clone(&page.scheduler);
        let measure = Rc::clone(&measure);
        let project_items = Rc::clone(&project_items);
        listen(item, "click", move |event: MouseEvent| {
            event.prevent_default();
            let anchor = Point {
                x: f64::from(event.page_x()),
                y: f64::from(event.page_y()),
            };

            let view = controller.borrow_mut().open(index, anchor).cloned();
            if view.is_none() {
                return;
            }
            project_items(Some(index));
            overlay.set_tooltip(view);

            let controller = Rc::clone(&controller);
            let overlay = Rc::clone(&overlay);
            let handle = scheduler.schedule(
                0,
                Box::new(move || {
                    let Some(size) = overlay.tooltip_size() else {
                        return;
                    };
                    let viewport = Viewport {
                        width: viewport_size().0,
                        top: scroll_y(),
                    };
                    let mut controller = controller.borrow_mut();
                    if controller.place(size, viewport).is_some() {
                        overlay.set_tooltip(controller.view().cloned());
                    }
                }),
            );
            *measure.borrow_mut() = Some(handle);
        });
    }

    let dismiss = {
        let overlay = Rc::clone(&page.overlay);
        move |changed: bool| {
            if changed {
                drop(measure.take());
                project_items(None);
                overlay.set_tooltip(None);
            }
        }
    };
    let dismiss = Rc::new(dismiss);

    {
        let controller = Rc::clone(&controller);
        let dismiss = Rc::clone(&dismiss);
        listen(&page.document, "click", move |event: Event| {
            let target = event_element(&event);
            let inside = has_ancestor(target.as_ref(), ".skill-item")
                || has_ancestor(target.as_ref(), ".skill-tooltip");
            let changed = controller.borrow_mut().on_document_click(inside);
            dismiss(changed);
        });
    }

    if let Some(win) = window() {
        listen(&win, "scroll", move |_: Event| {
            let changed = controller.borrow_mut().on_scroll();
            dismiss(changed);
        });
    }
}

struct DomContactForm {
    form: HtmlFormElement,
    submit: Option<HtmlButtonElement>,
}

impl ContactFormView for DomContactForm {
    fn submit_label(&self) -> String {
        self.submit
            .as_ref()
            .and_then(|button| button.text_content())
            .unwrap_or_default()
    }

    fn set_submit_state(&self, label: &str, disabled: bool) {
        if let Some(button) = self.submit.as_ref() {
            button.set_text_content(Some(label));
            button.set_disabled(disabled);
        }
    }

    fn reset_fields(&self) {
        self.form.reset();
    }
}

fn field_value(field: &Element) -> String {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(textarea) = field.dyn_ref::<HtmlTextAreaElement>() {
        return textarea.value();
    }
    String::new()
}

fn setup_contact_form(page: &Page) {
    let Some(form) = query(&page.document, ".contact-form form")
        .and_then(|form| form.dyn_into::<HtmlFormElement>().ok())
    else {
        debug!("no contact form on this page");
        return;
    };

    let submit = form
        .query_selector("button[type=\"submit\"]")
        .ok()
        .flatten()
        .and_then(|button| button.dyn_into::<HtmlButtonElement>().ok());
    if submit.is_none() {
        warn!("contact form has no submit button");
    }

    let controller = ContactFormController::new(
        Rc::new(DomContactForm {
            form: form.clone(),
            submit,
        }),
        Rc::clone(&page.notifier),
        Rc::clone(&page.scheduler),
        page.config.form_latency_ms,
    );

    listen(&form, "submit", move |event: Event| {
        event.prevent_default();
        controller.submit();
    });

    for field in query_all_in(&form, "input, textarea") {
        for (event_name, kind) in [("focus", FieldEvent::Focus), ("blur", FieldEvent::Blur)] {
            let field_for_handler = field.clone();
            listen(&field, event_name, move |_: Event| {
                let Some(container) = field_for_handler.parent_element() else {
                    return;
                };
                if let Some(focused) = floating_label(kind, &field_value(&field_for_handler)) {
                    set_class(&container, "focused", focused);
                }
            });
        }
    }
}

fn setup_smooth_scrolling(page: &Page) {
    let offset = page.config.smooth_scroll_offset;

    for link in query_all(&page.document, "a[href^=\"#\"]") {
        let document = page.document.clone();
        let menu = page.menu.clone();
        let is_nav_link = link.class_list().contains("nav-link");
        let href = link.get_attribute("href").unwrap_or_default();

        listen(&link, "click", move |event: Event| {
            let target = anchor_target(&href)
                .and_then(|id| document.get_element_by_id(id))
                .and_then(|target| target.dyn_into::<HtmlElement>().ok());

            if let Some(target) = target {
                event.prevent_default();
                let options = ScrollToOptions::new();
                options.set_top(scroll_destination(f64::from(target.offset_top()), offset));
                options.set_behavior(ScrollBehavior::Smooth);
                if let Some(win) = window() {
                    win.scroll_to_with_scroll_to_options(&options);
                }
            }

            if is_nav_link {
                if let Some(menu) = menu.as_ref() {
                    menu.update(MobileMenu::on_nav_link);
                }
            }
        });
    }
}
