//! Dynamically created elements: the skill tooltip and the toast stack.
//!
//! Both live in a small yew app mounted into a host element appended to
//! `<body>`. Component state is pushed in through [`OverlayHandle`], so the
//! rendered markup is always a projection of the library state objects.

use portfolio_interactions::{
    notify::{NotificationView, Toast, ToastPhase},
    tooltip::{Size, TooltipViewState},
};
use std::cell::RefCell;
use web_sys::{Document, Element};
use yew::{prelude::*, AppHandle};

const OVERLAY_HOST_ID: &str = "interaction-overlay";
const TOOLTIP_SELECTOR: &str = ".skill-tooltip";
const TOAST_OFFSCREEN: &str = "translateX(400px)";
const TOAST_ONSCREEN: &str = "translateX(0)";

#[derive(Clone, Default, PartialEq, Properties)]
pub struct OverlayProps {
    #[prop_or_default]
    pub tooltip: Option<TooltipViewState>,
    #[prop_or_default]
    pub toasts: Vec<Toast>,
}

#[derive(Properties, PartialEq)]
struct SkillTooltipProps {
    view: Option<TooltipViewState>,
}

#[function_component(SkillTooltip)]
fn skill_tooltip(props: &SkillTooltipProps) -> Html {
    let Some(view) = props.view.as_ref() else {
        return html! { <div class="skill-tooltip"></div> };
    };

    let style = match view.position {
        Some(position) => format!(
            "display: block; left: {:.2}px; top: {:.2}px;",
            position.x, position.y
        ),
        None => "display: block;".to_string(),
    };
    let skill = &view.content;

    html! {
        <div class={classes!("skill-tooltip", view.visible.then_some("show"))} style={style}>
            <h4>
                {skill.name.clone()}
                {" "}
                <span class="skill-level">{skill.level.clone()}</span>
            </h4>
            <p>{skill.description.clone()}</p>
            <div class="skill-experience">{skill.experience.clone()}</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ToastCardProps {
    toast: Toast,
}

#[function_component(ToastCard)]
fn toast_card(props: &ToastCardProps) -> Html {
    let toast = &props.toast;
    let transform = if toast.phase == ToastPhase::Shown {
        TOAST_ONSCREEN
    } else {
        TOAST_OFFSCREEN
    };
    let style = format!(
        "position: fixed; top: 100px; right: 20px; background: {}; color: white; \
         padding: 1rem 1.5rem; border-radius: 8px; z-index: 10000; transform: {transform}; \
         transition: transform 0.3s ease; box-shadow: 0 4px 15px rgba(0,0,0,0.2);",
        toast.kind.background()
    );

    html! {
        <div class={toast.class_name()} style={style} role="status">
            {toast.message.clone()}
        </div>
    }
}

#[function_component(Overlay)]
pub fn overlay(props: &OverlayProps) -> Html {
    html! {
        <>
            <SkillTooltip view={props.tooltip.clone()} />
            { for props.toasts.iter().map(|toast| html! {
                <ToastCard key={toast.id.to_string()} toast={toast.clone()} />
            }) }
        </>
    }
}

pub struct OverlayHandle {
    host: Element,
    app: RefCell<AppHandle<Overlay>>,
    props: RefCell<OverlayProps>,
}

impl OverlayHandle {
    pub fn mount(document: &Document) -> Option<Self> {
        let body = document.body()?;
        let host = document.create_element("div").ok()?;
        host.set_id(OVERLAY_HOST_ID);
        body.append_child(&host).ok()?;

        let app = yew::Renderer::<Overlay>::with_root_and_props(host.clone(), OverlayProps::default())
            .render();

        Some(Self {
            host,
            app: RefCell::new(app),
            props: RefCell::new(OverlayProps::default()),
        })
    }

    pub fn set_tooltip(&self, tooltip: Option<TooltipViewState>) {
        let props = {
            let mut props = self.props.borrow_mut();
            props.tooltip = tooltip;
            props.clone()
        };
        self.app.borrow_mut().update(props);
    }

    /// Rendered size of the tooltip, once its content is in the document.
    pub fn tooltip_size(&self) -> Option<Size> {
        let tooltip = self.host.query_selector(TOOLTIP_SELECTOR).ok().flatten()?;
        let rect = tooltip.get_bounding_client_rect();
        Some(Size {
            width: rect.width(),
            height: rect.height(),
        })
    }
}

impl NotificationView for OverlayHandle {
    fn render(&self, toasts: &[Toast]) {
        let props = {
            let mut props = self.props.borrow_mut();
            props.toasts = toasts.to_vec();
            props.clone()
        };
        self.app.borrow_mut().update(props);
    }
}
