use web_sys::Document;

const STYLE_ELEMENT_ID: &str = "portfolio-interactions";

const INTERACTION_STYLES: &str = r#"
.navbar.scrolled {
    background: var(--nav-bg);
    backdrop-filter: blur(20px);
    box-shadow: 0 2px 20px var(--shadow-color);
}

.nav-link.active {
    color: var(--secondary-color);
}

.nav-link.active::after {
    width: 100%;
}

.hamburger.active span:nth-child(1) {
    transform: rotate(-45deg) translate(-5px, 6px);
}

.hamburger.active span:nth-child(2) {
    opacity: 0;
}

.hamburger.active span:nth-child(3) {
    transform: rotate(45deg) translate(-5px, -6px);
}

@media (max-width: 768px) {
    .nav-menu {
        position: fixed;
        left: -100%;
        top: 70px;
        flex-direction: column;
        background-color: var(--nav-bg);
        width: 100%;
        text-align: center;
        transition: 0.3s;
        box-shadow: 0 10px 27px rgba(0, 0, 0, 0.05);
        backdrop-filter: blur(20px);
        padding: 2rem 0;
        z-index: 999;
    }

    .nav-menu.active {
        left: 0;
    }
}

.skill-tooltip {
    position: absolute;
    display: none;
    z-index: 1000;
    max-width: 320px;
}

.notification {
    animation: slideInRight 0.3s ease;
}

@keyframes slideInRight {
    from {
        transform: translateX(400px);
    }
    to {
        transform: translateX(0);
    }
}
"#;

/// Append the interaction stylesheet to `<head>` unless it is already there.
pub fn inject(document: &Document) {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return;
    }

    let Some(head) = document.head() else {
        return;
    };

    let Ok(style) = document.create_element("style") else {
        return;
    };

    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(INTERACTION_STYLES));
    let _ = head.append_child(&style);
}
