use portfolio_interactions::{
    config::{env_var_name, InteractionConfig},
    navigation::anchor_target,
    skills::{SkillCatalog, SkillDataError},
};
use scraper::{ElementRef, Html, Selector};
use serde_json::json;
use std::{
    cmp::Ordering,
    collections::HashSet,
    error::Error,
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;

const DEFAULT_INDEX_PATH: &str = "index.html";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const REQUIRED_ELEMENTS: [&str; 5] = [
    ".navbar",
    ".theme-toggle",
    "#theme-icon",
    ".hamburger",
    ".nav-menu",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid selector `{0}`")]
    Selector(&'static str),
    #[error("bundled skill data is unusable: {0}")]
    SkillData(#[from] SkillDataError),
    #[error("{failed} required DOM contract check(s) failed in {path}")]
    Violated { path: String, failed: usize },
}

struct CheckerConfig {
    index_path: PathBuf,
    log_level: LogLevel,
}

impl CheckerConfig {
    fn from_env() -> Self {
        Self {
            index_path: parse_env_non_empty_string("PORTFOLIO_INDEX_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PATH)),
            log_level: parse_log_level("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Severity {
    Required,
    Advisory,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Advisory => "advisory",
        }
    }
}

#[derive(Debug, PartialEq)]
struct ContractCheck {
    name: String,
    severity: Severity,
    passed: bool,
    offenders: Vec<String>,
}

impl ContractCheck {
    fn from_offenders(name: impl Into<String>, severity: Severity, offenders: Vec<String>) -> Self {
        Self {
            name: name.into(),
            severity,
            passed: offenders.is_empty(),
            offenders,
        }
    }

    fn presence(name: impl Into<String>, severity: Severity, present: bool) -> Self {
        Self {
            name: name.into(),
            severity,
            passed: present,
            offenders: Vec::new(),
        }
    }

    fn is_failure(&self) -> bool {
        self.severity == Severity::Required && !self.passed
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let config = CheckerConfig::from_env();
    let path = config.index_path.display().to_string();
    let raw = fs::read_to_string(&config.index_path)?;
    let document = Html::parse_document(&raw);

    let interaction = page_config(&document)?;
    log_event(
        &config,
        LogLevel::Debug,
        "contract_config",
        json!({
            "path": path,
            "section_offset": interaction.section_offset,
            "mobile_breakpoint": interaction.mobile_breakpoint,
            "nav_throttle_ms": interaction.nav_throttle_ms,
            "skill_stagger_ms": interaction.skill_stagger_ms,
            "form_latency_ms": interaction.form_latency_ms,
        }),
    );

    let catalog = SkillCatalog::bundled().map_err(ContractError::from)?;
    let checks = check_document(&document, &catalog)?;

    for check in &checks {
        log_event(
            &config,
            LogLevel::Info,
            "contract_check",
            json!({
                "check": check.name,
                "severity": check.severity.as_str(),
                "passed": check.passed,
                "offenders": check.offenders,
            }),
        );
    }

    let failed = checks.iter().filter(|check| check.is_failure()).count();
    let advisories = checks
        .iter()
        .filter(|check| check.severity == Severity::Advisory && !check.passed)
        .count();
    log_event(
        &config,
        LogLevel::Info,
        "contract_summary",
        json!({
            "path": path,
            "checks": checks.len(),
            "failed": failed,
            "advisories": advisories,
        }),
    );

    if failed > 0 {
        return Err(ContractError::Violated { path, failed }.into());
    }

    Ok(())
}

fn selector(css: &'static str) -> Result<Selector, ContractError> {
    Selector::parse(css).map_err(|_| ContractError::Selector(css))
}

/// Effective settings for the page: `data-*` on `<body>` first, then
/// `PORTFOLIO_*` environment variables.
fn page_config(document: &Html) -> Result<InteractionConfig, ContractError> {
    let body_selector = selector("body")?;
    let body = document.select(&body_selector).next();

    Ok(InteractionConfig::from_lookup(|key| {
        body.and_then(|body| body.value().attr(&format!("data-{key}")))
            .map(ToString::to_string)
            .or_else(|| std::env::var(env_var_name(key)).ok())
    }))
}

fn check_document(document: &Html, catalog: &SkillCatalog) -> Result<Vec<ContractCheck>, ContractError> {
    let mut checks = Vec::new();

    for css in REQUIRED_ELEMENTS {
        let present = document.select(&selector(css)?).next().is_some();
        checks.push(ContractCheck::presence(
            format!("element {css}"),
            Severity::Required,
            present,
        ));
    }

    let section_ids = section_ids(document)?;
    let mut seen = HashSet::new();
    let duplicates: Vec<String> = section_ids
        .iter()
        .filter(|id| !seen.insert(id.as_str()))
        .cloned()
        .collect();
    checks.push(ContractCheck::from_offenders(
        "unique section ids",
        Severity::Required,
        duplicates,
    ));

    let known: HashSet<&str> = section_ids.iter().map(String::as_str).collect();
    let dangling: Vec<String> = document
        .select(&selector(".nav-link")?)
        .map(|link| link.value().attr("href").unwrap_or_default().to_string())
        .filter(|href| !anchor_target(href).is_some_and(|id| known.contains(id)))
        .collect();
    checks.push(ContractCheck::from_offenders(
        "nav links target sections",
        Severity::Required,
        dangling,
    ));

    let without_width: Vec<String> = document
        .select(&selector(".skill-progress")?)
        .enumerate()
        .filter(|(_, bar)| inline_width(*bar).is_none())
        .map(|(index, _)| format!(".skill-progress[{index}]"))
        .collect();
    checks.push(ContractCheck::from_offenders(
        "skill bars declare inline width",
        Severity::Required,
        without_width,
    ));

    let span = selector("span")?;
    let inert: Vec<String> = document
        .select(&selector(".skill-item")?)
        .map(|item| {
            item.select(&span)
                .next()
                .map(|label| label.text().collect::<String>())
                .unwrap_or_default()
        })
        .filter(|label| !catalog.contains(label))
        .collect();
    checks.push(ContractCheck::from_offenders(
        "skill labels have descriptors",
        Severity::Advisory,
        inert,
    ));

    let form = document.select(&selector(".contact-form form")?).next();
    checks.push(ContractCheck::presence(
        "contact form",
        Severity::Advisory,
        form.is_some(),
    ));
    if let Some(form) = form {
        let has_submit = form
            .select(&selector("button[type=\"submit\"]")?)
            .next()
            .is_some();
        checks.push(ContractCheck::presence(
            "contact form submit button",
            Severity::Advisory,
            has_submit,
        ));
    }

    checks.push(ContractCheck::presence(
        "scroll indicator",
        Severity::Advisory,
        document.select(&selector(".scroll-indicator")?).next().is_some(),
    ));

    Ok(checks)
}

fn section_ids(document: &Html) -> Result<Vec<String>, ContractError> {
    Ok(document
        .select(&selector("section[id]")?)
        .filter_map(|section| section.value().id())
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Value of the `width` declaration in the element's `style` attribute.
fn inline_width(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("style")?
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .find(|(property, _)| property.trim().eq_ignore_ascii_case("width"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_log_level(name: &str, default: LogLevel) -> LogLevel {
    match parse_env_non_empty_string(name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        _ => default,
    }
}

fn log_event(config: &CheckerConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert("level".to_string(), serde_json::Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    println!("{}", serde_json::Value::Object(payload));
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE_PAGE: &str = r##"
        <html>
        <body data-nav-throttle-ms="40">
            <nav class="navbar">
                <ul class="nav-menu">
                    <li><a class="nav-link" href="#home">Home</a></li>
                    <li><a class="nav-link" href="#skills">Skills</a></li>
                    <li><a class="nav-link" href="#contact">Contact</a></li>
                </ul>
                <button class="theme-toggle"><i id="theme-icon" class="fas fa-moon"></i></button>
                <div class="hamburger"><span></span><span></span><span></span></div>
            </nav>
            <section id="home"><div class="scroll-indicator"></div></section>
            <section id="skills" class="skills">
                <div class="skill-item"><span>PCB Rework</span></div>
                <div class="skill-item"><span>Soldering</span></div>
                <div class="skill-progress" style="width: 90%"></div>
                <div class="skill-progress" style="color: red; WIDTH:75%;"></div>
            </section>
            <section id="contact">
                <div class="contact-form">
                    <form>
                        <input type="text">
                        <textarea></textarea>
                        <button type="submit">Send Message</button>
                    </form>
                </div>
            </section>
        </body>
        </html>
    "##;

    fn checks_for(html: &str) -> Vec<ContractCheck> {
        let document = Html::parse_document(html);
        let catalog = SkillCatalog::bundled().expect("bundled skills");
        check_document(&document, &catalog).expect("selectors parse")
    }

    fn find<'a>(checks: &'a [ContractCheck], name: &str) -> &'a ContractCheck {
        checks
            .iter()
            .find(|check| check.name == name)
            .unwrap_or_else(|| panic!("missing check {name}"))
    }

    #[test]
    fn complete_page_passes_every_check() {
        let checks = checks_for(COMPLETE_PAGE);

        assert!(checks.iter().all(|check| check.passed), "{checks:?}");
        assert_eq!(checks.iter().filter(|check| check.is_failure()).count(), 0);
    }

    #[test]
    fn missing_required_elements_fail() {
        let checks = checks_for(
            r#"<html><body><nav class="navbar"></nav><section id="home"></section></body></html>"#,
        );

        assert!(find(&checks, "element .navbar").passed);
        for css in [".theme-toggle", "#theme-icon", ".hamburger", ".nav-menu"] {
            assert!(find(&checks, &format!("element {css}")).is_failure());
        }
    }

    #[test]
    fn duplicate_section_ids_are_reported() {
        let checks = checks_for(
            r#"<html><body>
                <section id="about"></section>
                <section id="work"></section>
                <section id="about"></section>
            </body></html>"#,
        );

        let check = find(&checks, "unique section ids");
        assert!(check.is_failure());
        assert_eq!(check.offenders, vec!["about".to_string()]);
    }

    #[test]
    fn nav_links_must_point_at_existing_sections() {
        let checks = checks_for(
            r##"<html><body>
                <a class="nav-link" href="#home">Home</a>
                <a class="nav-link" href="#blog">Blog</a>
                <a class="nav-link" href="/resume.pdf">Resume</a>
                <a class="nav-link" href="#">Top</a>
                <section id="home"></section>
            </body></html>"##,
        );

        let check = find(&checks, "nav links target sections");
        assert_eq!(
            check.offenders,
            vec!["#blog".to_string(), "/resume.pdf".to_string(), "#".to_string()]
        );
    }

    #[test]
    fn skill_bars_without_inline_width_fail() {
        let checks = checks_for(
            r#"<html><body>
                <div class="skill-progress" style="width: 80%"></div>
                <div class="skill-progress"></div>
                <div class="skill-progress" style="height: 4px; width: "></div>
            </body></html>"#,
        );

        let check = find(&checks, "skill bars declare inline width");
        assert_eq!(
            check.offenders,
            vec![".skill-progress[1]".to_string(), ".skill-progress[2]".to_string()]
        );
    }

    #[test]
    fn unknown_skill_labels_are_advisory() {
        let checks = checks_for(
            r#"<html><body>
                <div class="skill-item"><span>Power BI</span></div>
                <div class="skill-item"><span>Juggling</span></div>
            </body></html>"#,
        );

        let check = find(&checks, "skill labels have descriptors");
        assert_eq!(check.severity, Severity::Advisory);
        assert!(!check.passed);
        assert!(!check.is_failure());
        assert_eq!(check.offenders, vec!["Juggling".to_string()]);
    }

    #[test]
    fn contact_form_without_submit_is_advisory() {
        let checks = checks_for(
            r#"<html><body><div class="contact-form"><form><input></form></div></body></html>"#,
        );

        assert!(find(&checks, "contact form").passed);
        let submit = find(&checks, "contact form submit button");
        assert!(!submit.passed);
        assert!(!submit.is_failure());
    }

    #[test]
    fn absent_contact_form_skips_submit_check() {
        let checks = checks_for("<html><body></body></html>");

        assert!(!find(&checks, "contact form").passed);
        assert!(checks
            .iter()
            .all(|check| check.name != "contact form submit button"));
        assert!(!find(&checks, "scroll indicator").passed);
    }

    #[test]
    fn inline_width_reads_case_insensitive_property() {
        let document = Html::parse_fragment(r#"<div style="color: red; WIDTH : 42% ;"></div>"#);
        let div = selector("div").expect("selector");
        let element = document.select(&div).next().expect("div");

        assert_eq!(inline_width(element), Some("42%".to_string()));
    }

    #[test]
    fn body_data_attributes_configure_the_page() {
        let document = Html::parse_document(COMPLETE_PAGE);
        let config = page_config(&document).expect("selector");

        assert_eq!(config.nav_throttle_ms, 40);
    }

    #[test]
    fn log_level_ordering_filters_debug() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert_eq!(LogLevel::Info.as_str(), "info");
    }
}
