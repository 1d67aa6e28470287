//! Static DOM queries shared by the bundled drivers
//!
//! Documents are kept as raw HTML and parsed per query; `scraper::Html` is
//! not `Send` and cannot be held across await points. Every query therefore
//! costs one full document parse: a detail page read through the configured
//! fallback chains is parsed roughly once per strategy tried. Selectors, by
//! contrast, are parsed once per process and reused.

use crate::driver::traits::{DriverError, DriverResult, Element};
use crate::normalize::clean_text;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};
use url::Url;

/// Parsed selectors keyed by their source text
static SELECTOR_CACHE: LazyLock<Mutex<HashMap<String, Selector>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Parses a CSS selector, mapping failures to a driver error
///
/// Successful parses are cached; invalid selectors are re-parsed (and
/// rejected) every time.
pub fn parse_selector(selector: &str) -> DriverResult<Selector> {
    if let Some(parsed) = selector_cache().get(selector) {
        return Ok(parsed.clone());
    }

    let parsed = Selector::parse(selector).map_err(|e| DriverError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })?;

    selector_cache().insert(selector.to_string(), parsed.clone());
    Ok(parsed)
}

fn selector_cache() -> std::sync::MutexGuard<'static, HashMap<String, Selector>> {
    SELECTOR_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Snapshots every element of `html` matching `selector`
///
/// # Arguments
///
/// * `html` - The document source
/// * `base` - URL the document was loaded from, for resolving links
/// * `selector` - CSS selector
pub fn select_all(html: &str, base: &Url, selector: &str) -> DriverResult<Vec<Element>> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&parsed)
        .map(|element| snapshot(element, base))
        .collect())
}

/// Returns true if `selector` matches anything in `html`
pub fn matches_any(html: &str, selector: &str) -> DriverResult<bool> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let found = document.select(&parsed).next().is_some();
    Ok(found)
}

fn snapshot(element: ElementRef<'_>, base: &Url) -> Element {
    let text = clean_text(&element.text().collect::<String>());

    let attributes = element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    Element::new(text, attributes, enclosing_link(element, base))
}

/// Resolves the href of the element itself or its nearest anchor ancestor
fn enclosing_link(element: ElementRef<'_>, base: &Url) -> Option<String> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| {
            candidate.value().name() == "a" && candidate.value().attr("href").is_some()
        })
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| base.join(href.trim()).ok())
        .map(|resolved| resolved.to_string())
}
