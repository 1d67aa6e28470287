//! Link collection over an infinitely scrolling listing
//!
//! Each cycle queries the link-bearing elements, folds their targets into the
//! set, and scrolls only if the set grew. The loop ends on the first cycle
//! that adds nothing. Termination relies on the feed being finite: a listing
//! that keeps producing new links keeps the loop going, unless a scroll cap
//! is configured.

use crate::driver::{Element, PageDriver, SCROLL_TO_BOTTOM_SCRIPT};
use crate::model::LinkSet;
use std::time::Duration;

/// Knobs for [`collect_links_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    /// Pause after each scroll
    pub settle: Duration,

    /// Stop after this many scrolls even if links keep appearing
    pub max_scrolls: Option<u32>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1500),
            max_scrolls: None,
        }
    }
}

/// Collects the distinct link targets of every element matching `selector`
///
/// The driver must already show the listing. A failure mid-loop ends
/// collection and returns what was gathered so far.
pub async fn collect_links(driver: &dyn PageDriver, selector: &str, settle: Duration) -> LinkSet {
    collect_links_with(
        driver,
        selector,
        CollectOptions {
            settle,
            max_scrolls: None,
        },
    )
    .await
}

/// [`collect_links`] with an optional scroll cap
pub async fn collect_links_with(
    driver: &dyn PageDriver,
    selector: &str,
    options: CollectOptions,
) -> LinkSet {
    let mut links = LinkSet::new();
    let mut scrolls = 0u32;

    loop {
        let elements = match driver.query_all(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!(
                    "Link collection stopped early after {} links: {}",
                    links.len(),
                    e
                );
                break;
            }
        };

        let added = elements
            .iter()
            .filter_map(link_of)
            .filter(|link| links.insert(link.clone()))
            .count();

        tracing::debug!(
            "Scroll cycle {}: {} elements, {} new links, {} total",
            scrolls,
            elements.len(),
            added,
            links.len()
        );

        if added == 0 {
            break;
        }

        if options.max_scrolls.is_some_and(|max| scrolls >= max) {
            tracing::info!("Reached scroll cap of {} with {} links", scrolls, links.len());
            break;
        }

        if let Err(e) = driver.evaluate_script(SCROLL_TO_BOTTOM_SCRIPT).await {
            tracing::warn!(
                "Scroll failed, keeping {} links collected so far: {}",
                links.len(),
                e
            );
            break;
        }
        scrolls += 1;
        tokio::time::sleep(options.settle).await;
    }

    tracing::info!("Collected {} links after {} scrolls", links.len(), scrolls);
    links
}

/// Link carried by a listing element: its resolved anchor target, else its raw href
fn link_of(element: &Element) -> Option<String> {
    element
        .link_target()
        .or_else(|| element.attr("href"))
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
}
