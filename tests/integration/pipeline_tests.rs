//! Integration tests for the harvest pipeline
//!
//! These tests run whole harvests against canned sites served by the
//! fixture browser.

use event_harvest::config::{parse_config, Config};
use event_harvest::driver::{FixtureBrowser, FixtureSite};
use event_harvest::harvest::{deliver, Delivery, Harvester};
use event_harvest::model::EventRecord;
use event_harvest::normalize::{canonicalize_date, compose_excerpt, Genre};
use event_harvest::sink::{EventSink, SinkResult};
use std::cell::Cell;

const LISTING: &str = "https://fixture.test/events";

fn create_test_config() -> Config {
    parse_config(&format!(
        r#"
[listing]
url = "{}"
link-selector = "a.event-card"
wait-until = "load"

[timing]
settle-ms = 1
retry-attempts = 3
retry-delay-ms = 1
progress-every = 2

[selectors]
title = [{{ kind = "text", selector = "h1.title" }}]
date = [{{ kind = "text", selector = ".when", segment = 0 }}]
time = [{{ kind = "text", selector = ".when", segment = 2 }}]
location = [
    {{ kind = "text", selector = ".venue-name" }},
    {{ kind = "text", selector = ".location-alt span" }},
]
price = [{{ kind = "text", selector = ".price" }}]
image = [{{ kind = "attribute", selector = "img.poster", attribute = "src" }}]
excerpt = [{{ kind = "text", selector = ".description" }}]
buy-link = [{{ kind = "link", selector = ".tickets" }}]
"#,
        LISTING
    ))
    .expect("test config should parse")
}

fn card(id: usize) -> String {
    format!(
        r#"<div class="card"><a class="event-card" href="/events/{}">Event {}</a></div>"#,
        id, id
    )
}

/// Listing stage showing cards `1..=count`
fn stage(count: usize) -> String {
    let cards: String = (1..=count).map(card).collect();
    format!("<html><body><main>{}</main></body></html>", cards)
}

fn detail_url(id: usize) -> String {
    format!("{}/{}", LISTING, id)
}

fn detail(id: usize, description: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="title">Act {id}</h1>
        <div class="when">Mar {day}, Saturday, 8:00 PM</div>
        <div class="location-alt"><span>Hall {id}</span></div>
        <span class="price">$1{id}</span>
        <img class="poster" src="/img/{id}.jpg">
        <div class="description">{description}</div>
        <a class="tickets" href="/buy/{id}">Tickets</a>
        </body></html>"#,
        id = id,
        day = id + 10,
        description = description
    )
}

struct CountingSink {
    inserted: usize,
}

impl EventSink for CountingSink {
    fn insert_many(&mut self, records: &[EventRecord]) -> SinkResult<usize> {
        self.inserted += records.len();
        Ok(records.len())
    }
}

#[tokio::test]
async fn test_full_harvest_scrolling_listing() {
    let site = FixtureSite::new()
        .scrolling_page(LISTING, vec![stage(2), stage(4), stage(5)])
        .page(&detail_url(1), detail(1, "A night of smoky jazz standards"))
        .page(&detail_url(2), detail(2, "Loud punk from the basement"))
        .page(&detail_url(3), detail(3, "Heavy metal thunder"))
        .page(&detail_url(4), detail(4, "Something new"))
        .page(&detail_url(5), detail(5, "Deep electronic grooves"));
    let browser = FixtureBrowser::new(site);
    let config = create_test_config();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.report.aborted.is_none());
    assert_eq!(outcome.report.links_collected, 5);
    assert_eq!(outcome.report.records, 5);
    assert!(outcome.report.failed_links.is_empty());
    assert_eq!(browser.sessions_closed(), 1);

    // Records keep collection order
    let titles: Vec<_> = outcome
        .records
        .iter()
        .map(|r| r.title.clone().unwrap())
        .collect();
    assert_eq!(titles, vec!["Act 1", "Act 2", "Act 3", "Act 4", "Act 5"]);

    let genres: Vec<_> = outcome.records.iter().map(|r| r.genre).collect();
    assert_eq!(
        genres,
        vec![Genre::Jazz, Genre::Punk, Genre::Metal, Genre::Unknown, Genre::Electronic]
    );

    let first = &outcome.records[0];
    assert_eq!(first.date, canonicalize_date("Mar 11").unwrap());
    assert_eq!(first.time.as_deref(), Some("8:00 PM"));
    assert_eq!(first.location.as_deref(), Some("Hall 1"));
    assert_eq!(first.price.as_deref(), Some("$11"));
    assert_eq!(first.image.as_deref(), Some("/img/1.jpg"));
    assert_eq!(
        first.excerpt,
        compose_excerpt(Some("A night of smoky jazz standards"), Some(&detail_url(1)))
    );
    assert!(!first.is_featured);
}

#[tokio::test]
async fn test_every_link_failing_reports_no_data() {
    // Listing links to pages the site does not have
    let site = FixtureSite::new().page(LISTING, stage(3));
    let browser = FixtureBrowser::new(site);
    let config = create_test_config();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.report.aborted.is_none());
    assert_eq!(outcome.report.links_collected, 3);
    assert_eq!(outcome.report.records, 0);
    assert_eq!(outcome.report.failed_links.len(), 3);
    for id in 1..=3 {
        assert_eq!(browser.navigations(&detail_url(id)), 3);
    }
    assert_eq!(browser.sessions_closed(), 1);

    let connected = Cell::new(false);
    let delivery = deliver(&outcome.records, || {
        connected.set(true);
        Ok(CountingSink { inserted: 0 })
    })
    .unwrap();

    assert_eq!(delivery, Delivery::NoData);
    assert!(!connected.get());
}

#[tokio::test]
async fn test_partial_failures_skip_links() {
    let site = FixtureSite::new()
        .page(LISTING, stage(3))
        .page(&detail_url(1), detail(1, "folk songs"))
        .page(&detail_url(2), detail(2, "blues"))
        .page(&detail_url(3), detail(3, "soul"))
        .flaky(&detail_url(2), 3)
        .flaky(&detail_url(3), 2);
    let browser = FixtureBrowser::new(site);
    let config = create_test_config();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.report.failed_links, vec![detail_url(2)]);
    assert_eq!(outcome.records[1].title.as_deref(), Some("Act 3"));

    let delivery = deliver(&outcome.records, || Ok(CountingSink { inserted: 0 })).unwrap();
    assert_eq!(delivery, Delivery::Inserted(2));
}

#[tokio::test]
async fn test_missing_ready_selector_aborts_but_cleans_up() {
    let site = FixtureSite::new().page(LISTING, "<html><body><p>No events yet</p></body></html>");
    let browser = FixtureBrowser::new(site);
    let config = create_test_config();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.records.is_empty());
    assert!(outcome.report.aborted.is_some());
    assert_eq!(outcome.report.links_collected, 0);
    assert!(outcome.report.finished_at.is_some());
    assert_eq!(browser.sessions_opened(), 1);
    assert_eq!(browser.sessions_closed(), 1);
}

#[tokio::test]
async fn test_unreachable_listing_aborts_after_retries() {
    let site = FixtureSite::new().page(LISTING, stage(1)).flaky(LISTING, 5);
    let browser = FixtureBrowser::new(site);
    let config = create_test_config();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.report.aborted.is_some());
    assert_eq!(browser.navigations(LISTING), 3);
    assert_eq!(browser.sessions_closed(), 1);
}

#[tokio::test]
async fn test_refused_session_completes_run() {
    let browser = FixtureBrowser::new(FixtureSite::new()).refusing_sessions();
    let config = create_test_config();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.records.is_empty());
    assert!(outcome.report.aborted.is_some());
    assert_eq!(browser.total_navigations(), 0);
    assert_eq!(browser.sessions_closed(), 0);
}

#[tokio::test]
async fn test_failing_scroll_stage_keeps_partial_links() {
    let site = FixtureSite::new()
        .scrolling_page(LISTING, vec![stage(2), stage(4)])
        .query_failure_at(LISTING, 1)
        .page(&detail_url(1), detail(1, "jazz"))
        .page(&detail_url(2), detail(2, "jazz"));
    let browser = FixtureBrowser::new(site);
    let config = create_test_config();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.report.aborted.is_none());
    assert_eq!(outcome.report.links_collected, 2);
    assert_eq!(outcome.records.len(), 2);
}
