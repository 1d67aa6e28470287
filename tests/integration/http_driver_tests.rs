//! Integration tests for the HTTP driver
//!
//! These tests use wiremock to serve a listing and its detail pages and
//! run the full harvest through the HTTP browser.

use event_harvest::config::{parse_config, Config};
use event_harvest::driver::{Browser, DriverError, HttpBrowser, PageDriver};
use event_harvest::harvest::Harvester;
use event_harvest::normalize::Genre;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(base_url: &str) -> Config {
    parse_config(&format!(
        r#"
[listing]
url = "{}/events"
link-selector = ".listing a.more"

[timing]
settle-ms = 1
retry-attempts = 3
retry-delay-ms = 1

[driver]
user-agent = "EventHarvestTest/1.0"
request-timeout-secs = 5

[selectors]
title = [
    {{ kind = "text", selector = "h1.event-title" }},
    {{ kind = "attribute", selector = "meta[property='og:title']", attribute = "content" }},
]
date = [{{ kind = "text", selector = ".date", segment = 0 }}]
excerpt = [{{ kind = "text", selector = ".about" }}]
"#,
        base_url
    ))
    .expect("test config should parse")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_http_harvest_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Listing with a duplicate link and one outside the listing container
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(html(
            r#"<html><body>
            <section class="listing">
                <article><a class="more" href="/events/1">More</a></article>
                <article><a class="more" href="/events/2">More</a></article>
                <article><a class="more" href="/events/1">More</a></article>
                <article><a class="more" href="/events/3">More</a></article>
            </section>
            <footer><a class="more" href="/about">About</a></footer>
            </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/1"))
        .respond_with(html(
            r#"<html><body>
            <h1 class="event-title">The Quiet Ones</h1>
            <p class="date">Jun 2, Tuesday</p>
            <div class="about">An evening of classical chamber works</div>
            </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    // Title only available through the meta fallback, date unreadable
    Mock::given(method("GET"))
        .and(path("/events/2"))
        .respond_with(html(
            r#"<html><head><meta property="og:title" content="Secret Show"></head><body>
            <p class="date">TBA</p>
            </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    // Always failing; retried the full attempt count
    Mock::given(method("GET"))
        .and(path("/events/3"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let browser = HttpBrowser::new(&config.driver).unwrap();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.report.aborted.is_none());
    assert_eq!(outcome.report.links_collected, 3);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(
        outcome.report.failed_links,
        vec![format!("{}/events/3", base_url)]
    );

    let first = &outcome.records[0];
    assert_eq!(first.title.as_deref(), Some("The Quiet Ones"));
    assert!(first.date.contains("-06-02T00:00:00.000+00:00"));
    assert_eq!(first.genre, Genre::Classical);
    assert!(first
        .excerpt
        .starts_with("<p>An evening of classical chamber works</p>"));
    assert!(first
        .excerpt
        .contains(&format!("href='{}/events/1'", base_url)));

    let second = &outcome.records[1];
    assert_eq!(second.title.as_deref(), Some("Secret Show"));
    assert!(second.date.ends_with("T00:00:00.000+00:00"));
    assert_eq!(second.genre, Genre::Unknown);
}

#[tokio::test]
async fn test_listing_error_status_aborts_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let browser = HttpBrowser::new(&config.driver).unwrap();

    let outcome = Harvester::new(&config).run(&browser).await;

    assert!(outcome.records.is_empty());
    assert!(outcome
        .report
        .aborted
        .as_deref()
        .unwrap_or_default()
        .contains("503"));
}

#[tokio::test]
async fn test_session_reports_status_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let browser = HttpBrowser::new(&config.driver).unwrap();
    let session = browser.open_session().await.unwrap();

    let result = session
        .navigate(
            &format!("{}/missing", mock_server.uri()),
            config.listing.wait_until,
        )
        .await;

    assert!(matches!(
        result,
        Err(DriverError::Status { status: 404, .. })
    ));
    assert!(session.close().await.is_ok());
}
