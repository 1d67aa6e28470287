//! Harvest orchestration
//!
//! Sequence for one run:
//! 1. Open a driver session
//! 2. Load the listing and wait for a link-bearing element
//! 3. Collect detail links
//! 4. Extract each link in collection order, strictly one at a time
//! 5. Close the session, whatever happened before
//!
//! Failures before step 5 are logged and recorded in the run report; they
//! never escape [`Harvester::run`]. Hand-off to a sink is a separate step,
//! see [`deliver`].

use crate::config::Config;
use crate::driver::{Browser, DriverError, PageDriver};
use crate::harvest::collector::{collect_links_with, CollectOptions};
use crate::harvest::extractor::DetailExtractor;
use crate::harvest::retry::RetryPolicy;
use crate::model::EventRecord;
use crate::output::RunReport;
use crate::sink::{EventSink, SinkResult};

/// Records of one run plus what happened along the way
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    /// Extracted records in link collection order
    pub records: Vec<EventRecord>,
    pub report: RunReport,
}

/// Result of handing records to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing was extracted; the sink was never contacted
    NoData,
    /// Number of records the sink accepted
    Inserted(usize),
}

/// Runs the harvest for one configuration
pub struct Harvester<'a> {
    config: &'a Config,
}

impl<'a> Harvester<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Runs the whole harvest; always completes and always releases the session
    pub async fn run(&self, browser: &dyn Browser) -> HarvestOutcome {
        let mut report = RunReport::start(&self.config.listing.url);
        let mut records = Vec::new();

        match browser.open_session().await {
            Ok(session) => {
                if let Err(e) = self
                    .harvest(session.as_ref(), &mut records, &mut report)
                    .await
                {
                    tracing::error!("Harvest of {} aborted: {}", self.config.listing.url, e);
                    report.aborted = Some(e.to_string());
                }

                if let Err(e) = session.close().await {
                    tracing::warn!("Failed to close driver session: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Could not open a driver session: {}", e);
                report.aborted = Some(e.to_string());
            }
        }

        report.finish(records.len());
        tracing::info!(
            "Harvest finished: {} records from {} links ({} failed)",
            records.len(),
            report.links_collected,
            report.failed_links.len()
        );

        HarvestOutcome { records, report }
    }

    async fn harvest(
        &self,
        driver: &dyn PageDriver,
        records: &mut Vec<EventRecord>,
        report: &mut RunReport,
    ) -> Result<(), DriverError> {
        let listing = &self.config.listing;
        let timing = &self.config.timing;
        let wait = listing.wait_until;

        tracing::info!("Loading listing {}", listing.url);
        RetryPolicy::from_timing(timing)
            .run(move || driver.navigate(&listing.url, wait))
            .await?;

        driver
            .wait_for_selector(listing.ready_selector(), timing.wait_timeout())
            .await?;

        let links = collect_links_with(
            driver,
            &listing.link_selector,
            CollectOptions {
                settle: timing.settle(),
                max_scrolls: timing.max_scrolls,
            },
        )
        .await;
        report.links_collected = links.len();

        let extractor = DetailExtractor::from_config(self.config);
        let total = links.len();

        for (index, link) in links.iter().enumerate() {
            match extractor.extract(driver, link).await {
                Some(record) => records.push(record),
                None => report.failed_links.push(link.to_string()),
            }

            let done = index + 1;
            if done % timing.progress_every == 0 || done == total {
                tracing::info!(
                    "Progress: {}/{} links, {} records",
                    done,
                    total,
                    records.len()
                );
            }
        }

        Ok(())
    }
}

/// Hands records to a sink in one bulk insert
///
/// With no records the sink is never connected and [`Delivery::NoData`] is
/// returned. Connection errors (including missing parameters) surface
/// before any insert is attempted.
pub fn deliver<S, F>(records: &[EventRecord], connect: F) -> SinkResult<Delivery>
where
    S: EventSink,
    F: FnOnce() -> SinkResult<S>,
{
    if records.is_empty() {
        tracing::info!("No data extracted, skipping sink");
        return Ok(Delivery::NoData);
    }

    let mut sink = connect()?;
    let inserted = sink.insert_many(records)?;
    tracing::info!("Sink accepted {} records", inserted);
    Ok(Delivery::Inserted(inserted))
}
