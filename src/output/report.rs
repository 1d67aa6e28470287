//! Run report

use chrono::{DateTime, Utc};

/// What happened during one harvest run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub listing_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Distinct detail links found on the listing
    pub links_collected: usize,

    /// Records produced
    pub records: usize,

    /// Links whose detail page never loaded
    pub failed_links: Vec<String>,

    /// Run-level failure that cut the harvest short
    pub aborted: Option<String>,
}

impl RunReport {
    /// Starts a report for `listing_url` timestamped now
    pub fn start(listing_url: &str) -> Self {
        Self {
            listing_url: listing_url.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            links_collected: 0,
            records: 0,
            failed_links: Vec::new(),
            aborted: None,
        }
    }

    /// Marks the run finished with `records` extracted
    pub fn finish(&mut self, records: usize) {
        self.records = records;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Percentage of collected links that produced a record
    pub fn success_rate(&self) -> f64 {
        if self.links_collected == 0 {
            0.0
        } else {
            (self.records as f64 / self.links_collected as f64) * 100.0
        }
    }
}

/// Prints the report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &RunReport) {
    println!("=== Harvest Report ===\n");

    println!("Overview:");
    println!("  Listing: {}", report.listing_url);
    println!("  Started: {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {} seconds", duration);
    }
    println!();

    println!("Results:");
    println!("  Links collected: {}", report.links_collected);
    println!("  Records extracted: {}", report.records);
    println!("  Failed links: {}", report.failed_links.len());
    println!();

    if !report.failed_links.is_empty() {
        println!("Failed Links ({}):", report.failed_links.len());
        for link in &report.failed_links {
            println!("  - {}", link);
        }
        println!();
    }

    if let Some(cause) = &report.aborted {
        println!("Run aborted: {}", cause);
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} links extracted)",
        report.success_rate(),
        report.records,
        report.links_collected
    );
}
