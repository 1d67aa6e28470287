use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Event-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub listing: ListingConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing page configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    /// Root page enumerating events
    pub url: String,

    /// Selector matching the link-bearing elements of the listing
    #[serde(rename = "link-selector")]
    pub link_selector: String,

    /// Selector that must exist before collection starts (defaults to the link selector)
    #[serde(rename = "ready-selector", default)]
    pub ready_selector: Option<String>,

    /// Page readiness condition passed to the driver on every navigation
    #[serde(rename = "wait-until", default)]
    pub wait_until: WaitCondition,
}

impl ListingConfig {
    /// Selector the orchestrator waits for after loading the listing
    pub fn ready_selector(&self) -> &str {
        self.ready_selector.as_deref().unwrap_or(&self.link_selector)
    }
}

/// Readiness condition a navigation waits for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitCondition {
    Load,
    #[default]
    DomContentLoaded,
    NetworkIdle,
}

/// Fixed delays and retry bounds
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Pause after each scroll so lazy content can render (milliseconds)
    #[serde(rename = "settle-ms", default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Navigation attempts per detail page
    #[serde(rename = "retry-attempts", default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between navigation attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Upper bound for the initial wait-for-selector on the listing (milliseconds)
    #[serde(rename = "wait-timeout-ms", default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Optional cap on scroll iterations; unbounded when unset
    #[serde(rename = "max-scrolls", default)]
    pub max_scrolls: Option<u32>,

    /// Log a progress line every N detail pages
    #[serde(rename = "progress-every", default = "default_progress_every")]
    pub progress_every: usize,
}

impl TimingConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            max_scrolls: None,
            progress_every: default_progress_every(),
        }
    }
}

fn default_settle_ms() -> u64 {
    1500
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_wait_timeout_ms() -> u64 {
    30_000
}

fn default_progress_every() -> usize {
    10
}

/// Options for the bundled HTTP driver
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!("EventHarvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// One way of reading a field off the current page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Strategy {
    /// Text content of the first match, optionally one comma-delimited segment of it
    Text {
        selector: String,
        #[serde(default)]
        segment: Option<usize>,
    },

    /// Attribute value of the first match
    Attribute { selector: String, attribute: String },

    /// Resolved target of the nearest anchor enclosing the first match
    Link { selector: String },
}

impl Strategy {
    pub fn selector(&self) -> &str {
        match self {
            Self::Text { selector, .. } | Self::Attribute { selector, .. } | Self::Link { selector } => {
                selector
            }
        }
    }
}

/// Field extracted from a detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Date,
    Time,
    Location,
    Price,
    Image,
    Excerpt,
    BuyLink,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Title,
        Field::Date,
        Field::Time,
        Field::Location,
        Field::Price,
        Field::Image,
        Field::Excerpt,
        Field::BuyLink,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Date => "date",
            Self::Time => "time",
            Self::Location => "location",
            Self::Price => "price",
            Self::Image => "image",
            Self::Excerpt => "excerpt",
            Self::BuyLink => "buy-link",
        }
    }
}

/// Ordered fallback chains, one per field
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectorConfig {
    #[serde(default)]
    pub title: Vec<Strategy>,
    #[serde(default)]
    pub date: Vec<Strategy>,
    #[serde(default)]
    pub time: Vec<Strategy>,
    #[serde(default)]
    pub location: Vec<Strategy>,
    #[serde(default)]
    pub price: Vec<Strategy>,
    #[serde(default)]
    pub image: Vec<Strategy>,
    #[serde(default)]
    pub excerpt: Vec<Strategy>,
    #[serde(rename = "buy-link", default)]
    pub buy_link: Vec<Strategy>,
}

impl SelectorConfig {
    /// Returns the fallback chain for a field
    pub fn chain(&self, field: Field) -> &[Strategy] {
        match field {
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Location => &self.location,
            Field::Price => &self.price,
            Field::Image => &self.image,
            Field::Excerpt => &self.excerpt,
            Field::BuyLink => &self.buy_link,
        }
    }
}

/// Sink connection parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SinkConfig {
    /// Location of the store (the SQLite file for the bundled sink)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Target namespace
    #[serde(default)]
    pub database: Option<String>,

    /// Target collection name
    #[serde(default)]
    pub collection: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the whole-run JSON dump
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,
}
