//! Detail page extraction
//!
//! One record per link. Navigation is retried; fields are not. Each field is
//! read independently through its fallback chain, and a field that misses
//! everywhere is simply absent. Only a navigation that never succeeds makes
//! the whole link yield no record.

use crate::config::{Config, Field, SelectorConfig, WaitCondition};
use crate::driver::PageDriver;
use crate::harvest::retry::RetryPolicy;
use crate::harvest::strategy::first_success;
use crate::model::EventRecord;
use crate::normalize::{canonicalize_date, classify_genre, compose_excerpt, midnight_utc};
use chrono::{NaiveDate, Utc};

/// Raw field values as read off a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub excerpt: Option<String>,
    pub buy_link: Option<String>,
}

impl RawFields {
    /// Names of the fields no strategy could read
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (Field::Title, &self.title),
            (Field::Date, &self.date),
            (Field::Time, &self.time),
            (Field::Location, &self.location),
            (Field::Price, &self.price),
            (Field::Image, &self.image),
            (Field::Excerpt, &self.excerpt),
            (Field::BuyLink, &self.buy_link),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| field.name())
        .collect()
    }
}

/// Extracts event records from detail pages
#[derive(Debug, Clone)]
pub struct DetailExtractor<'a> {
    selectors: &'a SelectorConfig,
    navigation: RetryPolicy,
    wait: WaitCondition,
}

impl<'a> DetailExtractor<'a> {
    pub fn new(selectors: &'a SelectorConfig, navigation: RetryPolicy, wait: WaitCondition) -> Self {
        Self {
            selectors,
            navigation,
            wait,
        }
    }

    pub fn from_config(config: &'a Config) -> Self {
        Self::new(
            &config.selectors,
            RetryPolicy::from_timing(&config.timing),
            config.listing.wait_until,
        )
    }

    /// Navigates to `link` and builds its record
    ///
    /// Returns `None` only when every navigation attempt failed.
    pub async fn extract(&self, driver: &dyn PageDriver, link: &str) -> Option<EventRecord> {
        let wait = self.wait;
        let navigated = self
            .navigation
            .run(move || driver.navigate(link, wait))
            .await;

        if let Err(e) = navigated {
            tracing::warn!(
                "Skipping {} after {} navigation attempts: {}",
                link,
                self.navigation.max_attempts,
                e
            );
            return None;
        }

        let raw = self.read_fields(driver).await;
        let missing = raw.missing();
        if !missing.is_empty() {
            tracing::debug!("{}: no value for {}", link, missing.join(", "));
        }

        Some(assemble(link, raw, Utc::now().date_naive()))
    }

    /// Reads every raw field of the current page
    pub async fn read_fields(&self, driver: &dyn PageDriver) -> RawFields {
        let read = |field: Field| first_success(field, self.selectors.chain(field), driver);

        RawFields {
            title: read(Field::Title).await,
            date: read(Field::Date).await,
            time: read(Field::Time).await,
            location: read(Field::Location).await,
            price: read(Field::Price).await,
            image: read(Field::Image).await,
            excerpt: read(Field::Excerpt).await,
            buy_link: read(Field::BuyLink).await,
        }
    }
}

/// Extracts one record using the selectors and timing of `config`
pub async fn extract_details(
    driver: &dyn PageDriver,
    link: &str,
    config: &Config,
) -> Option<EventRecord> {
    DetailExtractor::from_config(config).extract(driver, link).await
}

/// Derives the canonical record from raw fields
///
/// The page's own URL is the purchase link; a scraped buy link is only
/// compared against it. When the date text is missing or unreadable the
/// record is dated `today` and a warning is logged.
pub fn assemble(link: &str, raw: RawFields, today: NaiveDate) -> EventRecord {
    let buy_now_link = link;

    if let Some(scraped) = raw.buy_link.as_deref() {
        if scraped != buy_now_link {
            tracing::debug!("{}: page links tickets at {}, using page URL", link, scraped);
        }
    }

    let genre = classify_genre(raw.excerpt.as_deref().unwrap_or(""));

    let date = match canonicalize_date(raw.date.as_deref().unwrap_or("")) {
        Ok(date) => date,
        Err(e) => {
            tracing::warn!("{}: {}; dating event {}", link, e, today);
            midnight_utc(today)
        }
    };

    let excerpt = compose_excerpt(raw.excerpt.as_deref(), Some(buy_now_link));

    EventRecord {
        title: raw.title,
        date,
        genre,
        time: raw.time,
        location: raw.location,
        price: raw.price,
        image: raw.image,
        excerpt,
        is_featured: false,
    }
}
