//! Fallback chains
//!
//! A field is read by trying its configured strategies in order; the first
//! one that yields a non-empty value wins. Every miss is logged and
//! swallowed here, so a field can only end up absent, never fail the record.

use crate::config::{Field, Strategy};
use crate::driver::{DriverError, PageDriver};
use crate::normalize::clean_text;
use thiserror::Error;

/// Why a single strategy produced no value
#[derive(Debug, Error)]
pub enum FieldMiss {
    #[error("no element matches '{0}'")]
    NotFound(String),

    #[error("element for '{0}' is empty")]
    Empty(String),

    #[error("element for '{selector}' has no '{attribute}' attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("element for '{0}' is not inside a link")]
    NoLink(String),

    #[error("text of '{selector}' has no segment {segment}")]
    NoSegment { selector: String, segment: usize },

    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Applies one strategy to the current page
pub async fn apply(strategy: &Strategy, driver: &dyn PageDriver) -> Result<String, FieldMiss> {
    let selector = strategy.selector();
    let element = driver
        .query_one(selector)
        .await?
        .ok_or_else(|| FieldMiss::NotFound(selector.to_string()))?;

    let value = match strategy {
        Strategy::Text { segment: None, .. } => element.text().to_string(),
        Strategy::Text {
            segment: Some(segment),
            ..
        } => element
            .text()
            .split(',')
            .nth(*segment)
            .map(clean_text)
            .ok_or_else(|| FieldMiss::NoSegment {
                selector: selector.to_string(),
                segment: *segment,
            })?,
        Strategy::Attribute { attribute, .. } => element
            .attr(attribute)
            .map(clean_text)
            .ok_or_else(|| FieldMiss::MissingAttribute {
                selector: selector.to_string(),
                attribute: attribute.clone(),
            })?,
        Strategy::Link { .. } => element
            .link_target()
            .map(str::to_string)
            .ok_or_else(|| FieldMiss::NoLink(selector.to_string()))?,
    };

    if value.is_empty() {
        return Err(FieldMiss::Empty(selector.to_string()));
    }

    Ok(value)
}

/// Reads `field` with its fallback chain, returning `None` when every strategy misses
pub async fn first_success(
    field: Field,
    chain: &[Strategy],
    driver: &dyn PageDriver,
) -> Option<String> {
    for (index, strategy) in chain.iter().enumerate() {
        match apply(strategy, driver).await {
            Ok(value) => {
                if index > 0 {
                    tracing::debug!("{} resolved by fallback #{}", field.name(), index + 1);
                }
                return Some(value);
            }
            Err(miss) => {
                tracing::debug!(
                    "{} strategy {}/{} missed: {}",
                    field.name(),
                    index + 1,
                    chain.len(),
                    miss
                );
            }
        }
    }

    None
}
