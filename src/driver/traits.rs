//! Driver traits and error types
//!
//! This module defines the narrow capability interface the harvester
//! consumes from a page-rendering backend.

use crate::config::WaitCondition;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Script that scrolls the document to its bottom
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("No page loaded")]
    NoPage,

    #[error("Timed out after {waited:?} waiting for '{selector}'")]
    WaitTimeout { selector: String, waited: Duration },

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Snapshot of a matched element
///
/// Handles are owned copies taken at query time, so they stay valid across
/// later navigations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    text: String,
    attributes: HashMap<String, String>,
    link_target: Option<String>,
}

impl Element {
    pub fn new(
        text: impl Into<String>,
        attributes: HashMap<String, String>,
        link_target: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            attributes,
            link_target,
        }
    }

    /// Whitespace-collapsed text content
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Absolute target of the element itself if it is an anchor, else of its nearest enclosing anchor
    pub fn link_target(&self) -> Option<&str> {
        self.link_target.as_deref()
    }
}

/// One page session: a single tab navigated sequentially
///
/// Methods take `&self` so a navigation can be re-issued from a retry
/// closure; implementations keep their mutable state behind a lock.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Loads `url` and waits for `wait`
    async fn navigate(&self, url: &str, wait: WaitCondition) -> DriverResult<()>;

    /// All elements currently matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Element>>;

    /// First element matching `selector`, if any
    async fn query_one(&self, selector: &str) -> DriverResult<Option<Element>>;

    /// Runs a script in the page for its side effects
    async fn evaluate_script(&self, script: &str) -> DriverResult<()>;

    /// Waits until `selector` matches at least one element
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> DriverResult<()>;

    /// Releases the session
    async fn close(&self) -> DriverResult<()>;
}

/// Something that can open page sessions
#[async_trait]
pub trait Browser: Send + Sync {
    async fn open_session(&self) -> DriverResult<Box<dyn PageDriver>>;
}
