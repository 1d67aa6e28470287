//! HTTP driver implementation
//!
//! Fetches pages with `reqwest` and answers DOM queries against the fetched
//! HTML. No script runs, so:
//! - scroll requests are accepted and have no effect
//! - a selector is either present in the served document or never will be

use crate::config::{DriverConfig, WaitCondition};
use crate::driver::dom::{matches_any, select_all};
use crate::driver::traits::{Browser, DriverError, DriverResult, Element, PageDriver};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client from the driver configuration
///
/// # Example
///
/// ```no_run
/// use event_harvest::config::DriverConfig;
/// use event_harvest::driver::build_http_client;
///
/// let client = build_http_client(&DriverConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &DriverConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Opens [`HttpSession`]s sharing one connection pool
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    pub fn new(config: &DriverConfig) -> DriverResult<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn open_session(&self) -> DriverResult<Box<dyn PageDriver>> {
        Ok(Box::new(HttpSession::new(self.client.clone())))
    }
}

#[derive(Debug, Clone)]
struct LoadedPage {
    url: Url,
    html: String,
}

#[derive(Debug, Default)]
struct SessionState {
    page: Option<LoadedPage>,
    closed: bool,
}

/// A single sequential browsing session over plain HTTP
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    state: Mutex<SessionState>,
}

impl HttpSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SessionState) -> DriverResult<T>) -> DriverResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| DriverError::Session("session state poisoned".to_string()))?;
        f(&mut state)
    }

    fn current_page(&self) -> DriverResult<LoadedPage> {
        self.with_state(|state| {
            if state.closed {
                return Err(DriverError::Session("session closed".to_string()));
            }
            state.page.clone().ok_or(DriverError::NoPage)
        })
    }
}

#[async_trait]
impl PageDriver for HttpSession {
    async fn navigate(&self, url: &str, wait: WaitCondition) -> DriverResult<()> {
        self.with_state(|state| {
            if state.closed {
                Err(DriverError::Session("session closed".to_string()))
            } else {
                Ok(())
            }
        })?;

        tracing::debug!("GET {} (wait: {:?})", url, wait);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriverError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await?;

        self.with_state(|state| {
            state.page = Some(LoadedPage {
                url: final_url,
                html,
            });
            Ok(())
        })
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Element>> {
        let page = self.current_page()?;
        select_all(&page.html, &page.url, selector)
    }

    async fn query_one(&self, selector: &str) -> DriverResult<Option<Element>> {
        let page = self.current_page()?;
        Ok(select_all(&page.html, &page.url, selector)?.into_iter().next())
    }

    async fn evaluate_script(&self, script: &str) -> DriverResult<()> {
        self.current_page()?;
        tracing::trace!("Static page, ignoring script: {}", script);
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> DriverResult<()> {
        let page = self.current_page()?;
        if matches_any(&page.html, selector)? {
            Ok(())
        } else {
            Err(DriverError::WaitTimeout {
                selector: selector.to_string(),
                waited: timeout,
            })
        }
    }

    async fn close(&self) -> DriverResult<()> {
        self.with_state(|state| {
            state.page = None;
            state.closed = true;
            Ok(())
        })
    }
}
