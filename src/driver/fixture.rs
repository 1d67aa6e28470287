//! In-memory driver over canned pages
//!
//! Pages are registered as a list of stages. Navigation shows stage 0 and
//! every scroll-to-bottom reveals the next stage, which is how lazily loaded
//! listings behave. Navigation failures and query failures can be injected
//! per page, and every session records what it was asked to do.

use crate::config::WaitCondition;
use crate::driver::dom::{matches_any, select_all};
use crate::driver::traits::{
    Browser, DriverError, DriverResult, Element, PageDriver, SCROLL_TO_BOTTOM_SCRIPT,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

/// Canned site served by [`FixtureBrowser`]
#[derive(Debug, Clone, Default)]
pub struct FixtureSite {
    pages: HashMap<String, Vec<String>>,
    flaky: HashMap<String, u32>,
    query_failures: HashSet<(String, usize)>,
}

impl FixtureSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page that never changes
    pub fn page(self, url: &str, html: impl Into<String>) -> Self {
        self.scrolling_page(url, vec![html.into()])
    }

    /// Registers a page whose content grows with each scroll
    ///
    /// Scrolling past the last stage keeps showing the last stage.
    pub fn scrolling_page(mut self, url: &str, stages: Vec<String>) -> Self {
        self.pages.insert(url.to_string(), stages);
        self
    }

    /// Makes the first `failures` navigations to `url` fail
    pub fn flaky(mut self, url: &str, failures: u32) -> Self {
        self.flaky.insert(url.to_string(), failures);
        self
    }

    /// Makes every query fail while `url` shows `stage`
    pub fn query_failure_at(mut self, url: &str, stage: usize) -> Self {
        self.query_failures.insert((url.to_string(), stage));
        self
    }
}

/// What the sessions of a [`FixtureBrowser`] were asked to do
#[derive(Debug, Default)]
struct Journal {
    navigations: HashMap<String, u32>,
    remaining_failures: HashMap<String, u32>,
    scrolls: u32,
    sessions_opened: u32,
    sessions_closed: u32,
}

/// Browser serving a [`FixtureSite`]
#[derive(Debug, Clone)]
pub struct FixtureBrowser {
    site: Arc<FixtureSite>,
    journal: Arc<Mutex<Journal>>,
    refuse_sessions: bool,
}

impl FixtureBrowser {
    pub fn new(site: FixtureSite) -> Self {
        let journal = Journal {
            remaining_failures: site.flaky.clone(),
            ..Journal::default()
        };

        Self {
            site: Arc::new(site),
            journal: Arc::new(Mutex::new(journal)),
            refuse_sessions: false,
        }
    }

    /// Makes every `open_session` call fail
    pub fn refusing_sessions(mut self) -> Self {
        self.refuse_sessions = true;
        self
    }

    /// Number of navigations attempted to `url`
    pub fn navigations(&self, url: &str) -> u32 {
        lock(&self.journal).navigations.get(url).copied().unwrap_or(0)
    }

    pub fn total_navigations(&self) -> u32 {
        lock(&self.journal).navigations.values().sum()
    }

    pub fn scrolls(&self) -> u32 {
        lock(&self.journal).scrolls
    }

    pub fn sessions_opened(&self) -> u32 {
        lock(&self.journal).sessions_opened
    }

    pub fn sessions_closed(&self) -> u32 {
        lock(&self.journal).sessions_closed
    }
}

#[async_trait]
impl Browser for FixtureBrowser {
    async fn open_session(&self) -> DriverResult<Box<dyn PageDriver>> {
        if self.refuse_sessions {
            return Err(DriverError::Session("fixture browser refused session".to_string()));
        }

        lock(&self.journal).sessions_opened += 1;

        Ok(Box::new(FixtureSession {
            site: Arc::clone(&self.site),
            journal: Arc::clone(&self.journal),
            view: Mutex::new(None),
        }))
    }
}

#[derive(Debug, Clone)]
struct View {
    url: String,
    stage: usize,
}

/// Session over a [`FixtureSite`]
#[derive(Debug)]
pub struct FixtureSession {
    site: Arc<FixtureSite>,
    journal: Arc<Mutex<Journal>>,
    view: Mutex<Option<View>>,
}

impl FixtureSession {
    fn current(&self) -> DriverResult<(View, &str)> {
        let view = lock(&self.view).clone().ok_or(DriverError::NoPage)?;

        if self.site.query_failures.contains(&(view.url.clone(), view.stage)) {
            return Err(DriverError::Session(format!(
                "injected query failure on {} stage {}",
                view.url, view.stage
            )));
        }

        let html = self
            .site
            .pages
            .get(&view.url)
            .and_then(|stages| stages.get(view.stage))
            .ok_or(DriverError::NoPage)?;

        Ok((view, html.as_str()))
    }

    fn base_url(url: &str) -> DriverResult<Url> {
        Url::parse(url).map_err(|e| DriverError::Session(format!("bad fixture url {}: {}", url, e)))
    }
}

#[async_trait]
impl PageDriver for FixtureSession {
    async fn navigate(&self, url: &str, _wait: WaitCondition) -> DriverResult<()> {
        {
            let mut journal = lock(&self.journal);
            *journal.navigations.entry(url.to_string()).or_insert(0) += 1;

            if let Some(remaining) = journal.remaining_failures.get_mut(url) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(DriverError::Navigation {
                        url: url.to_string(),
                        message: "injected navigation failure".to_string(),
                    });
                }
            }
        }

        if !self.site.pages.contains_key(url) {
            return Err(DriverError::Status {
                url: url.to_string(),
                status: 404,
            });
        }

        *lock(&self.view) = Some(View {
            url: url.to_string(),
            stage: 0,
        });
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Element>> {
        let (view, html) = self.current()?;
        select_all(html, &Self::base_url(&view.url)?, selector)
    }

    async fn query_one(&self, selector: &str) -> DriverResult<Option<Element>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn evaluate_script(&self, script: &str) -> DriverResult<()> {
        if script != SCROLL_TO_BOTTOM_SCRIPT {
            return Err(DriverError::Script(format!("unsupported script: {}", script)));
        }

        let mut view = lock(&self.view);
        let view = view.as_mut().ok_or(DriverError::NoPage)?;
        let last_stage = self
            .site
            .pages
            .get(&view.url)
            .map(|stages| stages.len().saturating_sub(1))
            .unwrap_or(0);
        view.stage = (view.stage + 1).min(last_stage);

        lock(&self.journal).scrolls += 1;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> DriverResult<()> {
        let (_, html) = self.current()?;
        if matches_any(html, selector)? {
            Ok(())
        } else {
            Err(DriverError::WaitTimeout {
                selector: selector.to_string(),
                waited: timeout,
            })
        }
    }

    async fn close(&self) -> DriverResult<()> {
        *lock(&self.view) = None;
        lock(&self.journal).sessions_closed += 1;
        Ok(())
    }
}

/// Locks a fixture mutex, recovering the data if a panicking test poisoned it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
