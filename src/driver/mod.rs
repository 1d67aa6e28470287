//! Page driver capability
//!
//! The harvester never renders pages itself. It consumes a [`Browser`] that
//! opens [`PageDriver`] sessions able to navigate, query the DOM, run a
//! scroll script and wait for selectors.
//!
//! Two implementations ship with the crate:
//! - [`HttpBrowser`]: plain HTTP fetch plus static HTML queries
//! - [`FixtureBrowser`]: canned in-memory pages with scripted scrolling

mod dom;
mod fixture;
mod http;
mod traits;

pub use dom::{matches_any, parse_selector, select_all};
pub use fixture::{FixtureBrowser, FixtureSession, FixtureSite};
pub use http::{build_http_client, HttpBrowser, HttpSession};
pub use traits::{
    Browser, DriverError, DriverResult, Element, PageDriver, SCROLL_TO_BOTTOM_SCRIPT,
};
