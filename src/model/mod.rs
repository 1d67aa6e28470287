//! Data model for a harvest run
//!
//! - [`EventRecord`]: the canonical output unit, one per detail page
//! - [`LinkSet`]: the distinct detail-page links discovered on the listing

mod event;
mod link_set;

pub use event::EventRecord;
pub use link_set::LinkSet;
