//! Harvest module: the extraction pipeline
//!
//! This module contains the core harvesting logic, including:
//! - Bounded navigation retries
//! - Fallback-chain field reading
//! - Scroll-driven link collection
//! - Per-link detail extraction
//! - Run orchestration and sink hand-off

mod collector;
mod extractor;
mod pipeline;
mod retry;
mod strategy;

pub use collector::{collect_links, collect_links_with, CollectOptions};
pub use extractor::{assemble, extract_details, DetailExtractor, RawFields};
pub use pipeline::{deliver, Delivery, HarvestOutcome, Harvester};
pub use retry::{retry, RetryPolicy};
pub use strategy::{apply, first_success, FieldMiss};
