//! Field normalizers
//!
//! Pure, total functions turning raw page text into canonical values:
//! - Genre classification from descriptive text
//! - Date canonicalization to a midnight-UTC ISO-8601 timestamp
//! - Excerpt composition (description plus purchase link markup)

mod date;
mod excerpt;
mod genre;

pub use date::{canonicalize_date, canonicalize_date_in_year, midnight_utc, DateError};
pub use excerpt::{compose_excerpt, BUY_TICKETS_LABEL};
pub use genre::{classify_genre, Genre};

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
