use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Month/day layouts accepted for the date segment (year appended before parsing)
const DATE_FORMATS: &[&str] = &["%b %d %Y", "%B %d %Y", "%d %b %Y", "%d %B %Y", "%m/%d %Y"];

/// Only this many leading comma-delimited segments are considered
const DATE_SEGMENTS: usize = 2;

/// "5th" -> "5"
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("valid ordinal regex"));

/// Weekday name in front of the month-day ("Fri Jan 5", "Friday Jan 5")
static LEADING_WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)(?:day|nesday|rsday|urday)?\.?\s+")
        .expect("valid weekday regex")
});

/// Why a date text could not be canonicalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("date text is empty")]
    Empty,

    #[error("unrecognized date text: {0}")]
    Unparsable(String),
}

/// Formats a calendar date as midnight UTC in the canonical layout
pub fn midnight_utc(date: NaiveDate) -> String {
    format!("{}T00:00:00.000+00:00", date.format("%Y-%m-%d"))
}

/// Canonicalizes "<month-day>, <weekday>[, ...]" text, assuming the current UTC year
///
/// # Examples
///
/// ```
/// use chrono::{Datelike, Utc};
/// use event_harvest::normalize::canonicalize_date;
///
/// let year = Utc::now().year();
/// assert_eq!(
///     canonicalize_date("Jan 5, Friday").unwrap(),
///     format!("{}-01-05T00:00:00.000+00:00", year)
/// );
/// ```
pub fn canonicalize_date(text: &str) -> Result<String, DateError> {
    canonicalize_date_in_year(text, Utc::now().year())
}

/// Canonicalizes date text against an explicit year
///
/// The source omits the year, so `year` is always applied. Trailing
/// segments such as a start time are ignored. A leading weekday segment
/// ("Friday, Jan 5") is tolerated because the first parsable segment of the
/// first two wins.
pub fn canonicalize_date_in_year(text: &str, year: i32) -> Result<String, DateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    trimmed
        .split(',')
        .take(DATE_SEGMENTS)
        .find_map(|segment| parse_month_day(segment, year))
        .map(midnight_utc)
        .ok_or_else(|| DateError::Unparsable(trimmed.to_string()))
}

fn parse_month_day(segment: &str, year: i32) -> Option<NaiveDate> {
    let cleaned = super::clean_text(segment).trim_end_matches('.').to_string();
    if cleaned.is_empty() {
        return None;
    }

    // "Jan. 5" reads the same as "Jan 5"
    let cleaned = cleaned.replacen(". ", " ", 1);
    let cleaned = LEADING_WEEKDAY_RE.replace(&cleaned, "");
    let cleaned = ORDINAL_RE.replace_all(&cleaned, "$1");
    let with_year = format!("{} {}", cleaned, year);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&with_year, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_day_weekday() {
        assert_eq!(
            canonicalize_date_in_year("Jan 5, Friday", 2024).unwrap(),
            "2024-01-05T00:00:00.000+00:00"
        );
    }

    #[test]
    fn test_current_year_is_assumed() {
        let year = Utc::now().year();
        assert_eq!(
            canonicalize_date("Jan 5, Friday").unwrap(),
            format!("{}-01-05T00:00:00.000+00:00", year)
        );
    }

    #[test]
    fn test_trailing_segments_ignored() {
        assert_eq!(
            canonicalize_date_in_year("March 14, Saturday, 8:00 PM", 2026).unwrap(),
            "2026-03-14T00:00:00.000+00:00"
        );
    }

    #[test]
    fn test_full_month_and_abbreviation_dot() {
        assert_eq!(
            canonicalize_date_in_year("December 31", 2025).unwrap(),
            "2025-12-31T00:00:00.000+00:00"
        );
        assert_eq!(
            canonicalize_date_in_year("Sep. 9, Tuesday", 2025).unwrap(),
            "2025-09-09T00:00:00.000+00:00"
        );
    }

    #[test]
    fn test_weekday_first() {
        assert_eq!(
            canonicalize_date_in_year("Friday, Jan 5", 2024).unwrap(),
            "2024-01-05T00:00:00.000+00:00"
        );
    }

    #[test]
    fn test_ordinal_days() {
        assert_eq!(
            canonicalize_date_in_year("January 5th, Friday", 2024).unwrap(),
            "2024-01-05T00:00:00.000+00:00"
        );
        assert_eq!(
            canonicalize_date_in_year("Mar 1st, Friday, 9 PM", 2024).unwrap(),
            "2024-03-01T00:00:00.000+00:00"
        );
        assert_eq!(
            canonicalize_date_in_year("22nd March", 2026).unwrap(),
            "2026-03-22T00:00:00.000+00:00"
        );
        assert_eq!(
            canonicalize_date_in_year("Aug 23RD", 2026).unwrap(),
            "2026-08-23T00:00:00.000+00:00"
        );
    }

    #[test]
    fn test_weekday_before_month_day() {
        assert_eq!(
            canonicalize_date_in_year("Fri Jan 5", 2024).unwrap(),
            "2024-01-05T00:00:00.000+00:00"
        );
        assert_eq!(
            canonicalize_date_in_year("Saturday March 14th, 8:00 PM", 2026).unwrap(),
            "2026-03-14T00:00:00.000+00:00"
        );
        assert_eq!(
            canonicalize_date_in_year("Wed. Dec 31", 2025).unwrap(),
            "2025-12-31T00:00:00.000+00:00"
        );
    }

    #[test]
    fn test_empty_input_is_signalled() {
        assert_eq!(canonicalize_date_in_year("", 2024), Err(DateError::Empty));
        assert_eq!(canonicalize_date_in_year("   ", 2024), Err(DateError::Empty));
    }

    #[test]
    fn test_unparsable_input_is_signalled() {
        assert!(matches!(
            canonicalize_date_in_year("sometime soon", 2024),
            Err(DateError::Unparsable(_))
        ));
        // Feb 29 does not exist in 2025
        assert!(canonicalize_date_in_year("Feb 29, Saturday", 2025).is_err());
        assert!(canonicalize_date_in_year("Feb 29, Thursday", 2024).is_ok());
    }

    #[test]
    fn test_midnight_utc_layout() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(midnight_utc(date), "2026-10-16T00:00:00.000+00:00");
    }
}
