use crate::normalize::Genre;
use serde::{Deserialize, Serialize};

/// One extracted event
///
/// Every field is always present in the serialized shape; optional values
/// serialize as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub title: Option<String>,

    /// `YYYY-MM-DDT00:00:00.000+00:00`
    pub date: String,

    pub genre: Genre,

    /// Raw start time as shown on the page
    pub time: Option<String>,

    pub location: Option<String>,

    /// Raw price text, currency-unaware
    pub price: Option<String>,

    pub image: Option<String>,

    /// Composed HTML fragment, possibly empty
    pub excerpt: String,

    /// Never set by this collector
    pub is_featured: bool,
}
