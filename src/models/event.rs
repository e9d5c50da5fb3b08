use chrono::{DateTime, Utc};
use serde::Serialize;

pub const NO_DESCRIPTION: &str = "No description available";

/// Raw HTML as fetched, together with the URL it came from.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Event metadata scraped from a single page.
///
/// `end_time` is expected to be after `start_time`, but an overnight range on
/// the page (e.g. `10:00pm–1:00am`) is kept exactly as parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl EventRecord {
    pub fn has_description(&self) -> bool {
        self.description != NO_DESCRIPTION
    }

    pub fn ends_after_start(&self) -> bool {
        self.end_time > self.start_time
    }
}
