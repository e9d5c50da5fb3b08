use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::clients::page_client::PageFetcher;
use crate::models::error::PipelineError;
use crate::models::event::EventRecord;
use crate::service::page_extractor::PageExtractor;

pub const DEFAULT_EVENT_HOST: &str = "partiful.com";

/// Fetches an event page, extracts it, and checks the result is usable.
/// Knows nothing about Discord.
pub struct EventPipeline {
    fetcher: Arc<dyn PageFetcher>,
    extractor: PageExtractor,
    expected_host: String,
}

impl EventPipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: PageExtractor,
        expected_host: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            expected_host: expected_host.into(),
        }
    }

    pub fn is_supported_link(&self, link: &str) -> bool {
        link.contains(&self.expected_host)
    }

    pub async fn create_event_from_link(&self, link: &str) -> Result<EventRecord, PipelineError> {
        self.create_event_from_link_at(link, Utc::now()).await
    }

    #[instrument(skip(self, now))]
    pub async fn create_event_from_link_at(
        &self,
        link: &str,
        now: DateTime<Utc>,
    ) -> Result<EventRecord, PipelineError> {
        if !self.is_supported_link(link) {
            return Err(PipelineError::InvalidLink(link.to_string()));
        }

        let page = self.fetcher.fetch_page(link).await?;
        let record = self.extractor.extract(&page.html)?;

        if record.start_time <= now {
            return Err(PipelineError::PastEvent {
                start_time: record.start_time,
            });
        }
        if !record.ends_after_start() {
            warn!(
                "End time {} is not after start time {}; leaving as scraped",
                record.end_time, record.start_time
            );
        }

        info!(
            "Scraped event {:?} at {}",
            record.title,
            record.start_time.to_rfc3339()
        );
        Ok(record)
    }
}
