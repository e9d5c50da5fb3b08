use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::async_trait;
use serenity::builder::CreateScheduledEvent;
use serenity::http::Http;
use serenity::model::Timestamp;
use serenity::model::guild::ScheduledEventType;
use serenity::model::id::GuildId;

use crate::models::error::PlatformError;
use crate::service::scheduled_event::ScheduledEventRequest;

#[async_trait]
pub trait ScheduledEventCreator: Send + Sync {
    /// Creates the event in `guild_id` and returns the new event's id.
    async fn create_event(
        &self,
        guild_id: u64,
        request: &ScheduledEventRequest,
    ) -> Result<u64, PlatformError>;
}

pub struct SerenityEventCreator {
    http: Arc<Http>,
}

impl SerenityEventCreator {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn to_timestamp(time: &DateTime<Utc>) -> Result<Timestamp, PlatformError> {
    Timestamp::from_unix_timestamp(time.timestamp())
        .map_err(|e| PlatformError::InvalidPayload(format!("bad timestamp {}: {}", time, e)))
}

#[async_trait]
impl ScheduledEventCreator for SerenityEventCreator {
    async fn create_event(
        &self,
        guild_id: u64,
        request: &ScheduledEventRequest,
    ) -> Result<u64, PlatformError> {
        let builder = CreateScheduledEvent::new(
            ScheduledEventType::External,
            request.name.as_str(),
            to_timestamp(&request.start_time)?,
        )
        .end_time(to_timestamp(&request.end_time)?)
        .description(request.description.as_str())
        .location(request.location.as_str());

        let event = GuildId::new(guild_id)
            .create_scheduled_event(&self.http, builder)
            .await?;
        Ok(event.id.get())
    }
}
