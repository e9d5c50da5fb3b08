use chrono::{DateTime, Utc};
use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::model::Timestamp;

use crate::models::event::EventRecord;

pub const EVENT_DESCRIPTION_LIMIT: usize = 1000;
pub const EMBED_FIELD_LIMIT: usize = 1024;
const SUCCESS_COLOR: u32 = 0x00ff00;

/// What gets sent to Discord to create a guild-only external event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEventRequest {
    pub name: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
}

impl ScheduledEventRequest {
    pub fn from_record(record: &EventRecord, link: &str) -> Self {
        let description = format!("🎉 Hosted on Partiful: {}\n\n{}", link, record.description);
        Self {
            name: record.title.clone(),
            description: truncate_with_ellipsis(&description, EVENT_DESCRIPTION_LIMIT),
            start_time: record.start_time,
            end_time: record.end_time,
            location: link.to_string(),
        }
    }
}

/// Cuts `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

pub fn event_url(guild_id: u64, event_id: u64) -> String {
    format!("https://discord.com/events/{}/{}", guild_id, event_id)
}

fn discord_timestamp(time: &DateTime<Utc>) -> String {
    format!("<t:{}:F>", time.timestamp())
}

#[derive(Debug, Clone)]
pub struct Invoker {
    pub name: String,
    pub avatar_url: String,
}

pub struct CreatedEvent<'a> {
    pub record: &'a EventRecord,
    pub link: &'a str,
    pub guild_id: u64,
    pub event_id: u64,
    pub invoker: &'a Invoker,
}

pub fn success_embed(created: &CreatedEvent<'_>) -> CreateEmbed {
    let record = created.record;
    CreateEmbed::new()
        .color(SUCCESS_COLOR)
        .title("✅ Event Created Successfully!")
        .field(
            "📅 Event Name",
            truncate_with_ellipsis(&record.title, EMBED_FIELD_LIMIT),
            true,
        )
        .field("🕒 Start Time", discord_timestamp(&record.start_time), true)
        .field("🕘 End Time", discord_timestamp(&record.end_time), true)
        .field(
            "📝 Description",
            truncate_with_ellipsis(&record.description, EMBED_FIELD_LIMIT),
            false,
        )
        .field(
            "🎉 Partiful Link",
            format!("[View Original Event]({})", created.link),
            true,
        )
        .field(
            "🔗 Discord Event",
            format!(
                "[View Discord Event]({})",
                event_url(created.guild_id, created.event_id)
            ),
            true,
        )
        .timestamp(Timestamp::now())
        .footer(
            CreateEmbedFooter::new(format!("Created by {}", created.invoker.name))
                .icon_url(created.invoker.avatar_url.as_str()),
        )
}
