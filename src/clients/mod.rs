pub mod discord_events;
pub mod page_client;
