use std::error::Error;
use std::sync::Arc;

use serenity::http::Http;
use serenity::model::gateway::GatewayIntents;
use serenity::model::id::{ApplicationId, GuildId};
use tracing::{error, info};

use crate::clients::page_client::HttpPageFetcher;
use crate::config::{AppConfig, BotSettings, ScrapeSettings};
use crate::handlers::commands;
use crate::handlers::discord::BotHandler;
use crate::models::error::FetchError;
use crate::service::event_pipeline::EventPipeline;
use crate::service::page_extractor::PageExtractor;

pub fn build_pipeline(settings: &ScrapeSettings) -> Result<EventPipeline, FetchError> {
    let fetcher = HttpPageFetcher::new(settings.fetch_timeout)?;
    Ok(EventPipeline::new(
        Arc::new(fetcher),
        PageExtractor::new(settings.timezone),
        settings.event_host.clone(),
    ))
}

/// Connects to the gateway and serves `/createevent` until Ctrl-C.
pub async fn run_api(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let settings = BotSettings::from_config(config)?;
    let pipeline = Arc::new(build_pipeline(&settings.scrape)?);

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_SCHEDULED_EVENTS;
    let mut client = serenity::Client::builder(&settings.discord_token, intents)
        .event_handler(BotHandler::new(pipeline, settings.guild_id))
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
        return Err(why.into());
    }
    Ok(())
}

/// One-off sync of the guild's slash commands, without opening a gateway.
pub async fn register_commands(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let settings = BotSettings::from_config(config)?;
    let application_id = BotSettings::application_id(config)?;

    let http = Http::new(&settings.discord_token);
    http.set_application_id(ApplicationId::new(application_id));
    commands::sync_guild_commands(&http, GuildId::new(settings.guild_id)).await?;
    Ok(())
}
