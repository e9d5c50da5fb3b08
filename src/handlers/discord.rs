use std::sync::Arc;

use serenity::all::{CommandDataOptionValue, CommandInteraction, Interaction as DiscordInteraction};
use serenity::async_trait;
use serenity::builder::CreateEmbed;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use tracing::{debug, error, info};

use crate::clients::discord_events::{ScheduledEventCreator, SerenityEventCreator};
use crate::handlers::commands::{self, CREATE_EVENT_COMMAND, LINK_OPTION};
use crate::handlers::discord_responder::{InteractionResponder, SerenityResponder};
use crate::models::error::CommandError;
use crate::service::error_messages::user_message;
use crate::service::event_pipeline::EventPipeline;
use crate::service::scheduled_event::{
    CreatedEvent, Invoker, ScheduledEventRequest, success_embed,
};

pub struct BotHandler {
    pipeline: Arc<EventPipeline>,
    guild_id: u64,
}

impl BotHandler {
    pub fn new(pipeline: Arc<EventPipeline>, guild_id: u64) -> Self {
        BotHandler { pipeline, guild_id }
    }

    /// Runs `/createevent` end to end and answers through `responder`.
    /// Returns the created event id; errors have already been shown to the user.
    pub async fn handle_create_event_with(
        &self,
        responder: &dyn InteractionResponder,
        creator: &dyn ScheduledEventCreator,
        link: Option<&str>,
        guild_id: u64,
        invoker: &Invoker,
    ) -> Result<u64, CommandError> {
        if let Err(err) = responder.defer().await {
            error!("Failed to defer reply: {}", err);
            return Err(err.into());
        }

        match self.create_event(creator, link, guild_id, invoker).await {
            Ok((event_id, embed)) => {
                info!("Event {} created by {} in guild {}", event_id, invoker.name, guild_id);
                responder.edit_embed(embed).await;
                Ok(event_id)
            }
            Err(err) => {
                error!("Error creating event: {}", err);
                responder.edit_text(&user_message(&err)).await;
                Err(err)
            }
        }
    }

    async fn create_event(
        &self,
        creator: &dyn ScheduledEventCreator,
        link: Option<&str>,
        guild_id: u64,
        invoker: &Invoker,
    ) -> Result<(u64, CreateEmbed), CommandError> {
        let link = link
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(CommandError::MissingLink)?;
        info!("Scraping Partiful event: {}", link);

        let record = self.pipeline.create_event_from_link(link).await?;
        let request = ScheduledEventRequest::from_record(&record, link);
        let event_id = creator.create_event(guild_id, &request).await?;

        let embed = success_embed(&CreatedEvent {
            record: &record,
            link,
            guild_id,
            event_id,
            invoker,
        });
        Ok((event_id, embed))
    }

    async fn handle_create_event(&self, ctx: &Context, command: &CommandInteraction) {
        let link = link_option(command);
        let guild_id = command.guild_id.map(|g| g.get()).unwrap_or(self.guild_id);
        let invoker = Invoker {
            name: command.user.name.clone(),
            avatar_url: command.user.face(),
        };
        let responder = SerenityResponder::for_command(ctx, command);
        let creator = SerenityEventCreator::new(ctx.http.clone());
        if let Err(err) = self
            .handle_create_event_with(&responder, &creator, link, guild_id, &invoker)
            .await
        {
            debug!("/{} finished with error: {}", CREATE_EVENT_COMMAND, err);
        }
    }
}

fn link_option(command: &CommandInteraction) -> Option<&str> {
    command
        .data
        .options
        .iter()
        .find(|opt| opt.name == LINK_OPTION)
        .and_then(|opt| match &opt.value {
            CommandDataOptionValue::String(s) => Some(s.as_str()),
            _ => None,
        })
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Ready! Logged in as {}", ready.user.name);
        info!("Bot is active in guild: {}", self.guild_id);

        if let Err(why) = commands::sync_guild_commands(&ctx.http, GuildId::new(self.guild_id)).await {
            error!("Error deploying commands: {}", why);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: DiscordInteraction) {
        let DiscordInteraction::Command(command) = interaction else {
            return;
        };
        match command.data.name.as_str() {
            CREATE_EVENT_COMMAND => self.handle_create_event(&ctx, &command).await,
            other => debug!("Ignoring unknown command /{}", other),
        }
    }
}
