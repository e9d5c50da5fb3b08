use serenity::all::{Command, CommandOptionType};
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::http::Http;
use serenity::model::Permissions;
use serenity::model::id::GuildId;
use tracing::info;

use crate::models::error::PlatformError;

pub const CREATE_EVENT_COMMAND: &str = "createevent";
pub const LINK_OPTION: &str = "link";

pub fn create_event_command() -> CreateCommand {
    CreateCommand::new(CREATE_EVENT_COMMAND)
        .description("Create a Discord event from a Partiful event link")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                LINK_OPTION,
                "The Partiful event link to scrape",
            )
            .required(true),
        )
        // No permissions granted by default: administrators only.
        .default_member_permissions(Permissions::empty())
}

pub fn commands() -> Vec<CreateCommand> {
    vec![create_event_command()]
}

/// Replaces the guild's command set with ours.
pub async fn sync_guild_commands(
    http: &Http,
    guild_id: GuildId,
) -> Result<Vec<Command>, PlatformError> {
    let commands = commands();
    info!(
        "Started refreshing {} application (/) commands for guild {}",
        commands.len(),
        guild_id
    );
    let registered = guild_id.set_commands(http, commands).await?;
    info!(
        "Successfully reloaded {} application (/) commands for guild {}",
        registered.len(),
        guild_id
    );
    for command in &registered {
        info!("  - /{}: {}", command.name, command.description);
    }
    Ok(registered)
}
