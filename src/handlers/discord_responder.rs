use serenity::all::CommandInteraction;
use serenity::async_trait;
use serenity::builder::{CreateEmbed, EditInteractionResponse};
use serenity::prelude::Context;
use tracing::error;

use crate::models::error::PlatformError;

/// The reply side of a slash command, kept behind a trait so handlers can be
/// driven without a gateway connection.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn defer(&self) -> Result<(), PlatformError>;
    async fn edit_text(&self, content: &str);
    async fn edit_embed(&self, embed: CreateEmbed);
}

pub struct SerenityResponder<'a> {
    ctx: &'a Context,
    command: &'a CommandInteraction,
}

impl<'a> SerenityResponder<'a> {
    pub fn for_command(ctx: &'a Context, command: &'a CommandInteraction) -> Self {
        Self { ctx, command }
    }
}

#[async_trait]
impl InteractionResponder for SerenityResponder<'_> {
    async fn defer(&self) -> Result<(), PlatformError> {
        self.command.defer(&self.ctx.http).await?;
        Ok(())
    }

    async fn edit_text(&self, content: &str) {
        if let Err(why) = self
            .command
            .edit_response(&self.ctx.http, EditInteractionResponse::new().content(content))
            .await
        {
            error!("Failed to edit interaction reply: {:?}", why);
        }
    }

    async fn edit_embed(&self, embed: CreateEmbed) {
        if let Err(why) = self
            .command
            .edit_response(&self.ctx.http, EditInteractionResponse::new().embed(embed))
            .await
        {
            error!("Failed to edit interaction reply: {:?}", why);
        }
    }
}
