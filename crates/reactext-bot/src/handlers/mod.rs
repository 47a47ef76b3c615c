//! Serenity event handler implementation

use std::sync::Arc;

use serenity::async_trait;
use serenity::builder::CreateCommand;
use serenity::model::application::{Command, CommandType, Interaction};
use serenity::model::permissions::Permissions;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::errors::log_error;
use crate::health::HealthState;
use crate::session::AppContext;

pub struct Handler;

async fn app_context(ctx: &Context) -> Option<Arc<AppContext>> {
    let data = ctx.data.read().await;
    let app = data.get::<AppContext>().cloned();
    if app.is_none() {
        error!("AppContext not found in context data");
    }
    app
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);

        let Some(app) = app_context(&ctx).await else {
            return;
        };
        let health = ctx.data.read().await.get::<HealthState>().cloned();
        if let Some(health) = &health {
            health.set_bot_username(ready.user.name.clone()).await;
        }

        // Hidden from members who cannot add reactions
        let command = CreateCommand::new(app.command_name())
            .kind(CommandType::Message)
            .default_member_permissions(Permissions::ADD_REACTIONS);

        match Command::create_global_command(&ctx.http, command).await {
            Ok(cmd) => {
                info!("Registered message command '{}' ({})", cmd.name, cmd.id);
                if let Some(health) = &health {
                    health.mark_command_registered().await;
                }
            }
            Err(e) => log_error("Failed to register message command", &e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Some(app) = app_context(&ctx).await else {
            return;
        };

        match interaction {
            Interaction::Command(cmd) => app.handle_command(&ctx.http, &cmd).await,
            Interaction::Component(comp) => app.handle_component(&ctx.http, &comp).await,
            Interaction::Modal(modal) => app.handle_modal(&ctx.http, &modal).await,
            _ => {
                // Autocomplete and ping are not used
            }
        }
    }
}
