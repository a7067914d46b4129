//! Gateway event handler. Wires command registration, the audit pipeline,
//! and command dispatch to serenity's event loop.

use std::sync::{Arc, RwLock};

use {
    serenity::{
        all::{
            ActivityData, Context, CreateInteractionResponseFollowup, EventHandler, Interaction,
            OnlineStatus, Ready,
        },
        async_trait,
        model::gateway::GatewayIntents,
    },
    tracing::{debug, info, warn},
};

use {
    warden_audit::{AuditLog, DiscordTransport},
    warden_invites::InviteStore,
};

use crate::{
    commands::{self, CommandCtx},
    config::WardenConfig,
};

/// Gateway intents the bot needs. Slash commands arrive over interactions,
/// so guild metadata is the only subscription.
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
}

pub struct Handler {
    config: Arc<WardenConfig>,
    invites: Arc<InviteStore>,
    // Built on ready, once the HTTP client and log channel are verified.
    audit: RwLock<Option<Arc<AuditLog>>>,
}

impl Handler {
    pub fn new(config: Arc<WardenConfig>) -> Self {
        let invites = Arc::new(InviteStore::new(config.invite_store_path()));
        Self {
            config,
            invites,
            audit: RwLock::new(None),
        }
    }

    fn audit_log(&self) -> Option<Arc<AuditLog>> {
        self.audit
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(bot = %ready.user.name, guild_id = %self.config.guild_id, "connected to gateway");

        if let Some(text) = &self.config.presence {
            ctx.set_presence(Some(ActivityData::watching(text)), OnlineStatus::Online);
        }

        match self
            .config
            .guild_id
            .set_commands(&ctx.http, commands::build_commands())
            .await
        {
            Ok(synced) => info!(count = synced.len(), "registered guild slash commands"),
            Err(e) => warn!("failed to register guild slash commands: {e}"),
        }

        let transport = DiscordTransport::new(
            Arc::clone(&ctx.http),
            self.config.guild_id,
            self.config.log_channel_id,
        );
        if let Err(e) = transport.verify_log_channel().await {
            warn!("audit log channel check failed: {e}");
        }

        let audit = Arc::new(AuditLog::new(
            Arc::new(transport),
            self.config.webhook_directory(),
        ));
        audit.prewarm().await;
        info!("audit pipeline ready");

        *self.audit.write().unwrap_or_else(|e| e.into_inner()) = Some(audit);
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let Some(audit) = self.audit_log() else {
            debug!(command = %command.data.name, "command received before ready finished");
            if command.defer_ephemeral(&ctx.http).await.is_ok()
                && let Err(e) = command
                    .create_followup(
                        &ctx.http,
                        CreateInteractionResponseFollowup::new()
                            .content("Still starting up, try again in a moment.")
                            .ephemeral(true),
                    )
                    .await
            {
                warn!("failed to send not-ready response: {e}");
            }
            return;
        };

        let cctx = CommandCtx {
            http: &ctx.http,
            config: &self.config,
            audit: &audit,
            invites: &self.invites,
        };
        commands::dispatch(&ctx, &command, &cctx).await;
    }
}
