use std::{path::PathBuf, sync::Arc};

use {
    anyhow::{Context as _, Result},
    clap::Parser,
    secrecy::{ExposeSecret, Secret},
    serenity::{
        Client,
        all::{ChannelId, GuildId},
    },
    tracing::info,
};

use warden_bot::{Handler, WardenConfig, WebhookConfig, required_intents};

/// Guild management bot for a single Discord server.
///
/// Registers moderation, message-publishing, and invite slash commands on
/// one guild and mirrors every action into thread and webhook audit logs.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: String,

    /// ID of the guild the bot manages.
    #[arg(long, env = "GUILD_ID")]
    guild_id: u64,

    /// Text channel whose threads hold the audit log streams.
    #[arg(long, env = "LOG_CHANNEL_ID")]
    log_channel_id: u64,

    /// Webhook URL used for every audit category without its own override.
    #[arg(long, env = "LOG_WEBHOOK_BASE")]
    webhook_base: Option<String>,

    /// Webhook URL for mute logs.
    #[arg(long, env = "LOG_WEBHOOK_MUTE")]
    webhook_mute: Option<String>,

    /// Webhook URL for unmute logs.
    #[arg(long, env = "LOG_WEBHOOK_UNMUTE")]
    webhook_unmute: Option<String>,

    /// Webhook URL for kick logs.
    #[arg(long, env = "LOG_WEBHOOK_KICK")]
    webhook_kick: Option<String>,

    /// Webhook URL for ban logs.
    #[arg(long, env = "LOG_WEBHOOK_BAN")]
    webhook_ban: Option<String>,

    /// Webhook URL for uncategorized logs.
    #[arg(long, env = "LOG_WEBHOOK_DEFAULT")]
    webhook_default: Option<String>,

    /// Directory holding embed files, raw payload files, and the invite
    /// store.
    #[arg(long, env = "WARDEN_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Watching-status text shown in the member list.
    #[arg(long, env = "WARDEN_PRESENCE")]
    presence: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; environment variables win either way.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Arc::new(WardenConfig {
        token: Secret::new(args.token),
        guild_id: GuildId::new(args.guild_id),
        log_channel_id: ChannelId::new(args.log_channel_id),
        webhooks: WebhookConfig {
            base: args.webhook_base,
            mute: args.webhook_mute,
            unmute: args.webhook_unmute,
            kick: args.webhook_kick,
            ban: args.webhook_ban,
            default: args.webhook_default,
        },
        data_dir: args.data_dir,
        presence: args.presence,
    });

    info!(
        guild_id = %config.guild_id,
        log_channel_id = %config.log_channel_id,
        data_dir = %config.data_dir().display(),
        "starting warden"
    );

    let token = config.token.expose_secret().clone();

    let mut client = Client::builder(&token, required_intents())
        .event_handler(Handler::new(Arc::clone(&config)))
        .await
        .context("failed to build discord client")?;

    client.start().await.context("gateway connection failed")?;

    Ok(())
}
