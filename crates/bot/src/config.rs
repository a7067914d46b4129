use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    serde::{Deserialize, Serialize},
    serenity::all::{ChannelId, GuildId},
};

use warden_audit::{ActionCategory, WebhookDirectory};

/// Per-category webhook endpoint overrides.
///
/// Categories without their own entry use `base`; the `Default` routing
/// entry comes from `default` (or `base` in its absence).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub base: Option<String>,
    pub mute: Option<String>,
    pub unmute: Option<String>,
    pub kick: Option<String>,
    pub ban: Option<String>,
    pub default: Option<String>,
}

/// Process-wide configuration, read once at startup and immutable after.
#[derive(Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Discord bot token.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// The guild this bot manages.
    pub guild_id: GuildId,

    /// Fixed channel whose threads carry the audit log streams.
    pub log_channel_id: ChannelId,

    /// Webhook endpoints for the external audit sink.
    #[serde(default)]
    pub webhooks: WebhookConfig,

    /// Directory holding `embeds/`, `messages/`, and the invite store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Watching-status text shown in the member list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl WardenConfig {
    /// Build the per-category webhook directory from the configured
    /// overrides, mirroring each moderation category onto `base` when its
    /// override is absent.
    pub fn webhook_directory(&self) -> WebhookDirectory {
        let mut directory = WebhookDirectory::new();
        let base = self.webhooks.base.as_deref();
        let entries = [
            (ActionCategory::Mute, self.webhooks.mute.as_deref()),
            (ActionCategory::MuteContext, self.webhooks.mute.as_deref()),
            (ActionCategory::Unmute, self.webhooks.unmute.as_deref()),
            (ActionCategory::Kick, self.webhooks.kick.as_deref()),
            (ActionCategory::Ban, self.webhooks.ban.as_deref()),
            (ActionCategory::Default, self.webhooks.default.as_deref()),
        ];
        for (category, specific) in entries {
            if let Some(url) = specific.or(base) {
                directory.insert(category, url);
            }
        }
        directory
    }

    pub fn embeds_dir(&self) -> PathBuf {
        self.data_dir.join("embeds")
    }

    pub fn messages_dir(&self) -> PathBuf {
        self.data_dir.join("messages")
    }

    pub fn invite_store_path(&self) -> PathBuf {
        self.data_dir.join("invites.json")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl std::fmt::Debug for WardenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardenConfig")
            .field("token", &"[REDACTED]")
            .field("guild_id", &self.guild_id)
            .field("log_channel_id", &self.log_channel_id)
            .field("webhooks", &self.webhooks)
            .field("data_dir", &self.data_dir)
            .field("presence", &self.presence)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use secrecy::ExposeSecret;
    serializer.serialize_str(secret.expose_secret())
}
