use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::{
        all::{
            AutoArchiveDuration, ChannelId, ChannelType, CreateMessage, CreateThread,
            ExecuteWebhook, GuildId, Webhook,
        },
        http::Http,
    },
    url::Url,
};

use crate::{error::Error, record::LogRecord};

/// Display name webhook posts are attributed to, independent of any live
/// session.
const WEBHOOK_USERNAME: &str = "Mod Logs";

/// A thread that already exists under the log channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub id: ChannelId,
    pub name: String,
}

/// Platform operations the audit subsystem needs.
///
/// Object-safe so the emitter and resolver can be exercised against a fake
/// in tests; the production implementation is [`DiscordTransport`].
#[async_trait]
pub trait AuditTransport: Send + Sync {
    /// Threads currently active under the log channel.
    async fn active_threads(&self) -> Result<Vec<ThreadInfo>, Error>;

    /// Create a public thread under the log channel.
    async fn create_thread(&self, name: &str) -> Result<ChannelId, Error>;

    /// Post a record into a resolved thread.
    async fn send_to_thread(&self, thread: ChannelId, record: &LogRecord) -> Result<(), Error>;

    /// Post a record through a webhook, bypassing the session.
    async fn send_to_webhook(&self, url: &Url, record: &LogRecord) -> Result<(), Error>;
}

/// Serenity-backed transport bound to one guild and one log channel.
pub struct DiscordTransport {
    http: Arc<Http>,
    guild_id: GuildId,
    log_channel: ChannelId,
}

impl DiscordTransport {
    pub fn new(http: Arc<Http>, guild_id: GuildId, log_channel: ChannelId) -> Self {
        Self {
            http,
            guild_id,
            log_channel,
        }
    }

    /// Fetch the log channel and confirm it can hold threads.
    pub async fn verify_log_channel(&self) -> Result<(), Error> {
        let channel = self
            .http
            .get_channel(self.log_channel)
            .await
            .map_err(|e| Error::Channel(format!("log channel fetch failed: {e}")))?;
        let text_capable = channel
            .guild()
            .is_some_and(|c| c.kind == ChannelType::Text);
        if text_capable {
            Ok(())
        } else {
            Err(Error::Channel(format!(
                "log channel {} is not a guild text channel",
                self.log_channel
            )))
        }
    }
}

#[async_trait]
impl AuditTransport for DiscordTransport {
    async fn active_threads(&self) -> Result<Vec<ThreadInfo>, Error> {
        self.verify_log_channel().await?;
        let threads = self
            .guild_id
            .get_active_threads(&self.http)
            .await
            .map_err(|e| Error::Channel(format!("thread list failed: {e}")))?;
        Ok(threads
            .threads
            .into_iter()
            .filter(|t| t.parent_id == Some(self.log_channel))
            .map(|t| ThreadInfo {
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    async fn create_thread(&self, name: &str) -> Result<ChannelId, Error> {
        // Public thread, auto-archived after 7 days (10080 minutes).
        let builder = CreateThread::new(name)
            .kind(ChannelType::PublicThread)
            .auto_archive_duration(AutoArchiveDuration::OneWeek);
        let thread = self
            .log_channel
            .create_thread(&self.http, builder)
            .await
            .map_err(|e| Error::Channel(format!("thread create failed: {e}")))?;
        Ok(thread.id)
    }

    async fn send_to_thread(&self, thread: ChannelId, record: &LogRecord) -> Result<(), Error> {
        thread
            .send_message(&self.http, CreateMessage::new().embed(record.to_embed()))
            .await
            .map_err(|e| Error::Send(format!("thread post failed: {e}")))?;
        Ok(())
    }

    async fn send_to_webhook(&self, url: &Url, record: &LogRecord) -> Result<(), Error> {
        // A transient client bound to the URL; no session state involved.
        let webhook = Webhook::from_url(&self.http, url.as_str())
            .await
            .map_err(|e| Error::Send(format!("webhook resolve failed: {e}")))?;
        webhook
            .execute(
                &self.http,
                false,
                ExecuteWebhook::new()
                    .username(WEBHOOK_USERNAME)
                    .embed(record.to_embed()),
            )
            .await
            .map_err(|e| Error::Send(format!("webhook post failed: {e}")))?;
        Ok(())
    }
}
