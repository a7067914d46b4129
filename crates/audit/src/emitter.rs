use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    category::{ActionCategory, ThreadDirectory, WebhookDirectory},
    record::LogRecord,
    threads::ThreadResolver,
    transport::AuditTransport,
};

/// The dual-sink audit emitter.
///
/// `log` delivers a record to the thread sink and the webhook sink
/// independently. A failure in either sink is recorded locally and
/// swallowed: the command whose action is being audited already succeeded
/// or failed on its own terms, and a broken log channel or webhook must
/// not change what the invoking user sees.
pub struct AuditLog {
    transport: Arc<dyn AuditTransport>,
    resolver: ThreadResolver,
    webhooks: WebhookDirectory,
}

impl AuditLog {
    pub fn new(transport: Arc<dyn AuditTransport>, webhooks: WebhookDirectory) -> Self {
        Self::with_directory(transport, ThreadDirectory::default(), webhooks)
    }

    pub fn with_directory(
        transport: Arc<dyn AuditTransport>,
        directory: ThreadDirectory,
        webhooks: WebhookDirectory,
    ) -> Self {
        let resolver = ThreadResolver::new(directory, Arc::clone(&transport));
        Self {
            transport,
            resolver,
            webhooks,
        }
    }

    /// Deliver a record to both sinks. Infallible by contract.
    pub async fn log(&self, category: ActionCategory, record: &LogRecord) {
        // Thread sink: resolution failures already degrade to None.
        if let Some(thread) = self.resolver.resolve(category).await {
            if let Err(e) = self.transport.send_to_thread(thread, record).await {
                warn!(%category, "thread sink failed: {e}");
            }
        }

        // Webhook sink: an unconfigured directory skips the sink outright.
        let Some(url) = self.webhooks.resolve(category) else {
            debug!(%category, "no valid webhook configured, skipping webhook sink");
            return;
        };
        if let Err(e) = self.transport.send_to_webhook(&url, record).await {
            warn!(%category, "webhook sink failed: {e}");
        }
    }

    /// Eagerly resolve one thread per category.
    ///
    /// Run at startup so the first real log event per category skips
    /// creation latency and operators see every log thread immediately.
    pub async fn prewarm(&self) {
        for category in ActionCategory::ALL {
            if self.resolver.resolve(category).await.is_none() {
                debug!(%category, "prewarm could not resolve log thread");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {
        super::*,
        crate::{record::colors, testing::FakeTransport},
    };

    const GOOD: &str = "https://discord.com/api/webhooks/123/token";
    const FALLBACK: &str = "https://discord.com/api/webhooks/999/fallback";

    fn record() -> LogRecord {
        LogRecord::new("Ban issued", "Target: someone", colors::BAN)
    }

    fn webhook_directory() -> WebhookDirectory {
        let mut directory = WebhookDirectory::new();
        directory.insert(ActionCategory::Ban, GOOD);
        directory.insert(ActionCategory::Default, FALLBACK);
        directory
    }

    #[tokio::test]
    async fn log_delivers_to_both_sinks() {
        let transport = Arc::new(FakeTransport::new());
        let audit = AuditLog::new(transport.clone(), webhook_directory());

        audit.log(ActionCategory::Ban, &record()).await;

        let thread_posts = transport.thread_posts.lock().unwrap();
        assert_eq!(thread_posts.len(), 1);
        assert_eq!(thread_posts[0].1, "Ban issued");

        let webhook_posts = transport.webhook_posts.lock().unwrap();
        assert_eq!(webhook_posts.len(), 1);
        assert_eq!(webhook_posts[0].0, GOOD);
    }

    #[tokio::test]
    async fn invalid_category_webhook_falls_back_to_default() {
        let mut directory = WebhookDirectory::new();
        directory.insert(ActionCategory::Ban, "http://discord.com/api/webhooks/1/t");
        directory.insert(ActionCategory::Default, FALLBACK);
        let transport = Arc::new(FakeTransport::new());
        let audit = AuditLog::new(transport.clone(), directory);

        audit.log(ActionCategory::Ban, &record()).await;

        let webhook_posts = transport.webhook_posts.lock().unwrap();
        assert_eq!(webhook_posts.len(), 1);
        assert_eq!(webhook_posts[0].0, FALLBACK);
    }

    #[tokio::test]
    async fn thread_sink_failure_does_not_stop_the_webhook_sink() {
        let mut fake = FakeTransport::new();
        fake.fail_thread_send = true;
        let transport = Arc::new(fake);
        let audit = AuditLog::new(transport.clone(), webhook_directory());

        audit.log(ActionCategory::Ban, &record()).await;

        assert!(transport.thread_posts.lock().unwrap().is_empty());
        assert_eq!(transport.webhook_posts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn both_sinks_failing_still_returns_normally() {
        // Channel deleted and webhook gone; log must neither panic nor err.
        let mut fake = FakeTransport::new();
        fake.fail_list = true;
        fake.fail_create = true;
        fake.fail_webhook_send = true;
        let transport = Arc::new(fake);
        let audit = AuditLog::new(transport.clone(), webhook_directory());

        audit.log(ActionCategory::Ban, &record()).await;

        assert!(transport.thread_posts.lock().unwrap().is_empty());
        assert!(transport.webhook_posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_webhook_directory_skips_the_webhook_sink() {
        let transport = Arc::new(FakeTransport::new());
        let audit = AuditLog::new(transport.clone(), WebhookDirectory::new());

        audit.log(ActionCategory::Kick, &record()).await;

        assert_eq!(transport.thread_posts.lock().unwrap().len(), 1);
        assert!(transport.webhook_posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_logs_reuse_the_resolved_thread() {
        let transport = Arc::new(FakeTransport::new());
        let audit = AuditLog::new(transport.clone(), WebhookDirectory::new());

        audit.log(ActionCategory::Kick, &record()).await;
        audit.log(ActionCategory::Kick, &record()).await;

        assert_eq!(
            transport.creates.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
        assert_eq!(transport.thread_posts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn prewarm_creates_every_directory_thread() {
        let transport = Arc::new(FakeTransport::new());
        let audit = AuditLog::new(transport.clone(), WebhookDirectory::new());

        audit.prewarm().await;

        let names: Vec<String> = transport
            .threads
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        // Five distinct thread names: mute, unmute, kick, ban, general.
        assert_eq!(names.len(), 5, "threads created: {names:?}");
        assert!(names.iter().any(|n| n.contains("logs-mute")));
        assert!(names.iter().any(|n| n.contains("logs-general")));
    }

    #[tokio::test]
    async fn prewarm_finds_existing_threads_instead_of_creating() {
        let transport = Arc::new(
            FakeTransport::new()
                .with_thread(1, "\u{1f507} logs-mute")
                .with_thread(2, "\u{1f50a} logs-unmute")
                .with_thread(3, "\u{1f462} logs-kick")
                .with_thread(4, "\u{1f528} logs-ban")
                .with_thread(5, "\u{1f4cb} logs-general"),
        );
        let audit = AuditLog::new(transport.clone(), WebhookDirectory::new());

        audit.prewarm().await;

        assert_eq!(
            transport.creates.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
