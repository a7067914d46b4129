use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use {
    serenity::all::ChannelId,
    tracing::{debug, info},
};

use crate::{
    category::{ActionCategory, ThreadDirectory},
    transport::AuditTransport,
};

/// Find-or-create resolution of per-category log threads.
///
/// Resolved handles are memoized for the process lifetime so repeated log
/// events skip the list/create round-trip. The cache is a std `Mutex`
/// because every access is a synchronous map lookup, never held across an
/// `.await` point.
pub struct ThreadResolver {
    directory: ThreadDirectory,
    transport: Arc<dyn AuditTransport>,
    cache: Mutex<HashMap<ActionCategory, ChannelId>>,
}

impl ThreadResolver {
    pub fn new(directory: ThreadDirectory, transport: Arc<dyn AuditTransport>) -> Self {
        Self {
            directory,
            transport,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the log thread for a category.
    ///
    /// Cache hit first; otherwise scan the channel's active threads for an
    /// exact name match before creating one, so a thread name never gets a
    /// server-side duplicate. Every failure maps to `None` -- thread
    /// logging must not propagate errors to the command that triggered it.
    pub async fn resolve(&self, category: ActionCategory) -> Option<ChannelId> {
        if let Some(id) = self.cached(category) {
            return Some(id);
        }

        let name = self.directory.thread_name(category).to_string();

        match self.transport.active_threads().await {
            Ok(threads) => {
                if let Some(existing) = threads.into_iter().find(|t| t.name == name) {
                    self.memoize(category, existing.id);
                    return Some(existing.id);
                }
            },
            Err(e) => {
                debug!(%category, "thread scan failed: {e}");
                return None;
            },
        }

        match self.transport.create_thread(&name).await {
            Ok(id) => {
                info!(%category, thread = %name, "created log thread");
                self.memoize(category, id);
                Some(id)
            },
            Err(e) => {
                debug!(%category, thread = %name, "thread create failed: {e}");
                None
            },
        }
    }

    fn cached(&self, category: ActionCategory) -> Option<ChannelId> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(&category).copied()
    }

    fn memoize(&self, category: ActionCategory, id: ChannelId) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(category, id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use {super::*, crate::testing::FakeTransport};

    fn resolver(transport: Arc<FakeTransport>) -> ThreadResolver {
        ThreadResolver::new(ThreadDirectory::default(), transport)
    }

    #[tokio::test]
    async fn resolving_twice_creates_at_most_once() {
        let transport = Arc::new(FakeTransport::new());
        let resolver = resolver(Arc::clone(&transport));

        let first = resolver.resolve(ActionCategory::Ban).await;
        let second = resolver.resolve(ActionCategory::Ban).await;

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(transport.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn existing_thread_is_found_not_duplicated() {
        let transport = Arc::new(FakeTransport::new().with_thread(42, "\u{1f528} logs-ban"));
        let resolver = resolver(Arc::clone(&transport));

        let resolved = resolver.resolve(ActionCategory::Ban).await;

        assert_eq!(resolved, Some(ChannelId::new(42)));
        assert_eq!(transport.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn list_failure_resolves_to_none_without_creating() {
        let mut fake = FakeTransport::new();
        fake.fail_list = true;
        let transport = Arc::new(fake);
        let resolver = resolver(Arc::clone(&transport));

        assert_eq!(resolver.resolve(ActionCategory::Kick).await, None);
        assert_eq!(transport.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_failure_resolves_to_none() {
        let mut fake = FakeTransport::new();
        fake.fail_create = true;
        let resolver = resolver(Arc::new(fake));

        assert_eq!(resolver.resolve(ActionCategory::Mute).await, None);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut fake = FakeTransport::new();
        fake.fail_list = true;
        let transport = Arc::new(fake);
        let resolver = resolver(Arc::clone(&transport));

        assert_eq!(resolver.resolve(ActionCategory::Mute).await, None);
        // A second resolve still goes back to the transport.
        assert_eq!(resolver.resolve(ActionCategory::Mute).await, None);
    }

    #[tokio::test]
    async fn shared_thread_name_finds_the_same_thread() {
        let transport = Arc::new(FakeTransport::new());
        let resolver = resolver(Arc::clone(&transport));

        let mute = resolver.resolve(ActionCategory::Mute).await;
        let context = resolver.resolve(ActionCategory::MuteContext).await;

        // Both categories map to the same thread name; the second resolve
        // must find the thread the first one created.
        assert_eq!(mute, context);
        assert_eq!(transport.creates.load(Ordering::SeqCst), 1);
    }
}
