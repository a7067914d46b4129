use std::collections::HashMap;

use url::Url;

/// Which kind of action a log entry represents.
///
/// Closed set; routing falls back to `Default` for anything without its own
/// thread or webhook entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    Mute,
    /// Timeout applied through the context-menu shortcut; routed like
    /// `Mute` but labelled separately in diagnostics.
    MuteContext,
    Unmute,
    Kick,
    Ban,
    Embed,
    Raw,
    Invite,
    Default,
}

impl ActionCategory {
    /// Every category, for startup pre-warming.
    pub const ALL: [Self; 9] = [
        Self::Mute,
        Self::MuteContext,
        Self::Unmute,
        Self::Kick,
        Self::Ban,
        Self::Embed,
        Self::Raw,
        Self::Invite,
        Self::Default,
    ];
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Mute => "mute",
            Self::MuteContext => "mute-context",
            Self::Unmute => "unmute",
            Self::Kick => "kick",
            Self::Ban => "ban",
            Self::Embed => "embed",
            Self::Raw => "raw",
            Self::Invite => "invite",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// Category -> thread display name. Static for the process lifetime.
///
/// Categories without their own entry share the default thread.
#[derive(Debug, Clone)]
pub struct ThreadDirectory {
    entries: HashMap<ActionCategory, String>,
    default: String,
}

impl Default for ThreadDirectory {
    fn default() -> Self {
        let entries = HashMap::from([
            (ActionCategory::Mute, "\u{1f507} logs-mute".to_string()),
            (ActionCategory::MuteContext, "\u{1f507} logs-mute".to_string()),
            (ActionCategory::Unmute, "\u{1f50a} logs-unmute".to_string()),
            (ActionCategory::Kick, "\u{1f462} logs-kick".to_string()),
            (ActionCategory::Ban, "\u{1f528} logs-ban".to_string()),
        ]);
        Self {
            entries,
            default: "\u{1f4cb} logs-general".to_string(),
        }
    }
}

impl ThreadDirectory {
    pub fn thread_name(&self, category: ActionCategory) -> &str {
        self.entries
            .get(&category)
            .map_or(self.default.as_str(), String::as_str)
    }
}

/// Category -> webhook endpoint URL, with a `Default` fallback entry.
///
/// Entries may be absent or invalid; `resolve` only ever hands out a URL
/// that passed endpoint validation.
#[derive(Debug, Clone, Default)]
pub struct WebhookDirectory {
    entries: HashMap<ActionCategory, String>,
}

impl WebhookDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: ActionCategory, url: impl Into<String>) {
        self.entries.insert(category, url.into());
    }

    /// Resolve the webhook for a category.
    ///
    /// An absent or invalid per-category entry falls back to the `Default`
    /// entry; if that is also absent or invalid, the webhook sink is
    /// skipped entirely.
    pub fn resolve(&self, category: ActionCategory) -> Option<Url> {
        self.entries
            .get(&category)
            .and_then(|url| parse_webhook(url))
            .or_else(|| {
                self.entries
                    .get(&ActionCategory::Default)
                    .and_then(|url| parse_webhook(url))
            })
    }
}

fn parse_webhook(url: &str) -> Option<Url> {
    let parsed = Url::parse(url).ok()?;
    is_webhook_endpoint(&parsed).then_some(parsed)
}

/// Whether a URL has the expected webhook endpoint shape: https, a
/// discord.com host, and an `/api/webhooks/` path.
pub fn is_webhook_endpoint(url: &Url) -> bool {
    url.scheme() == "https"
        && url
            .host_str()
            .is_some_and(|host| host == "discord.com" || host.ends_with(".discord.com"))
        && url.path().starts_with("/api/webhooks/")
}
