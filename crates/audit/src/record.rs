use {
    chrono::{DateTime, Utc},
    serenity::all::{CreateEmbed, Timestamp},
};

/// Embed color per action severity.
pub mod colors {
    pub const MUTE: u32 = 0xF1C40F;
    pub const UNMUTE: u32 = 0x2ECC71;
    pub const KICK: u32 = 0xE67E22;
    pub const BAN: u32 = 0xC0392B;
    pub const SUCCESS: u32 = 0x2ECC71;
    pub const ERROR: u32 = 0xE74C3C;
    pub const INFO: u32 = 0x3498DB;
}

/// One structured audit notification.
///
/// Built by a command handler, rendered once per sink, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    title: String,
    body: String,
    color: u32,
    timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            color,
            timestamp: Utc::now(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Render the record as an embed for either sink.
    pub fn to_embed(&self) -> CreateEmbed {
        let timestamp = Timestamp::from_unix_timestamp(self.timestamp.timestamp())
            .unwrap_or_else(|_| Timestamp::now());
        CreateEmbed::new()
            .title(&self.title)
            .description(&self.body)
            .color(self.color)
            .timestamp(timestamp)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_its_fields() {
        let record = LogRecord::new("Ban issued", "Target: someone", colors::BAN);
        assert_eq!(record.title(), "Ban issued");
        assert_eq!(record.body(), "Target: someone");
        assert_eq!(record.color(), 0xC0392B);
    }

    #[test]
    fn embed_carries_title_body_and_color() {
        let record = LogRecord::new("Mute applied", "Target: user", colors::MUTE);
        let value = serde_json::to_value(record.to_embed()).unwrap();
        assert_eq!(value["title"], "Mute applied");
        assert_eq!(value["description"], "Target: user");
        assert_eq!(value["color"], 0xF1C40F);
        assert!(value["timestamp"].is_string());
    }
}
