//! `/embed` and `/raw`: publish pre-authored JSON files to a channel.
//!
//! Files are validated before anything touches the API, and both outcomes
//! are written to the audit log so there is a record of who published
//! what, even when it failed.

use std::{fs, path::Path};

use {
    serde_json::Value,
    serenity::all::{
        ChannelId, CommandInteraction, CreateEmbed, CreateMessage, Mentionable, Permissions,
    },
};

use warden_audit::{ActionCategory, LogRecord, colors};
use warden_payload::{validate_embed_document, validate_message};

use crate::{
    commands::{CommandCtx, channel_option, error_embed, invoker_has, str_option, success_embed},
    error::{Error, Result},
};

const DEFAULT_EMBED_COLOR: u32 = 0x2F3136;

pub async fn send_embed(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::MANAGE_MESSAGES) {
        return error_embed("Permission denied", "You cannot publish embeds.");
    }

    let (channel, file) = match (
        channel_option(command, "channel"),
        str_option(command, "file"),
    ) {
        (Some(channel), Some(file)) => (channel, file),
        _ => return error_embed("Embed failed", "Missing `channel` or `file` option."),
    };

    match send_embed_inner(cctx, channel, file).await {
        Ok(count) => {
            audit_publish(cctx, command, ActionCategory::Embed, file, channel, None).await;
            success_embed(
                "Embed sent",
                format!("Sent **{count}** embed(s) from `{file}` to {}.", channel.mention()),
            )
        },
        Err(e) => {
            audit_publish(
                cctx,
                command,
                ActionCategory::Embed,
                file,
                channel,
                Some(&e),
            )
            .await;
            error_embed("Embed failed", format!("```{e}```"))
        },
    }
}

async fn send_embed_inner(cctx: &CommandCtx<'_>, channel: ChannelId, file: &str) -> Result<u64> {
    let document = load_json(&cctx.config.embeds_dir(), file)?;
    validate_embed_document(&document)?;

    let embeds = build_embeds(&document);
    let count = embeds.len() as u64;
    channel
        .send_message(cctx.http, CreateMessage::new().embeds(embeds))
        .await?;
    Ok(count)
}

pub async fn send_raw(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::MANAGE_MESSAGES) {
        return error_embed("Permission denied", "You cannot publish raw payloads.");
    }

    let (channel, file) = match (
        channel_option(command, "channel"),
        str_option(command, "file"),
    ) {
        (Some(channel), Some(file)) => (channel, file),
        _ => return error_embed("Raw send failed", "Missing `channel` or `file` option."),
    };

    match send_raw_inner(cctx, channel, file).await {
        Ok(()) => {
            audit_publish(cctx, command, ActionCategory::Raw, file, channel, None).await;
            success_embed(
                "Payload sent",
                format!("Sent `{file}` to {}.", channel.mention()),
            )
        },
        Err(e) => {
            audit_publish(cctx, command, ActionCategory::Raw, file, channel, Some(&e)).await;
            error_embed("Raw send failed", format!("```{e}```"))
        },
    }
}

async fn send_raw_inner(cctx: &CommandCtx<'_>, channel: ChannelId, file: &str) -> Result<()> {
    let payload = load_json(&cctx.config.messages_dir(), file)?;
    validate_message(&payload)?;

    cctx.http.send_message(channel, vec![], &payload).await?;
    Ok(())
}

fn load_json(dir: &Path, file: &str) -> Result<Value> {
    // File names come from a slash option; keep them to a single path
    // component so they cannot reach outside the data directory.
    if file.contains(['/', '\\']) || file.contains("..") {
        return Err(Error::PayloadFile {
            path: file.to_string(),
            reason: "file name must not contain path separators".to_string(),
        });
    }

    let path = dir.join(format!("{file}.json"));
    let text = fs::read_to_string(&path).map_err(|e| Error::PayloadFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| Error::PayloadFile {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Build serenity embeds from a validated embed document.
fn build_embeds(document: &Value) -> Vec<CreateEmbed> {
    let Some(entries) = document.get("embeds").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            let mut embed = CreateEmbed::new().color(
                entry
                    .get("color")
                    .and_then(Value::as_u64)
                    .map_or(DEFAULT_EMBED_COLOR, |c| c as u32),
            );
            if let Some(title) = entry.get("title").and_then(Value::as_str) {
                embed = embed.title(title);
            }
            if let Some(description) = entry.get("description").and_then(Value::as_str) {
                embed = embed.description(description);
            }
            if let Some(fields) = entry.get("fields").and_then(Value::as_array) {
                for field in fields {
                    let name = field.get("name").and_then(Value::as_str).unwrap_or("\u{200b}");
                    let value = field
                        .get("value")
                        .and_then(Value::as_str)
                        .unwrap_or("\u{200b}");
                    let inline = field
                        .get("inline")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    embed = embed.field(name, value, inline);
                }
            }
            if let Some(footer) = entry
                .get("footer")
                .and_then(|f| f.get("text"))
                .and_then(Value::as_str)
            {
                embed = embed.footer(serenity::all::CreateEmbedFooter::new(footer));
            }
            embed
        })
        .collect()
}

async fn audit_publish(
    cctx: &CommandCtx<'_>,
    command: &CommandInteraction,
    category: ActionCategory,
    file: &str,
    channel: ChannelId,
    error: Option<&Error>,
) {
    let (title, color, outcome) = match error {
        None => ("Message published", colors::SUCCESS, "ok".to_string()),
        Some(e) => ("Message publish failed", colors::ERROR, e.to_string()),
    };
    cctx.audit
        .log(
            category,
            &LogRecord::new(
                title,
                format!(
                    "File: `{file}.json`\nChannel: {}\nAuthor: {}\nOutcome: {outcome}",
                    channel.mention(),
                    command.user.id.mention()
                ),
                color,
            ),
        )
        .await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn build_embeds_maps_title_description_and_color() {
        let document = json!({
            "embeds": [{"title": "Rules", "description": "Be kind", "color": 0x3498DB}]
        });
        let embeds = build_embeds(&document);
        assert_eq!(embeds.len(), 1);
        let value = serde_json::to_value(&embeds[0]).unwrap();
        assert_eq!(value["title"], "Rules");
        assert_eq!(value["description"], "Be kind");
        assert_eq!(value["color"], 0x3498DB);
    }

    #[test]
    fn build_embeds_defaults_color_when_absent() {
        let document = json!({"embeds": [{"title": "Plain"}]});
        let value = serde_json::to_value(&build_embeds(&document)[0]).unwrap();
        assert_eq!(value["color"], DEFAULT_EMBED_COLOR);
    }

    #[test]
    fn build_embeds_maps_fields_and_footer() {
        let document = json!({
            "embeds": [{
                "description": "FAQ",
                "fields": [
                    {"name": "Q1", "value": "A1", "inline": true},
                    {"name": "Q2", "value": "A2"}
                ],
                "footer": {"text": "updated weekly"}
            }]
        });
        let value = serde_json::to_value(&build_embeds(&document)[0]).unwrap();
        let fields = value["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["name"], "Q1");
        assert_eq!(fields[0]["inline"], true);
        assert_eq!(fields[1]["inline"], false);
        assert_eq!(value["footer"]["text"], "updated weekly");
    }

    #[test]
    fn build_embeds_handles_multiple_entries() {
        let document = json!({
            "embeds": [{"title": "one"}, {"title": "two"}, {"description": "three"}]
        });
        assert_eq!(build_embeds(&document).len(), 3);
    }

    #[test]
    fn load_json_rejects_path_traversal() {
        let dir = std::path::PathBuf::from("data/embeds");
        for name in ["../secrets", "a/b", "a\\b", ".."] {
            assert!(
                load_json(&dir, name).is_err(),
                "expected rejection for {name}"
            );
        }
    }
}
