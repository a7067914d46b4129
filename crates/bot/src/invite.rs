//! Invite slash command handlers backed by the persisted invite store.

use {
    chrono::{Duration, Utc},
    serenity::all::{CommandInteraction, CreateEmbed, CreateInvite, Mentionable, Permissions},
    tracing::warn,
};

use {
    warden_audit::{ActionCategory, LogRecord, colors},
    warden_invites::InviteRecord,
};

use crate::commands::{
    CommandCtx, error_embed, int_option, invoker_has, response_embed, str_option, success_embed,
};

pub async fn create(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::CREATE_INSTANT_INVITE) {
        return error_embed("Permission denied", "You cannot create invites.");
    }

    let (expiry, uses) = match (str_option(command, "expiry"), int_option(command, "uses")) {
        (Some(expiry), Some(uses)) => (expiry, uses),
        _ => return error_embed("Invite failed", "Missing `expiry` or `uses` option."),
    };
    let Some(seconds) = expiry_seconds(expiry) else {
        return error_embed("Invite failed", format!("Unknown expiry `{expiry}`."));
    };
    let Some(max_uses) = bounded_uses(uses) else {
        return error_embed("Invite failed", format!("Unsupported use count `{uses}`."));
    };

    let invite = match command
        .channel_id
        .create_invite(
            cctx.http,
            CreateInvite::new().max_age(seconds).max_uses(max_uses),
        )
        .await
    {
        Ok(invite) => invite,
        Err(e) => return error_embed("Invite failed", format!("```{e}```")),
    };

    let expires_at = Utc::now() + Duration::seconds(i64::from(seconds));
    let record = InviteRecord {
        expires_at,
        max_uses: u16::from(max_uses),
    };
    if let Err(e) = cctx.invites.add(&invite.code, record) {
        warn!(code = %invite.code, "failed to persist invite record: {e}");
    }

    cctx.audit
        .log(
            ActionCategory::Invite,
            &LogRecord::new(
                "Invite created",
                format!(
                    "Code: `{}`\nChannel: {}\nExpires: {}\nMax uses: {uses}\nAuthor: {}",
                    invite.code,
                    command.channel_id.mention(),
                    expires_at.format("%Y-%m-%d %H:%M UTC"),
                    command.user.id.mention()
                ),
                colors::INFO,
            ),
        )
        .await;

    success_embed(
        "Invite created",
        format!(
            "{}\nExpires: {}\nMax uses: **{uses}**",
            invite.url(),
            expires_at.format("%Y-%m-%d %H:%M UTC")
        ),
    )
}

pub async fn list(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::CREATE_INSTANT_INVITE) {
        return error_embed("Permission denied", "You cannot list invites.");
    }

    let records = cctx.invites.load();
    if records.is_empty() {
        return response_embed("Saved invites", "No invites on record.", colors::INFO);
    }

    let mut embed = response_embed(
        "Saved invites",
        format!("**{}** invite(s) on record.", records.len()),
        colors::INFO,
    );
    for (code, record) in &records {
        embed = embed.field(
            format!("Invite: {code}"),
            format!(
                "Expires: {}\nMax uses: {}",
                record.expires_at.format("%Y-%m-%d %H:%M UTC"),
                record.max_uses
            ),
            false,
        );
    }

    cctx.audit
        .log(
            ActionCategory::Invite,
            &LogRecord::new(
                "Invites listed",
                format!(
                    "Count: {}\nAuthor: {}",
                    records.len(),
                    command.user.id.mention()
                ),
                colors::INFO,
            ),
        )
        .await;

    embed
}

pub async fn remove(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::CREATE_INSTANT_INVITE) {
        return error_embed("Permission denied", "You cannot remove invites.");
    }

    let Some(code) = str_option(command, "code") else {
        return error_embed("Invite removal failed", "Missing `code` option.");
    };

    if let Err(e) = cctx.http.delete_invite(code, None).await {
        return error_embed("Invite removal failed", format!("```{e}```"));
    }

    match cctx.invites.remove(code) {
        Ok(true) => {},
        Ok(false) => warn!(code, "deleted invite had no saved record"),
        Err(e) => warn!(code, "failed to drop invite record: {e}"),
    }

    cctx.audit
        .log(
            ActionCategory::Invite,
            &LogRecord::new(
                "Invite removed",
                format!("Code: `{code}`\nAuthor: {}", command.user.id.mention()),
                colors::INFO,
            ),
        )
        .await;

    success_embed("Invite removed", format!("Invite `{code}` was deleted."))
}

/// The use-count choice set tops out at 100, but the option value arrives
/// as a bare integer; bound it here rather than truncating.
fn bounded_uses(uses: i64) -> Option<u8> {
    u8::try_from(uses).ok().filter(|u| (1..=100).contains(u))
}

/// Map an expiry choice to seconds. The choice set is fixed at command
/// registration, so an unknown value means a stale command definition.
fn expiry_seconds(choice: &str) -> Option<u32> {
    match choice {
        "30m" => Some(30 * 60),
        "1h" => Some(60 * 60),
        "6h" => Some(6 * 60 * 60),
        "12h" => Some(12 * 60 * 60),
        "1d" => Some(24 * 60 * 60),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_choices_map_to_expected_seconds() {
        assert_eq!(expiry_seconds("30m"), Some(1800));
        assert_eq!(expiry_seconds("1h"), Some(3600));
        assert_eq!(expiry_seconds("6h"), Some(21600));
        assert_eq!(expiry_seconds("12h"), Some(43200));
        assert_eq!(expiry_seconds("1d"), Some(86400));
    }

    #[test]
    fn unknown_expiry_choice_is_rejected() {
        assert_eq!(expiry_seconds("2d"), None);
        assert_eq!(expiry_seconds(""), None);
    }

    #[test]
    fn use_counts_are_bounded_not_truncated() {
        assert_eq!(bounded_uses(1), Some(1));
        assert_eq!(bounded_uses(100), Some(100));
        assert_eq!(bounded_uses(0), None);
        assert_eq!(bounded_uses(-1), None);
        assert_eq!(bounded_uses(101), None);
        // 256 would wrap to 0 under a plain cast.
        assert_eq!(bounded_uses(256), None);
    }
}
