//! Moderation slash command handlers.
//!
//! Each handler returns the embed to show the invoker. Targets are DMed
//! before the action lands so the notice still reaches users we are about
//! to remove from the guild.

use {
    chrono::{Duration, Utc},
    serenity::{
        all::{
            CommandInteraction, CreateEmbed, CreateMessage, EditMember, Mentionable, Permissions,
            Timestamp, User,
        },
        model::application::ResolvedTarget,
    },
    tracing::debug,
};

use warden_audit::{ActionCategory, LogRecord, colors};

use crate::{
    commands::{CommandCtx, error_embed, int_option, invoker_has, response_embed, str_option,
        user_option},
    error::{Error, Result},
};

/// Fixed timeout length for the right-click context entry.
const CONTEXT_TIMEOUT_MINUTES: i64 = 10;

pub async fn mute(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::MODERATE_MEMBERS) {
        return error_embed("Permission denied", "You cannot time members out.");
    }
    match mute_inner(cctx, command).await {
        Ok(embed) => embed,
        Err(e) => error_embed("Mute failed", format!("```{e}```")),
    }
}

async fn mute_inner(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> Result<CreateEmbed> {
    let user = user_option(command, "member").ok_or(Error::MissingOption("member"))?;
    let minutes = int_option(command, "minutes").ok_or(Error::MissingOption("minutes"))?;

    dm_target(
        cctx,
        user,
        format!("You have been muted for **{minutes}** minutes."),
    )
    .await;

    apply_timeout(cctx, user, minutes).await?;

    cctx.audit
        .log(
            ActionCategory::Mute,
            &LogRecord::new(
                "Member muted",
                format!(
                    "Member: {}\nDuration: {minutes} minutes\nModerator: {}",
                    user.id.mention(),
                    command.user.id.mention()
                ),
                colors::MUTE,
            ),
        )
        .await;

    Ok(response_embed(
        "Member muted",
        format!("{} was muted for **{minutes}** minutes.", user.id.mention()),
        colors::MUTE,
    ))
}

/// Right-click "Timeout 10 min" on a member. Same action as `/mute`, but
/// logged under its own routing category so context timeouts stay
/// distinguishable in the audit streams.
pub async fn context_timeout(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::MODERATE_MEMBERS) {
        return error_embed("Permission denied", "You cannot time members out.");
    }
    match context_timeout_inner(cctx, command).await {
        Ok(embed) => embed,
        Err(e) => error_embed("Timeout failed", format!("```{e}```")),
    }
}

async fn context_timeout_inner(
    cctx: &CommandCtx<'_>,
    command: &CommandInteraction,
) -> Result<CreateEmbed> {
    let Some(ResolvedTarget::User(user, _)) = command.data.target() else {
        return Err(Error::MissingOption("user"));
    };

    dm_target(
        cctx,
        user,
        format!("You have been muted for **{CONTEXT_TIMEOUT_MINUTES}** minutes."),
    )
    .await;

    apply_timeout(cctx, user, CONTEXT_TIMEOUT_MINUTES).await?;

    cctx.audit
        .log(
            ActionCategory::MuteContext,
            &LogRecord::new(
                "Member muted",
                format!(
                    "Member: {}\nDuration: {CONTEXT_TIMEOUT_MINUTES} minutes\nModerator: {}",
                    user.id.mention(),
                    command.user.id.mention()
                ),
                colors::MUTE,
            ),
        )
        .await;

    Ok(response_embed(
        "Member muted",
        format!(
            "{} was muted for **{CONTEXT_TIMEOUT_MINUTES}** minutes.",
            user.id.mention()
        ),
        colors::MUTE,
    ))
}

pub async fn unmute(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::MODERATE_MEMBERS) {
        return error_embed("Permission denied", "You cannot remove timeouts.");
    }
    match unmute_inner(cctx, command).await {
        Ok(embed) => embed,
        Err(e) => error_embed("Unmute failed", format!("```{e}```")),
    }
}

async fn unmute_inner(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> Result<CreateEmbed> {
    let user = user_option(command, "member").ok_or(Error::MissingOption("member"))?;

    dm_target(cctx, user, "Your mute has been lifted.".to_string()).await;

    cctx.config
        .guild_id
        .edit_member(cctx.http, user.id, EditMember::new().enable_communication())
        .await?;

    cctx.audit
        .log(
            ActionCategory::Unmute,
            &LogRecord::new(
                "Member unmuted",
                format!(
                    "Member: {}\nModerator: {}",
                    user.id.mention(),
                    command.user.id.mention()
                ),
                colors::UNMUTE,
            ),
        )
        .await;

    Ok(response_embed(
        "Member unmuted",
        format!("{} can speak again.", user.id.mention()),
        colors::UNMUTE,
    ))
}

pub async fn kick(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::KICK_MEMBERS) {
        return error_embed("Permission denied", "You cannot kick members.");
    }
    match kick_inner(cctx, command).await {
        Ok(embed) => embed,
        Err(e) => error_embed("Kick failed", format!("```{e}```")),
    }
}

async fn kick_inner(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> Result<CreateEmbed> {
    let user = user_option(command, "member").ok_or(Error::MissingOption("member"))?;
    let reason = str_option(command, "reason").unwrap_or("No reason given");

    let guild = guild_name(cctx).await;
    dm_target(
        cctx,
        user,
        format!("You have been kicked from **{guild}**.\nReason: {reason}"),
    )
    .await;

    cctx.config
        .guild_id
        .kick_with_reason(cctx.http, user.id, reason)
        .await?;

    cctx.audit
        .log(
            ActionCategory::Kick,
            &LogRecord::new(
                "Member kicked",
                format!(
                    "Member: {}\nReason: {reason}\nModerator: {}",
                    user.id.mention(),
                    command.user.id.mention()
                ),
                colors::KICK,
            ),
        )
        .await;

    Ok(response_embed(
        "Member kicked",
        format!("{} was kicked.\nReason: {reason}", user.id.mention()),
        colors::KICK,
    ))
}

pub async fn ban(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::BAN_MEMBERS) {
        return error_embed("Permission denied", "You cannot ban members.");
    }
    match ban_inner(cctx, command).await {
        Ok(embed) => embed,
        Err(e) => error_embed("Ban failed", format!("```{e}```")),
    }
}

async fn ban_inner(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> Result<CreateEmbed> {
    let user = user_option(command, "member").ok_or(Error::MissingOption("member"))?;
    let reason = str_option(command, "reason").unwrap_or("No reason given");

    let guild = guild_name(cctx).await;
    dm_target(
        cctx,
        user,
        format!("You have been banned from **{guild}**.\nReason: {reason}"),
    )
    .await;

    cctx.config
        .guild_id
        .ban_with_reason(cctx.http, user.id, 0, reason)
        .await?;

    cctx.audit
        .log(
            ActionCategory::Ban,
            &LogRecord::new(
                "Member banned",
                format!(
                    "Member: {}\nReason: {reason}\nModerator: {}",
                    user.id.mention(),
                    command.user.id.mention()
                ),
                colors::BAN,
            ),
        )
        .await;

    Ok(response_embed(
        "Member banned",
        format!("{} was banned.\nReason: {reason}", user.id.mention()),
        colors::BAN,
    ))
}

async fn apply_timeout(cctx: &CommandCtx<'_>, user: &User, minutes: i64) -> Result<()> {
    let until = Utc::now() + Duration::minutes(minutes);
    let until =
        Timestamp::from_unix_timestamp(until.timestamp()).map_err(|_| Error::InvalidDuration)?;
    cctx.config
        .guild_id
        .edit_member(
            cctx.http,
            user.id,
            EditMember::new().disable_communication_until_datetime(until),
        )
        .await?;
    Ok(())
}

/// DM the target; failures (closed DMs, blocked bot) are expected and only
/// logged at debug.
async fn dm_target(cctx: &CommandCtx<'_>, user: &User, text: String) {
    let message = CreateMessage::new().content(text);
    if let Err(e) = user.dm(cctx.http, message).await {
        debug!(user = %user.name, "could not DM moderation notice: {e}");
    }
}

async fn guild_name(cctx: &CommandCtx<'_>) -> String {
    match cctx.http.get_guild(cctx.config.guild_id).await {
        Ok(guild) => guild.name,
        Err(e) => {
            debug!("could not fetch guild name: {e}");
            "this server".to_string()
        },
    }
}
