//! Guild slash command registration and dispatch.
//!
//! Commands are registered against the managed guild on connect and again
//! by `/sync`. Dispatch defers ephemerally, runs the matching handler, and
//! edits the deferred response with whatever embed the handler produced --
//! one final response per invocation, always.

use std::sync::Arc;

use {
    serenity::{
        all::{
            CommandInteraction, CommandOptionType, CommandType, Context, CreateCommand,
            CreateCommandOption, CreateEmbed, CreateInteractionResponseFollowup,
            EditInteractionResponse, Permissions, Timestamp, User,
        },
        http::Http,
        model::application::ResolvedValue,
    },
    tracing::{debug, warn},
};

use {
    warden_audit::{ActionCategory, AuditLog, LogRecord, colors},
    warden_invites::InviteStore,
};

use crate::{config::WardenConfig, invite, messages, moderation};

/// Name of the right-click member context entry. Context commands are
/// matched by display name, so dispatch shares this constant with
/// registration.
pub(crate) const CONTEXT_TIMEOUT_NAME: &str = "Timeout 10 min";

/// Everything a command handler needs, passed explicitly so handlers stay
/// testable without a live gateway.
pub struct CommandCtx<'a> {
    pub http: &'a Arc<Http>,
    pub config: &'a WardenConfig,
    pub audit: &'a AuditLog,
    pub invites: &'a InviteStore,
}

/// Build the guild slash command set.
pub fn build_commands() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("mute")
            .description("Time a member out for a number of minutes")
            .default_member_permissions(Permissions::MODERATE_MEMBERS)
            .add_option(
                CreateCommandOption::new(CommandOptionType::User, "member", "Member to mute")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "minutes",
                    "Timeout length in minutes",
                )
                .required(true)
                .min_int_value(1)
                .max_int_value(40320),
            ),
        CreateCommand::new("unmute")
            .description("Remove a member's timeout")
            .default_member_permissions(Permissions::MODERATE_MEMBERS)
            .add_option(
                CreateCommandOption::new(CommandOptionType::User, "member", "Member to unmute")
                    .required(true),
            ),
        CreateCommand::new("kick")
            .description("Kick a member from the server")
            .default_member_permissions(Permissions::KICK_MEMBERS)
            .add_option(
                CreateCommandOption::new(CommandOptionType::User, "member", "Member to kick")
                    .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::String,
                "reason",
                "Reason recorded in the audit log",
            )),
        CreateCommand::new("ban")
            .description("Ban a member from the server")
            .default_member_permissions(Permissions::BAN_MEMBERS)
            .add_option(
                CreateCommandOption::new(CommandOptionType::User, "member", "Member to ban")
                    .required(true),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::String,
                "reason",
                "Reason recorded in the audit log",
            )),
        CreateCommand::new("embed")
            .description("Send a pre-authored embed file to a channel")
            .default_member_permissions(Permissions::MANAGE_MESSAGES)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "Channel to send the embeds to",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "file",
                    "Embed file name (without .json)",
                )
                .required(true),
            ),
        CreateCommand::new("raw")
            .description("Send a raw components-v2 payload file to a channel")
            .default_member_permissions(Permissions::MANAGE_MESSAGES)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "Channel to send the payload to",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "file",
                    "Payload file name (without .json)",
                )
                .required(true),
            ),
        CreateCommand::new("invite")
            .description("Create an invite for this channel")
            .default_member_permissions(Permissions::CREATE_INSTANT_INVITE)
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "expiry", "Invite lifetime")
                    .required(true)
                    .add_string_choice("30 minutes", "30m")
                    .add_string_choice("1 hour", "1h")
                    .add_string_choice("6 hours", "6h")
                    .add_string_choice("12 hours", "12h")
                    .add_string_choice("1 day", "1d"),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::Integer, "uses", "Maximum uses")
                    .required(true)
                    .add_int_choice("1", 1)
                    .add_int_choice("5", 5)
                    .add_int_choice("10", 10)
                    .add_int_choice("25", 25)
                    .add_int_choice("50", 50)
                    .add_int_choice("100", 100),
            ),
        CreateCommand::new("invite_list")
            .description("List saved invites")
            .default_member_permissions(Permissions::CREATE_INSTANT_INVITE),
        CreateCommand::new("invite_remove")
            .description("Delete an invite and drop its saved record")
            .default_member_permissions(Permissions::CREATE_INSTANT_INVITE)
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "code", "Invite code")
                    .required(true),
            ),
        CreateCommand::new("sync")
            .description("Re-register the guild slash commands")
            .default_member_permissions(Permissions::ADMINISTRATOR),
        // User context commands carry no description.
        CreateCommand::new(CONTEXT_TIMEOUT_NAME)
            .kind(CommandType::User)
            .default_member_permissions(Permissions::MODERATE_MEMBERS),
    ]
}

/// Run the handler for an incoming slash command and send its one
/// response.
pub async fn dispatch(ctx: &Context, command: &CommandInteraction, cctx: &CommandCtx<'_>) {
    debug!(
        command = %command.data.name,
        user = %command.user.name,
        "slash command received"
    );

    if let Err(e) = command.defer_ephemeral(&ctx.http).await {
        warn!(
            command = %command.data.name,
            "failed to acknowledge slash command: {e}"
        );
        return;
    }

    let embed = match command.data.name.as_str() {
        "mute" => moderation::mute(cctx, command).await,
        "unmute" => moderation::unmute(cctx, command).await,
        "kick" => moderation::kick(cctx, command).await,
        "ban" => moderation::ban(cctx, command).await,
        "embed" => messages::send_embed(cctx, command).await,
        "raw" => messages::send_raw(cctx, command).await,
        "invite" => invite::create(cctx, command).await,
        "invite_list" => invite::list(cctx, command).await,
        "invite_remove" => invite::remove(cctx, command).await,
        "sync" => sync(cctx, command).await,
        CONTEXT_TIMEOUT_NAME => moderation::context_timeout(cctx, command).await,
        other => error_embed("Unknown command", format!("`/{other}` is not registered.")),
    };

    respond_ephemeral(ctx, command, embed).await;
}

/// `/sync`: re-register the guild command set without a restart.
async fn sync(cctx: &CommandCtx<'_>, command: &CommandInteraction) -> CreateEmbed {
    if !invoker_has(command, Permissions::ADMINISTRATOR) {
        return error_embed(
            "Permission denied",
            "Only administrators can use this command.",
        );
    }

    match cctx
        .config
        .guild_id
        .set_commands(cctx.http, build_commands())
        .await
    {
        Ok(synced) => {
            cctx.audit
                .log(
                    ActionCategory::Default,
                    &LogRecord::new(
                        "Sync executed",
                        format!(
                            "Author: <@{}>\nCommands synced: {}\nGuild: {}",
                            command.user.id,
                            synced.len(),
                            cctx.config.guild_id
                        ),
                        colors::INFO,
                    ),
                )
                .await;
            success_embed(
                "Sync complete",
                format!("**{}** commands were re-registered.", synced.len()),
            )
        },
        Err(e) => {
            cctx.audit
                .log(
                    ActionCategory::Default,
                    &LogRecord::new(
                        "Sync failed",
                        format!("Author: <@{}>\nError: {e}", command.user.id),
                        colors::ERROR,
                    ),
                )
                .await;
            error_embed("Sync failed", format!("```{e}```"))
        },
    }
}

/// Edit the deferred response, falling back to an ephemeral follow-up.
async fn respond_ephemeral(ctx: &Context, command: &CommandInteraction, embed: CreateEmbed) {
    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(embed.clone()))
        .await
    {
        warn!(
            command = %command.data.name,
            "failed to edit deferred slash response: {e}"
        );
        if let Err(followup_err) = command
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new()
                    .embed(embed)
                    .ephemeral(true),
            )
            .await
        {
            warn!(
                command = %command.data.name,
                "failed to send slash follow-up response: {followup_err}"
            );
        }
    }
}

// ── Handler helpers ──────────────────────────────────────────────────

/// Whether the invoking member holds the given permissions in the
/// interaction's channel.
pub(crate) fn invoker_has(command: &CommandInteraction, permissions: Permissions) -> bool {
    command
        .member
        .as_ref()
        .and_then(|m| m.permissions)
        .is_some_and(|p| p.contains(permissions))
}

fn option_value<'a>(command: &'a CommandInteraction, name: &str) -> Option<ResolvedValue<'a>> {
    command
        .data
        .options()
        .into_iter()
        .find(|option| option.name == name)
        .map(|option| option.value)
}

pub(crate) fn str_option<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    match option_value(command, name) {
        Some(ResolvedValue::String(value)) => Some(value),
        _ => None,
    }
}

pub(crate) fn int_option(command: &CommandInteraction, name: &str) -> Option<i64> {
    match option_value(command, name) {
        Some(ResolvedValue::Integer(value)) => Some(value),
        _ => None,
    }
}

pub(crate) fn user_option<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a User> {
    match option_value(command, name) {
        Some(ResolvedValue::User(user, _)) => Some(user),
        _ => None,
    }
}

pub(crate) fn channel_option(
    command: &CommandInteraction,
    name: &str,
) -> Option<serenity::all::ChannelId> {
    match option_value(command, name) {
        Some(ResolvedValue::Channel(channel)) => Some(channel.id),
        _ => None,
    }
}

pub(crate) fn response_embed(
    title: impl Into<String>,
    description: impl Into<String>,
    color: u32,
) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .color(color)
        .timestamp(Timestamp::now())
}

pub(crate) fn success_embed(
    title: impl Into<String>,
    description: impl Into<String>,
) -> CreateEmbed {
    response_embed(title, description, colors::SUCCESS)
}

pub(crate) fn error_embed(title: impl Into<String>, description: impl Into<String>) -> CreateEmbed {
    response_embed(title, description, colors::ERROR)
}
