//! Warden's Discord-facing layer.
//!
//! Registers guild slash commands, dispatches interactions to the command
//! handlers, and wires the audit subsystem to the gateway connection.
//! Every command presents exactly one ephemeral response to the invoker,
//! success or failure; audit logging happens after the fact and never
//! changes what the invoker sees.

pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod invite;
pub mod messages;
pub mod moderation;

pub use {
    config::{WardenConfig, WebhookConfig},
    error::Error,
    handler::{Handler, required_intents},
};
