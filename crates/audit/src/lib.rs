//! Dual-channel audit logging.
//!
//! Every moderation or message-dispatch action is mirrored into two
//! independent sinks: a named thread under a fixed log channel, and an
//! external webhook. Either sink may be missing or broken at any time;
//! audit logging is a side effect of user-facing commands and must never
//! fail the command that triggered it.

pub mod category;
#[cfg(test)]
pub(crate) mod testing;
pub mod emitter;
pub mod error;
pub mod record;
pub mod threads;
pub mod transport;

pub use {
    category::{ActionCategory, ThreadDirectory, WebhookDirectory},
    emitter::AuditLog,
    error::Error,
    record::{LogRecord, colors},
    threads::ThreadResolver,
    transport::{AuditTransport, DiscordTransport, ThreadInfo},
};
