//! Pre-dispatch validation for operator-authored message payloads.
//!
//! Two deliberately separate schemas: `validate_message` covers the raw
//! components-v2 message shape sent straight through the REST API, and
//! `validate_embed_document` covers the embed-document shape consumed by
//! the embed-sending flow. They look alike but validate different
//! message-composition APIs and must not be unified.

pub mod components;
pub mod embeds;
pub mod error;

pub use {
    components::{ComponentKind, validate_message},
    embeds::validate_embed_document,
    error::ValidationError,
};
