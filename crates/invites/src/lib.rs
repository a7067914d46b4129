//! Flat-file store for active invite metadata.
//!
//! One JSON object keyed by invite code, rewritten wholesale on every
//! mutation. Reads never fail: a missing, empty, or corrupt file yields an
//! empty map, trading recovery of a low-stakes transient log for the
//! guarantee that invite commands always run.

pub mod store;

pub use store::{InviteRecord, InviteStore, StoreError};
