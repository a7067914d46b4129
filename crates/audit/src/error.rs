/// Errors raised by the audit transport layer.
///
/// These never escape the emitter or resolver; they exist so the
/// swallow-and-continue policy is explicit at the call sites instead of
/// incidental.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("audit channel: {0}")]
    Channel(String),

    #[error("audit send: {0}")]
    Send(String),
}
