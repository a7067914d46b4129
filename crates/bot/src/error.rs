/// Errors raised while handling a command.
///
/// Validation errors reach the invoking user verbatim; API errors are
/// surfaced only when the failed call was the command's primary action.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read `{path}`: {reason}")]
    PayloadFile { path: String, reason: String },

    #[error(transparent)]
    Validation(#[from] warden_payload::ValidationError),

    #[error("discord api: {0}")]
    Api(#[from] serenity::Error),

    #[error("missing `{0}` option")]
    MissingOption(&'static str),

    #[error("invalid duration")]
    InvalidDuration,
}

pub type Result<T> = std::result::Result<T, Error>;
