use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    /// The input record lacks a field the card needs.
    #[error(transparent)]
    Record(#[from] netpulse_common::Error),

    #[error("invalid alert timestamp `{value}`: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("ambiguous or nonexistent local time `{0}`")]
    AmbiguousTime(String),

    #[error("a message carries at most {max} card attachment(s)")]
    TooManyAttachments { max: usize },
}

pub type Result<T> = std::result::Result<T, CardError>;
