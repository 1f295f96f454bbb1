//! Error types for the gladiator crate

use thiserror::Error;

/// Main error type for the gladiator crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no actions are registered")]
    EmptyActionSet,

    #[error("action index {index} is out of range ({count} actions registered)")]
    ActionOutOfRange { index: usize, count: usize },

    #[error("malformed save data: {reason}")]
    MalformedSave { reason: String },

    #[error("match is over")]
    MatchOver,

    #[error("previous turn has not been settled yet")]
    SettlePending,

    #[error("no turn is waiting to be settled")]
    NoPendingSettle,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
