use thiserror::Error;

/// Errors produced by the core crate
///
/// None of these reach the user as visible text: the session controller
/// logs them and degrades to `Idle`.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
