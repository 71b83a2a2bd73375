use std::path::PathBuf;

/// Errors that can occur while loading or saving INI data.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ROM database not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error("Config file has no path to save to")]
    NoPath,

    #[error("Unknown ambiguity policy: {0}")]
    UnknownPolicy(String),
}

impl DbError {
    pub fn unknown_policy(msg: impl Into<String>) -> Self {
        Self::UnknownPolicy(msg.into())
    }
}
