use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Library operation failed
    #[error("{0}")]
    Lib(#[from] mupen_front_lib::LibError),

    /// ROM database could not be used
    #[error("Database error: {0}")]
    Database(String),

    /// Header analysis failed
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
