use thiserror::Error;

use mupen_front_db::DbError;

/// Errors raised by library operations (scanning, profiles, downloads).
#[derive(Debug, Error)]
pub enum LibError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Profile '{0}' is built in and cannot be modified")]
    ReadOnlyProfile(String),

    #[error("{0}")]
    Other(String),
}

impl LibError {
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
