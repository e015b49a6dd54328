use thiserror::Error;

/// prodtrack error types
#[derive(Error, Debug)]
pub enum ProdtrackError {
    /// Record source (Firestore, local files) failed
    #[error("source error: {0}")]
    Source(String),

    /// Failed to parse JSON or a stored document
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ProdtrackError {
    fn from(err: reqwest::Error) -> Self {
        ProdtrackError::Source(err.to_string())
    }
}

/// Result type alias for prodtrack
pub type Result<T> = std::result::Result<T, ProdtrackError>;
