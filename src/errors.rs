use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaqRagError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Embedding model unavailable or input rejected.
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Connection, query, constraint or timeout failure in the record store.
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FaqRagError {
    /// Errors that can only be handled by stopping the process.
    ///
    /// Embedding and storage failures are recoverable per request or per
    /// record; they only become fatal when raised during startup, which the
    /// caller knows from context.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigError(_))
    }
}

impl From<sqlx::Error> for FaqRagError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<config::ConfigError> for FaqRagError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FaqRagError>;
