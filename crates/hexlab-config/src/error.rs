//! Configuration error types.

/// Errors that can occur when loading, saving, or parsing a world config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the world config file from disk.
    #[error("failed to read world config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the world config file to disk.
    #[error("failed to write world config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse world config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize the config to RON.
    #[error("failed to serialize world config: {0}")]
    SerializeError(#[source] ron::Error),
}
