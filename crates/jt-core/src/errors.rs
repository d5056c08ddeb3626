use std::path::PathBuf;

/// Unified error type for topic resolution.
#[derive(Debug, thiserror::Error)]
pub enum TopicError {
    /// The topic directive string could not be parsed. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The identity lookup has no record of the given job or action id.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("config not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
