/// Core error types for the scrollreel engine.

/// A specialized Result type for scrollreel operations.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error type encompassing all scrollreel subsystems.
#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    #[error("frame index {index} out of range [1, {total}]")]
    OutOfRange { index: i64, total: u32 },

    #[error("failed to load frame {index}: {message}")]
    Load { index: u32, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl ReelError {
    /// Create an out-of-range error for a frame index.
    pub fn out_of_range(index: impl Into<i64>, total: u32) -> Self {
        ReelError::OutOfRange {
            index: index.into(),
            total,
        }
    }

    /// Create a load failure for one frame.
    pub fn load(index: u32, message: impl Into<String>) -> Self {
        ReelError::Load {
            index,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ReelError::Config(message.into())
    }
}
