//! Error types for SamayaAlign

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// SamayaAlign error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record line had the right token count but a token failed numeric parsing
    #[error("Line {line}: invalid numeric token '{token}'")]
    Format {
        /// 1-based line number in the source file
        line: usize,
        /// The token that failed to parse
        token: String,
    },

    /// An operation required a non-empty trajectory
    #[error("Empty trajectory: {0}")]
    EmptyTrajectory(&'static str),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
