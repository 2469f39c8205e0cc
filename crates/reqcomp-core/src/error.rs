//! Error types for reqcomp

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for reqcomp
///
/// Only the binding layer produces these. The settings type itself is total.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value under a configuration prefix had the wrong shape or type
    #[error("Failed to bind '{prefix}': {message}")]
    Binding {
        /// Configuration prefix being bound
        prefix: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a binding error
    pub fn binding(prefix: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Binding {
            prefix: prefix.into(),
            message: message.into(),
        }
    }
}
