//! Error types for the youloader library.

use thiserror::Error;

/// Errors that can occur while prompting for, resolving or downloading videos.
#[derive(Error, Debug)]
pub enum Error {
    /// User input was rejected (bad or non-YouTube URL).
    #[error("{0}")]
    InvalidInput(String),

    /// No matching stream, or a playlist with no videos.
    #[error("{0}")]
    NotFound(String),

    /// Resolution or transfer failed inside the video source.
    #[error("Download failed: {0}")]
    Transfer(String),

    /// The user aborted the session.
    #[error("Aborted by user")]
    Cancelled,

    /// A video reported a non-positive duration.
    #[error("Duration must be a positive number of seconds, got {0}")]
    InvalidDuration(i64),

    /// An external program the video source relies on is missing.
    #[error("Required program not found: {0}")]
    DependencyNotFound(String),

    /// The configuration file could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error during file or process operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The coarse classes of failure the user-facing flow distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Re-prompt the user.
    InvalidInput,
    /// Report and end the current operation.
    NotFound,
    /// Report and end the current operation.
    TransferFailure,
    /// Abort the process immediately.
    UserCancelled,
}

impl Error {
    /// Returns the class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::Config(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Cancelled => ErrorKind::UserCancelled,
            Self::Transfer(_)
            | Self::InvalidDuration(_)
            | Self::DependencyNotFound(_)
            | Self::Io(_) => ErrorKind::TransferFailure,
        }
    }
}

/// A specialized `Result` type for youloader operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_propagation_classes() {
        assert_eq!(
            Error::InvalidInput("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(Error::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(Error::Cancelled.kind(), ErrorKind::UserCancelled);
        assert_eq!(
            Error::InvalidDuration(0).kind(),
            ErrorKind::TransferFailure
        );
        let io = std::io::Error::other("boom");
        assert_eq!(Error::from(io).kind(), ErrorKind::TransferFailure);
    }

    #[test]
    fn input_errors_display_bare_message() {
        let err = Error::InvalidInput("Invalid URL".into());
        assert_eq!(err.to_string(), "Invalid URL");
    }
}
