//! Application error types

use app_client::ClientError;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (notify user, continue) =====
    #[error("Server request failed: {0}")]
    Client(#[from] ClientError),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Index {index} out of range for catalog of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Fatal Errors (application termination) =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Client(_)
                | AppError::ImageDecode(_)
                | AppError::IndexOutOfRange { .. }
                | AppError::Io(_)
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Client(ClientError::Status { status, .. }) => {
                format!("The cache server answered with status {}", status)
            }
            AppError::Client(ClientError::Transport(_)) => {
                "Cannot reach the cache server".to_string()
            }
            AppError::ImageDecode(msg) => format!("Cannot load image: {}", msg),
            _ => self.to_string(),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::ImageDecode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let status = AppError::Client(ClientError::Status {
            status: 500,
            endpoint: "/images".into(),
        });
        assert!(status.is_recoverable());
        assert_eq!(status.user_message(), "The cache server answered with status 500");

        assert!(AppError::Config("bad toml".into()).is_fatal());
        assert!(AppError::IndexOutOfRange { index: 3, len: 2 }.is_recoverable());
    }
}
