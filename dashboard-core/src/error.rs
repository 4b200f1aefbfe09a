//! Error types for the dashboard

use std::path::Path;
use thiserror::Error;

/// Dashboard-wide error type
///
/// `NotFound` is kept apart from every other failure so callers can decide
/// per resource whether a missing file degrades to an empty result or fails
/// the request.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error ({path}): {message}")]
    Decode { path: String, message: String },

    #[error("I/O error ({path}): {message}")]
    Io { path: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DashboardError {
    pub fn decode(path: impl AsRef<Path>, message: impl ToString) -> Self {
        DashboardError::Decode {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        DashboardError::InvalidInput(msg.into())
    }

    /// Classify a failure to open or read `path`
    pub fn from_io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        let path = path.as_ref().display().to_string();
        if err.kind() == std::io::ErrorKind::NotFound {
            DashboardError::NotFound(path)
        } else {
            DashboardError::Io {
                path,
                message: err.to_string(),
            }
        }
    }

    /// Whether the underlying resource is simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::NotFound(_))
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
