//! Error types for devfinder core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Backend (REST) errors.
///
/// Cloneable so a failure can be both recorded in component state and
/// handed back to the caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// Whether the backend answered with 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Http { status: 404, .. })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Config not found: {0}")]
    NotFound(String),
}

/// Tab storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access storage directory: {0}")]
    DirectoryAccess(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Http {
            url: "http://localhost/devices/7".to_string(),
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "HTTP 404 from http://localhost/devices/7: not found"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_core_error_from_transport_error() {
        let err: CoreError = TransportError::InvalidUrl("::".to_string()).into();
        assert!(format!("{}", err).contains("Invalid URL"));
    }

    #[test]
    fn test_core_error_from_storage_error() {
        let err: CoreError = StorageError::InvalidName("../tab".to_string()).into();
        assert!(matches!(err, CoreError::Storage(StorageError::InvalidName(_))));
    }
}
