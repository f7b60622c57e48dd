//! Unified error type for all observers.

use thiserror::Error;

/// Unified error type for rendering and emitting results.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// Error from the JSON observer.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing rendered output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_display() {
        let err = ObserverError::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "closed",
        ));
        assert_eq!(err.to_string(), "io error: closed");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_display() {
        let json_err = serde_json::from_str::<u64>("nope").unwrap_err();
        let err = ObserverError::from(json_err);
        assert!(err.to_string().starts_with("json error: "));
    }
}
