use thiserror::Error;

/// warstatus error types
#[derive(Error, Debug)]
pub enum WarStatusError {
    /// Upstream answered with a non-2xx status
    #[error("network error: {endpoint} returned HTTP {status}")]
    Network { endpoint: String, status: u16 },

    /// Connection failure, timeout, or unreadable body
    #[error("transport error: {0}")]
    Transport(String),

    /// Defect in the snapshot pipeline itself (not an endpoint failure)
    #[error("orchestration error: {0}")]
    Orchestration(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WarStatusError {
    /// HTTP status carried by a `Network` error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for warstatus
pub type Result<T> = std::result::Result<T, WarStatusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_display() {
        let err = WarStatusError::Network {
            endpoint: "/v1/war".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "network error: /v1/war returned HTTP 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = WarStatusError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WarStatusError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
