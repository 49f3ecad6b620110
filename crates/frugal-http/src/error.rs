//! Transport error taxonomy.
//!
//! Client-side failures are typed so callers can decide retry policy; the
//! transport itself never retries. Server-side failures are expressed only
//! as HTTP status codes and never reach this type.

use thiserror::Error;

/// Typed error returned by the client transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Outbound payload exceeds the configured request size limit. Raised
    /// before any network call is made.
    #[error("request payload of {size} bytes exceeds limit of {limit} bytes")]
    RequestTooLarge { size: usize, limit: usize },

    /// The server reported the response would exceed the advertised limit.
    #[error("response was too large")]
    ResponseTooLarge,

    /// The HTTP call exceeded the per-call timeout.
    #[error("request timed out")]
    TimedOut,

    /// Any other HTTP or framing failure.
    #[error("{0}")]
    Unknown(String),
}

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::TimedOut
        } else {
            TransportError::Unknown(format!("http request failed: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransportError::RequestTooLarge {
            size: 11,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "request payload of 11 bytes exceeds limit of 10 bytes"
        );
        assert_eq!(
            TransportError::ResponseTooLarge.to_string(),
            "response was too large"
        );
        assert_eq!(TransportError::TimedOut.to_string(), "request timed out");
    }

    #[test]
    fn test_unknown_carries_message() {
        let err = TransportError::Unknown("invalid frame size".to_string());
        assert_eq!(err.to_string(), "invalid frame size");
    }
}
