//! Per-call metadata.

use std::time::Duration;

/// Default per-call timeout applied when none is set explicitly.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Metadata attached to a single RPC call.
///
/// The timeout is the only cancellation mechanism the transport supports: it
/// becomes the underlying HTTP request's timeout, and expiry surfaces as
/// [`TransportError::TimedOut`](crate::TransportError::TimedOut).
#[derive(Debug, Clone)]
pub struct CallContext {
    /// How long the call may take end to end.
    pub timeout: Duration,
}

impl CallContext {
    /// Create a context with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a context with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(CallContext::new().timeout, Duration::from_secs(5));
        assert_eq!(CallContext::default().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_explicit_timeout() {
        let ctx = CallContext::with_timeout(Duration::from_millis(250));
        assert_eq!(ctx.timeout, Duration::from_millis(250));
    }
}
