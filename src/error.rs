//! Sigil error types

use std::time::Duration;

/// Sigil error types.
///
/// Resolution and verification never surface these to callers: a miss is
/// absorbed by the last-resort heuristic and a failed probe is reported as
/// `false`. Errors only escape from configuration and rule loading.
#[derive(Debug, thiserror::Error)]
pub enum SigilError {
    // Network errors (consumed as failed probe attempts)
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("reachability check timed out after {0:?}")]
    Timeout(Duration),

    #[error("remote asset unreachable (HTTP {status})")]
    Unreachable { status: u16 },

    // Rule table errors
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SigilError {
    /// Whether the error came from the network rather than from local data.
    ///
    /// The prober treats every failed attempt the same way, but this is
    /// what callers of [`ReachabilityCheck`](crate::probe::ReachabilityCheck)
    /// use to tell a flaky host from a broken configuration.
    pub fn is_transient(&self) -> bool {
        match self {
            SigilError::Http(_) | SigilError::Timeout(_) => true,
            SigilError::Unreachable { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SigilError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SigilError::Unreachable {
                status: status.as_u16(),
            }
        } else {
            SigilError::Http(err.to_string())
        }
    }
}

/// Result type alias for Sigil operations
pub type Result<T> = std::result::Result<T, SigilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_transient() {
        assert!(SigilError::Http("connection reset".into()).is_transient());
        assert!(SigilError::Timeout(Duration::from_secs(8)).is_transient());
        assert!(SigilError::Unreachable { status: 503 }.is_transient());
        assert!(SigilError::Unreachable { status: 429 }.is_transient());
    }

    #[test]
    fn client_and_config_errors_are_permanent() {
        assert!(!SigilError::Unreachable { status: 404 }.is_transient());
        assert!(!SigilError::InvalidRule("empty pattern".into()).is_transient());
        assert!(!SigilError::Configuration("bad".into()).is_transient());
    }

    #[test]
    fn display_includes_status() {
        let err = SigilError::Unreachable { status: 404 };
        assert_eq!(err.to_string(), "remote asset unreachable (HTTP 404)");
    }
}
