// ── Core error types ──
//
// User-facing errors from wlanctl-core. Consumers never see HTTP statuses
// or JSON parse failures directly; the `From<wlanctl_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Platform faults ──────────────────────────────────────────────
    #[error("Platform temporarily unavailable: {reason}")]
    TransientServerFault { reason: String },

    #[error("Platform rejected the request: {description}")]
    ApplicationFault { description: String },

    #[error("Platform API rate limit reached")]
    RateLimited,

    #[error("Platform gateway unreachable (HTTP {status})")]
    GatewayUnreachable { status: u16 },

    #[error("Change not applied: {message}")]
    PushRejected { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Aggregate errors ─────────────────────────────────────────────
    #[error("{action}: {failed} of {total} targets failed")]
    PartialFailure {
        action: String,
        failed: usize,
        total: usize,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn not_found(kind: &str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.to_owned(),
            name: name.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Once observed during a fan-out, no further targets are started.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RateLimited | Self::GatewayUnreachable { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wlanctl_api::Error> for CoreError {
    fn from(err: wlanctl_api::Error) -> Self {
        match err {
            wlanctl_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wlanctl_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            wlanctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wlanctl_api::Error::CannotBeABase { url } => CoreError::Config {
                message: format!("Base URL cannot carry API paths: {url}"),
            },
            wlanctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            wlanctl_api::Error::ServerFault { reason } => CoreError::TransientServerFault { reason },
            wlanctl_api::Error::Application { description } => {
                CoreError::ApplicationFault { description }
            }
            wlanctl_api::Error::RateLimited => CoreError::RateLimited,
            wlanctl_api::Error::GatewayFault { status } => CoreError::GatewayUnreachable { status },
            wlanctl_api::Error::Rejected { message } => CoreError::PushRejected { message },
            wlanctl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_faults_map_to_domain_variants() {
        assert!(matches!(
            CoreError::from(wlanctl_api::Error::RateLimited),
            CoreError::RateLimited
        ));
        assert!(matches!(
            CoreError::from(wlanctl_api::Error::GatewayFault { status: 504 }),
            CoreError::GatewayUnreachable { status: 504 }
        ));
        assert!(matches!(
            CoreError::from(wlanctl_api::Error::ServerFault {
                reason: "Service Unavailable".into()
            }),
            CoreError::TransientServerFault { .. }
        ));
        assert!(matches!(
            CoreError::from(wlanctl_api::Error::Rejected {
                message: "no".into()
            }),
            CoreError::PushRejected { .. }
        ));
    }

    #[test]
    fn client_timeout_reports_configured_duration() {
        let err = CoreError::from(wlanctl_api::Error::Timeout { timeout_secs: 30 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 30 }));
        assert!(err.to_string().contains("30s"), "{err}");
    }

    #[test]
    fn only_rate_limit_and_gateway_are_terminal() {
        assert!(CoreError::RateLimited.is_terminal());
        assert!(CoreError::GatewayUnreachable { status: 502 }.is_terminal());
        assert!(
            !CoreError::TransientServerFault {
                reason: String::new()
            }
            .is_terminal()
        );
        assert!(!CoreError::validation("x").is_terminal());
    }
}
