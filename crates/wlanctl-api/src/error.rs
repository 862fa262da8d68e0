use thiserror::Error;

/// Top-level error type for the `wlanctl-api` crate.
///
/// Covers transport failures plus every response shape the platform uses
/// to report a fault. `wlanctl-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request exceeded the client's configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for API requests: {url}")]
    CannotBeABase { url: String },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Platform faults ─────────────────────────────────────────────
    /// HTTP 503: the platform is temporarily unable to serve the request.
    #[error("Server fault: {reason}")]
    ServerFault { reason: String },

    /// The platform rejected the request with an application error payload.
    #[error("Application error: {description}")]
    Application { description: String },

    /// HTTP 429: API rate limit exceeded.
    #[error("Rate limited by the platform API")]
    RateLimited,

    /// HTTP 502/504 from the platform's front door.
    #[error("Gateway fault (HTTP {status})")]
    GatewayFault { status: u16 },

    /// The request completed but the platform did not confirm the change.
    #[error("Change rejected: {message}")]
    Rejected { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if retrying the same request later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. }
            | Self::ServerFault { .. }
            | Self::RateLimited | Self::GatewayFault { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if a multi-target action should stop starting new requests.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RateLimited | Self::GatewayFault { .. })
    }
}
