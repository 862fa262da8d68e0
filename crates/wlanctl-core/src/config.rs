// ── Runtime connection configuration ──
//
// These types describe how to reach the management platform and how wide
// multi-group actions may fan out. They carry credential data but never
// touch disk. The CLI constructs a `ControllerConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default number of concurrent requests in a fan-out.
pub const DEFAULT_FANOUT_WIDTH: usize = 4;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for the public platform.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

/// Configuration for talking to one platform account.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// API gateway URL (e.g., `https://apigw-prod2.central.arubanetworks.com`).
    pub url: Url,
    /// Bearer access token.
    pub token: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Whole-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Upper bound for a single fan-out target.
    pub request_timeout: Duration,
    /// Maximum concurrent requests during a fan-out.
    pub fanout_width: usize,
}

impl ControllerConfig {
    pub fn new(url: Url, token: SecretString) -> Self {
        Self {
            url,
            token,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            fanout_width: DEFAULT_FANOUT_WIDTH,
        }
    }
}

impl TlsVerification {
    pub(crate) fn to_tls_mode(&self) -> wlanctl_api::TlsMode {
        match self {
            Self::SystemDefaults => wlanctl_api::TlsMode::System,
            Self::CustomCa(path) => wlanctl_api::TlsMode::CustomCa(path.clone()),
            Self::DangerAcceptInvalid => wlanctl_api::TlsMode::DangerAcceptInvalid,
        }
    }
}
