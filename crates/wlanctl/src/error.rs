//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use wlanctl_config::ConfigError;
use wlanctl_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(wlanctl::connection_failed),
        help(
            "Check the base URL of your profile and your network access.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Platform unavailable: {reason}")]
    #[diagnostic(
        code(wlanctl::platform_unavailable),
        help("The platform reported a temporary fault. Retry in a moment.")
    )]
    Unavailable { reason: String },

    #[error("API rate limit reached")]
    #[diagnostic(
        code(wlanctl::rate_limited),
        help("The account exhausted its API quota. Wait before retrying.")
    )]
    RateLimited,

    #[error("Platform gateway unreachable (HTTP {status})")]
    #[diagnostic(code(wlanctl::gateway_unreachable))]
    GatewayUnreachable { status: u16 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(wlanctl::no_credentials),
        help(
            "Store one with: wlanctl config set-token {profile}\n\
             Or set the WLANCTL_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(wlanctl::not_found),
        help("Run: wlanctl {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Platform responses ───────────────────────────────────────────
    #[error("Platform rejected the request: {message}")]
    #[diagnostic(code(wlanctl::rejected))]
    Rejected { message: String },

    #[error("{action}: {failed} of {total} groups failed")]
    #[diagnostic(
        code(wlanctl::partial_failure),
        help("Successful groups keep the change; rerun for the failed ones.")
    )]
    PartialFailure {
        action: String,
        failed: usize,
        total: usize,
    },

    #[error("API error: {message}")]
    #[diagnostic(code(wlanctl::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wlanctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wlanctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wlanctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(wlanctl::no_config),
        help(
            "Create one with: wlanctl config init\n\
             Expected at: {path}\n\
             Or pass --base-url and --token."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(wlanctl::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' was not confirmed")]
    #[diagnostic(
        code(wlanctl::not_confirmed),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NotConfirmed { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(wlanctl::timeout),
        help("Increase the timeout with --timeout or in the profile.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(wlanctl::json), help("Check the file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML payload: {0}")]
    #[diagnostic(code(wlanctl::yaml), help("Check the file contents and try again."))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. }
            | Self::Unavailable { .. }
            | Self::RateLimited
            | Self::GatewayUnreachable { .. } => exit_code::CONNECTION,
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::PartialFailure { .. } => exit_code::PARTIAL,
            Self::Validation { .. } | Self::NotConfirmed { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

fn list_command_for(kind: &str) -> String {
    match kind {
        "group" => "groups list".into(),
        "user role" => "roles list --group <GROUP>".into(),
        "MPSK WLAN" | "MPSK" | "MPSK pool" => "mpsk list --group <GROUP>".into(),
        _ => "wlans list".into(),
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TransientServerFault { reason } => CliError::Unavailable { reason },
            CoreError::ApplicationFault { description } => CliError::Rejected {
                message: description,
            },
            CoreError::RateLimited => CliError::RateLimited,
            CoreError::GatewayUnreachable { status } => CliError::GatewayUnreachable { status },
            CoreError::PushRejected { message } => CliError::Rejected { message },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound { kind, name } => CliError::NotFound {
                list_command: list_command_for(&kind),
                resource_type: kind,
                identifier: name,
            },
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::PartialFailure {
                action,
                failed,
                total,
            } => CliError::PartialFailure {
                action,
                failed,
                total,
            },
            CoreError::Api { message, status: _ }
            | CoreError::Config { message }
            | CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::from(ConfigError::from(err))
    }
}
