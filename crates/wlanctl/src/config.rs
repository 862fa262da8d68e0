//! CLI configuration: thin wrapper around `wlanctl_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--base-url, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use wlanctl_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use wlanctl_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile: build from flags / env vars alone
    let url_str = global.base_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let token = global.token.clone().ok_or_else(|| CliError::NoCredentials {
        profile: profile_name.clone(),
    })?;

    let profile = Profile {
        base_url: url_str.to_owned(),
        ..Profile::default()
    };
    let mut config = ControllerConfig::new(
        wlanctl_config::parse_base_url(&profile.base_url)?,
        SecretString::from(token),
    );
    apply_overrides(&mut config, &profile, &cfg.defaults, global);
    Ok(config)
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    // 1. Base URL (flag > env > profile)
    let url_str = global.base_url.as_deref().unwrap_or(&profile.base_url);
    let url = wlanctl_config::parse_base_url(url_str)?;

    // 2. Token (flag > profile chain)
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => wlanctl_config::resolve_token(profile, profile_name)?,
    };

    let mut config = ControllerConfig::new(url, token);
    apply_overrides(&mut config, profile, defaults, global);
    Ok(config)
}

fn apply_overrides(
    config: &mut ControllerConfig,
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) {
    config.tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(defaults.timeout);
    config.timeout = Duration::from_secs(timeout);
    config.request_timeout = Duration::from_secs(
        profile
            .request_timeout
            .unwrap_or(defaults.request_timeout)
            .max(timeout),
    );
    config.fanout_width = profile.fanout_width.unwrap_or(defaults.fanout_width).max(1);
}
