//! Shared helpers for command handlers.

use std::path::Path;

use wlanctl_core::{Controller, FanOutReport, GroupSnapshot, REDACTED_PASSPHRASE};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Confirm or fail with `NotConfirmed`.
pub fn require_confirmation(message: &str, action: &str, yes_flag: bool) -> Result<(), CliError> {
    if confirm(message, yes_flag)? {
        Ok(())
    } else {
        Err(CliError::NotConfirmed {
            action: action.into(),
        })
    }
}

/// Passphrase from the flag, or prompted for without echo.
pub fn passphrase_or_prompt(flag: Option<String>) -> Result<String, CliError> {
    if let Some(passphrase) = flag {
        return Ok(passphrase);
    }
    let passphrase = rpassword::prompt_password("Passphrase: ")?;
    if passphrase.is_empty() || passphrase == REDACTED_PASSPHRASE {
        return Err(CliError::Validation {
            field: "passphrase".into(),
            reason: "enter a new, non-empty passphrase".into(),
        });
    }
    Ok(passphrase)
}

/// Non-empty lines of a profile body file.
pub fn read_body_file(path: &Path) -> Result<Vec<String>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Lines of a whole-group configuration file, indentation kept.
pub fn read_config_file(path: &Path) -> Result<Vec<String>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_owned).collect())
}

/// Requested groups, or every group of the account when none were given.
pub async fn resolve_groups(
    controller: &Controller,
    requested: Vec<String>,
) -> Result<Vec<String>, CliError> {
    if requested.is_empty() {
        Ok(controller.list_groups().await?)
    } else {
        Ok(requested)
    }
}

/// Fetch `groups` behind a spinner; groups that failed to load are reported.
pub async fn load_snapshot(
    controller: &Controller,
    groups: &[String],
    global: &GlobalOpts,
) -> Result<GroupSnapshot, CliError> {
    let bar = output::spinner(global, format!("Fetching {} groups", groups.len()));
    let result = controller.load_groups(groups).await;
    bar.finish_and_clear();

    let (snapshot, failures) = result?;
    for (group, err) in &failures.failed {
        output::warning(global, &format!("skipped group {group}: {err}"));
    }
    Ok(snapshot)
}

/// Print per-group failures, then collapse the report.
pub fn finish_report(
    global: &GlobalOpts,
    action: &str,
    report: FanOutReport,
) -> Result<usize, CliError> {
    for (group, err) in &report.failed {
        output::warning(global, &format!("{group}: {err}"));
    }
    for group in &report.skipped {
        output::warning(global, &format!("{group}: not attempted"));
    }
    Ok(report.into_result(action)?.len())
}
