//! MPSK pool command handlers.

use std::path::Path;

use tabled::Tabled;
use wlanctl_core::{
    Controller, CoreError, ImportMode, MAX_POOL_ENTRIES, MpskEntry, MpskSelector, WlanRecord,
};

use crate::cli::{GlobalOpts, ImportModeArg, MpskArgs, MpskCommand, MpskTarget};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MpskWlanRow {
    #[tabled(rename = "WLAN")]
    name: String,
    #[tabled(rename = "ESSID")]
    essid: String,
    #[tabled(rename = "Pool")]
    pool: String,
    #[tabled(rename = "Gateway Profile")]
    gateway_profile: String,
}

impl From<&WlanRecord> for MpskWlanRow {
    fn from(w: &WlanRecord) -> Self {
        Self {
            name: w.name.clone(),
            essid: w.broadcast_name().to_owned(),
            pool: w.mpsk_pool_name().unwrap_or_else(|| "-".into()),
            gateway_profile: w.gateway_profile.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Passphrase")]
    passphrase: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<ImportModeArg> for ImportMode {
    fn from(mode: ImportModeArg) -> Self {
        match mode {
            ImportModeArg::Add => ImportMode::AddAndUpdate,
            ImportModeArg::Replace => ImportMode::ReplaceAll,
        }
    }
}

/// Entries from a JSON or YAML list, chosen by file extension.
fn read_entries(path: &Path) -> Result<Vec<MpskEntry>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(&contents)?)
    } else {
        Ok(serde_json::from_str(&contents)?)
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    controller: &Controller,
    args: MpskArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MpskCommand::List { group, wlan: None } => {
            let session = controller.open_session(&group).await?;
            let wlans: Vec<WlanRecord> = session.records().wlans().cloned().collect();
            let out = output::render_list(
                &global.output,
                &wlans,
                |w| MpskWlanRow::from(w),
                |w| w.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MpskCommand::List {
            group,
            wlan: Some(wlan),
        } => {
            let session = controller.open_session(&group).await?;
            let (_, pool) = session.mpsk_wlan(&wlan)?;
            let entries: Vec<MpskEntry> = pool.entries().cloned().collect();
            let out = output::render_list(
                &global.output,
                &entries,
                |e| EntryRow {
                    index: pool.position(&e.name).unwrap_or_default(),
                    name: e.name.clone(),
                    passphrase: e.passphrase.clone(),
                    role: e.role.clone(),
                },
                |e| e.name.clone(),
            );
            output::print_output(&out, global.quiet);
            if !global.quiet && matches!(global.output, crate::cli::OutputFormat::Table) {
                eprintln!("{}/{MAX_POOL_ENTRIES} entries in pool {}", pool.len(), pool.name);
            }
            Ok(())
        }

        MpskCommand::Add {
            target: MpskTarget { group, wlan },
            name,
            passphrase,
            role,
        } => {
            let passphrase = util::passphrase_or_prompt(passphrase)?;
            let role = role.unwrap_or_else(|| wlan.clone());
            let entry = MpskEntry::new(name, passphrase, role)?;
            let entry_name = entry.name.clone();

            let mut session = controller.open_session(&group).await?;
            controller.add_mpsk(&mut session, &wlan, entry).await?;
            output::success(global, &format!("MPSK {entry_name} added to {wlan} in {group}"));
            Ok(())
        }

        MpskCommand::Update {
            target: MpskTarget { group, wlan },
            name,
            passphrase,
        } => {
            let passphrase = util::passphrase_or_prompt(passphrase)?;
            let mut session = controller.open_session(&group).await?;
            controller
                .update_mpsk(&mut session, &wlan, &name, &passphrase)
                .await?;
            output::success(global, &format!("Passphrase of {name} updated"));
            Ok(())
        }

        MpskCommand::Remove {
            target: MpskTarget { group, wlan },
            name,
            index,
        } => {
            let selector = match (name, index) {
                (Some(name), _) => MpskSelector::Name(name),
                (None, Some(index)) => MpskSelector::Index(index),
                (None, None) => {
                    return Err(CliError::Validation {
                        field: "name".into(),
                        reason: "give an entry name or --index".into(),
                    });
                }
            };
            let label = match selector {
                MpskSelector::Name(ref name) => name.clone(),
                MpskSelector::Index(index) => format!("#{index}"),
            };
            util::require_confirmation(
                &format!("Remove MPSK {label} from {wlan} in {group}?"),
                "mpsk remove",
                global.yes,
            )?;

            let mut session = controller.open_session(&group).await?;
            let removed = controller.remove_mpsk(&mut session, &wlan, &selector).await?;
            output::success(global, &format!("MPSK {} removed", removed.name));
            Ok(())
        }

        MpskCommand::Import {
            target: MpskTarget { group, wlan },
            file,
            mode,
        } => {
            let entries = read_entries(&file)?;
            let mode = ImportMode::from(mode);
            if mode == ImportMode::ReplaceAll {
                util::require_confirmation(
                    &format!("Replace the whole pool of {wlan} in {group}?"),
                    "mpsk import",
                    global.yes,
                )?;
            }

            let mut session = controller.open_session(&group).await?;
            let summary = controller
                .import_mpsks(&mut session, &wlan, entries, mode)
                .await?;
            for (name, reason) in &summary.rejected {
                output::warning(global, &format!("{name}: {reason}"));
            }
            let out = output::render_single(
                &global.output,
                &summary,
                |s| {
                    format!(
                        "Added:    {}\nUpdated:  {}\nRemoved:  {}\nRejected: {}",
                        s.added.len(),
                        s.updated.len(),
                        s.removed.len(),
                        s.rejected.len()
                    )
                },
                |s| s.added.join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MpskCommand::Qr {
            target: MpskTarget { group, wlan },
            name,
            passphrase,
        } => {
            let session = controller.open_session(&group).await?;
            let (record, pool) = session.mpsk_wlan(&wlan)?;
            let entry = pool.get(&name).ok_or_else(|| CoreError::NotFound {
                kind: "MPSK".into(),
                name: format!("{name} in pool {}", pool.name),
            })?;
            let passphrase = match passphrase {
                Some(passphrase) => passphrase,
                None if entry.is_redacted() => {
                    return Err(CliError::Validation {
                        field: "passphrase".into(),
                        reason: "the stored passphrase is redacted; pass --passphrase".into(),
                    });
                }
                None => entry.passphrase.clone(),
            };
            output::print_output(&record.wifi_qr_payload(&passphrase), global.quiet);
            Ok(())
        }
    }
}
