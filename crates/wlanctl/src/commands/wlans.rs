//! WLAN profile command handlers.

use tabled::Tabled;
use wlanctl_core::{Controller, CoreError, WlanPsk, WlanRecord};

use crate::cli::{GlobalOpts, WlansArgs, WlansCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WlanRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ESSID")]
    essid: String,
    #[tabled(rename = "Opmode")]
    opmode: String,
    #[tabled(rename = "Min Rates")]
    min_rates: String,
    #[tabled(rename = "Roaming")]
    roaming: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Groups")]
    groups: String,
}

fn row(w: &WlanRecord, color: bool) -> WlanRow {
    let summary = w.summary();
    WlanRow {
        name: w.name.clone(),
        essid: w.broadcast_name().to_owned(),
        opmode: summary.key_management,
        min_rates: summary.min_basic_rates,
        roaming: summary.fast_roaming,
        zone: summary.zone,
        band: summary.rf_band,
        state: output::state_label(summary.enabled, color),
        groups: join_groups(w),
    }
}

fn join_groups(w: &WlanRecord) -> String {
    w.groups.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn detail(variants: &[WlanRecord]) -> String {
    let mut blocks = Vec::with_capacity(variants.len());
    for (i, w) in variants.iter().enumerate() {
        let summary = w.summary();
        let mut out = vec![
            format!("Variant:    {}/{}", i + 1, variants.len()),
            format!("Name:       {}", w.name),
            format!("ESSID:      {}", w.broadcast_name()),
            format!("Gateway:    {}", w.gateway_profile.as_deref().unwrap_or("-")),
            format!("MPSK pool:  {}", w.mpsk_pool_name().unwrap_or_else(|| "-".into())),
            format!("State:      {}", output::state_label(summary.enabled, false)),
            format!("Groups:     {}", join_groups(w)),
            "Body:".to_owned(),
        ];
        out.extend(w.lines.iter().map(|line| format!("  {line}")));
        blocks.push(out.join("\n"));
    }
    blocks.join("\n\n")
}

fn psk_detail(psk: &WlanPsk) -> String {
    [
        format!("WLAN:       {}", psk.wlan),
        format!("Group:      {}", psk.group),
        format!("ESSID:      {}", psk.essid),
        format!("Hidden:     {}", psk.hidden),
        format!("Passphrase: {}", psk.passphrase),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: WlansArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WlansCommand::List { scope, mpsk } => {
            let groups = util::resolve_groups(controller, scope.groups).await?;
            let snapshot = util::load_snapshot(controller, &groups, global).await?;
            let records: Vec<WlanRecord> = snapshot
                .catalog()
                .records()
                .filter(|w| !mpsk || w.is_mpsk_local())
                .cloned()
                .collect();
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &records,
                |w| row(w, color),
                |w| w.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WlansCommand::Show { name, scope } => {
            let groups = util::resolve_groups(controller, scope.groups).await?;
            let snapshot = util::load_snapshot(controller, &groups, global).await?;
            let variants = snapshot.catalog().variants(&name);
            if variants.is_empty() {
                return Err(CoreError::NotFound {
                    kind: "WLAN".into(),
                    name,
                }
                .into());
            }
            let out = output::render_single(&global.output, variants, detail, |v| {
                v.iter().map(join_groups).collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WlansCommand::Deploy { name, file, groups } => {
            let body = util::read_body_file(&file)?;
            util::require_confirmation(
                &format!("Deploy WLAN {name} to {} group(s)?", groups.len()),
                "wlans deploy",
                global.yes,
            )?;
            let mut snapshot = util::load_snapshot(controller, &groups, global).await?;
            let report = controller
                .deploy_wlan(&mut snapshot, &name, &body, &groups)
                .await?;
            let done = util::finish_report(global, "deploy WLAN", report)?;
            output::success(global, &format!("WLAN {name} deployed to {done} group(s)"));
            Ok(())
        }

        WlansCommand::Remove { name, groups } => {
            util::require_confirmation(
                &format!("Remove WLAN {name} from {} group(s)?", groups.len()),
                "wlans remove",
                global.yes,
            )?;
            let mut snapshot = util::load_snapshot(controller, &groups, global).await?;
            let report = controller.remove_wlan(&mut snapshot, &name, &groups).await?;
            let done = util::finish_report(global, "remove WLAN", report)?;
            output::success(global, &format!("WLAN {name} removed from {done} group(s)"));
            Ok(())
        }

        WlansCommand::Enable { name, scope } => {
            set_enabled(controller, global, name, scope.groups, true).await
        }

        WlansCommand::Disable { name, scope } => {
            set_enabled(controller, global, name, scope.groups, false).await
        }

        WlansCommand::Psk { name, group } => {
            let psk = controller.wlan_psk(&group, &name).await?;
            let out = output::render_single(&global.output, &psk, psk_detail, |p| {
                p.passphrase.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WlansCommand::SetPsk {
            name,
            group,
            passphrase,
        } => {
            let passphrase = util::passphrase_or_prompt(passphrase)?;
            util::require_confirmation(
                &format!("Replace the pre-shared key of WLAN {name} in group {group}?"),
                "wlans set-psk",
                global.yes,
            )?;
            controller.set_wlan_psk(&group, &name, &passphrase).await?;
            output::success(global, &format!("Pre-shared key of WLAN {name} updated in {group}"));
            Ok(())
        }

        WlansCommand::Qr { name, group } => {
            let psk = controller.wlan_psk(&group, &name).await?;
            output::print_output(&psk.wifi_qr_payload(), global.quiet);
            Ok(())
        }
    }
}

async fn set_enabled(
    controller: &Controller,
    global: &GlobalOpts,
    name: String,
    groups: Vec<String>,
    enabled: bool,
) -> Result<(), CliError> {
    let verb = if enabled { "enable" } else { "disable" };
    if !enabled {
        util::require_confirmation(&format!("Disable WLAN {name}?"), "wlans disable", global.yes)?;
    }
    let groups = util::resolve_groups(controller, groups).await?;
    let mut snapshot = util::load_snapshot(controller, &groups, global).await?;
    let report = controller
        .set_wlan_enabled(&mut snapshot, &name, enabled)
        .await?;
    if report.total() == 0 {
        output::success(global, &format!("WLAN {name} is already {verb}d"));
        return Ok(());
    }
    let done = util::finish_report(global, &format!("{verb} WLAN"), report)?;
    output::success(global, &format!("WLAN {name} {verb}d in {done} group(s)"));
    Ok(())
}
