// ── Controller ──
//
// Orchestrates every fetch → decode → edit → encode → push sequence.
// Single-group MPSK edits run against a `Session`; multi-group WLAN edits
// run against a `GroupSnapshot`. Documents are only replaced after the
// platform confirmed the push, so a failed push leaves local state as the
// platform still has it.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, info, warn};
use wlanctl_api::{CentralClient, TransportConfig};

use crate::backend::CentralBackend;
use crate::block::{self, BlockKind};
use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::fanout::{FanOut, FanOutReport};
use crate::gateway::{self, GatewayChange};
use crate::model::{
    ConfigDocument, ImportMode, ImportSummary, MpskEntry, MpskPool, REDACTED_PASSPHRASE, UserRole,
    WlanPsk, WlanRecord,
};
use crate::session::Session;
use crate::store::WlanCatalog;

/// How to pick the MPSK entry to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MpskSelector {
    /// Position in the pool as listed (zero-based).
    Index(usize),
    Name(String),
}

/// Documents of several groups plus the WLAN catalog built from them.
#[derive(Debug, Clone, Default)]
pub struct GroupSnapshot {
    documents: IndexMap<String, ConfigDocument>,
    catalog: WlanCatalog,
}

impl GroupSnapshot {
    pub fn from_documents(documents: impl IntoIterator<Item = ConfigDocument>) -> Self {
        let documents: IndexMap<_, _> = documents
            .into_iter()
            .map(|doc| (doc.group().to_owned(), doc))
            .collect();
        let catalog = WlanCatalog::from_documents(documents.values());
        Self { documents, catalog }
    }

    pub fn catalog(&self) -> &WlanCatalog {
        &self.catalog
    }

    pub fn document(&self, group: &str) -> Option<&ConfigDocument> {
        self.documents.get(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    fn require(&self, group: &str) -> Result<&ConfigDocument, CoreError> {
        self.document(group)
            .ok_or_else(|| CoreError::not_found("group", group))
    }

    fn commit(&mut self, accepted: Vec<(String, ConfigDocument)>) {
        for (group, document) in accepted {
            self.documents.insert(group, document);
        }
        self.catalog = WlanCatalog::from_documents(self.documents.values());
    }
}

pub struct Controller<B = CentralClient> {
    backend: B,
    fanout: FanOut,
}

impl Controller<CentralClient> {
    /// Build a controller talking to the platform described by `config`.
    pub fn new(config: &ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config.tls.to_tls_mode(),
            timeout: config.timeout,
        };
        let client = CentralClient::new(config.url.clone(), config.token.clone(), &transport)?;
        Ok(Self::with_backend(
            client,
            FanOut::new(config.fanout_width, config.request_timeout),
        ))
    }
}

impl<B: CentralBackend> Controller<B> {
    pub fn with_backend(backend: B, fanout: FanOut) -> Self {
        Self { backend, fanout }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ── Groups ───────────────────────────────────────────────────────

    pub async fn list_groups(&self) -> Result<Vec<String>, CoreError> {
        self.backend.list_groups().await
    }

    pub async fn fetch_document(&self, group: &str) -> Result<ConfigDocument, CoreError> {
        let lines = self.backend.fetch_group_config(group).await?;
        debug!(group, lines = lines.len(), "fetched group configuration");
        Ok(ConfigDocument::new(group, lines))
    }

    /// Fetch a group and decode its records.
    pub async fn open_session(&self, group: &str) -> Result<Session, CoreError> {
        Ok(Session::new(self.fetch_document(group).await?))
    }

    /// Fetch several groups concurrently.
    ///
    /// Groups that fail to load are reported and left out of the snapshot;
    /// a terminal error (rate limit, unreachable gateway) fails the load.
    pub async fn load_groups(
        &self,
        groups: &[String],
    ) -> Result<(GroupSnapshot, FanOutReport), CoreError> {
        let mut report = self
            .fanout
            .run(groups.to_vec(), |group| async move { self.fetch_document(&group).await })
            .await;
        if let Some(pos) = report.failed.iter().position(|(_, e)| e.is_terminal()) {
            return Err(report.failed.swap_remove(pos).1);
        }

        let mut fetched: IndexMap<String, ConfigDocument> =
            std::mem::take(&mut report.succeeded).into_iter().collect();
        let ordered = groups.iter().filter_map(|g| fetched.shift_remove(g));
        let snapshot = GroupSnapshot::from_documents(ordered.collect::<Vec<_>>());
        Ok((snapshot, report.discard_values()))
    }

    // ── WLAN profiles across groups ──────────────────────────────────

    /// Patch `name` with `body` (unindented lines) into every group in
    /// `groups` and push each one.
    pub async fn deploy_wlan(
        &self,
        snapshot: &mut GroupSnapshot,
        name: &str,
        body: &[String],
        groups: &[String],
    ) -> Result<FanOutReport, CoreError> {
        validate_block_name(name)?;
        let body: Vec<String> = body
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        if body.is_empty() {
            return Err(CoreError::validation(format!("WLAN {name} has an empty body")));
        }
        let encoded = block::encode_body(&body);

        let mut staged = Vec::with_capacity(groups.len());
        for group in groups {
            let mut document = snapshot.require(group)?.clone();
            document.upsert_block(BlockKind::Wlan, name, &encoded);
            staged.push(document);
        }
        info!(wlan = name, groups = staged.len(), "deploying WLAN");
        self.push_documents(snapshot, staged).await
    }

    /// Delete `name` from every group in `groups` and push each one.
    pub async fn remove_wlan(
        &self,
        snapshot: &mut GroupSnapshot,
        name: &str,
        groups: &[String],
    ) -> Result<FanOutReport, CoreError> {
        let mut staged = Vec::with_capacity(groups.len());
        for group in groups {
            let mut document = snapshot.require(group)?.clone();
            if !document.remove_block(BlockKind::Wlan, name) {
                return Err(CoreError::not_found(
                    "WLAN",
                    format!("{name} in group {group}"),
                ));
            }
            staged.push(document);
        }
        info!(wlan = name, groups = staged.len(), "removing WLAN");
        self.push_documents(snapshot, staged).await
    }

    /// Flip the `enable`/`disable` line of `name` in every group carrying it.
    ///
    /// Each variant of the profile keeps its own body; only the state line
    /// changes. Groups already in the requested state are not pushed. A
    /// `wpa-passphrase` line is fetched documents' redacted copy, so it is
    /// swapped for the group's real key first; groups whose key cannot be
    /// read are reported as failed and left alone.
    pub async fn set_wlan_enabled(
        &self,
        snapshot: &mut GroupSnapshot,
        name: &str,
        enabled: bool,
    ) -> Result<FanOutReport, CoreError> {
        let variants = snapshot.catalog().variants(name).to_vec();
        if variants.is_empty() {
            return Err(CoreError::not_found("WLAN", name));
        }
        let changed: Vec<WlanRecord> = variants
            .into_iter()
            .filter_map(|mut record| record.set_enabled(enabled).then_some(record))
            .collect();

        let keyed_groups: Vec<String> = changed
            .iter()
            .filter(|record| record.carries_passphrase())
            .flat_map(|record| record.groups.iter().cloned())
            .collect();
        let mut keys = self
            .fanout
            .run(keyed_groups, |group| async move {
                self.wlan_psk(&group, name).await.map(|psk| psk.passphrase)
            })
            .await;
        if let Some(pos) = keys.failed.iter().position(|(_, e)| e.is_terminal()) {
            return Err(keys.failed.swap_remove(pos).1);
        }
        let resolved: HashMap<String, String> =
            std::mem::take(&mut keys.succeeded).into_iter().collect();

        let mut staged = Vec::new();
        for record in &changed {
            for group in &record.groups {
                let encoded = if record.carries_passphrase() {
                    let Some(passphrase) = resolved.get(group) else {
                        continue;
                    };
                    let mut keyed = record.clone();
                    keyed.set_passphrase(passphrase);
                    keyed.encoded_body()
                } else {
                    record.encoded_body()
                };
                let mut document = snapshot.require(group)?.clone();
                document.upsert_block(BlockKind::Wlan, name, &encoded);
                staged.push(document);
            }
        }
        info!(wlan = name, enabled, groups = staged.len(), "changing WLAN state");
        let mut report = self.push_documents(snapshot, staged).await?;
        report.failed.extend(keys.failed);
        report.skipped.extend(keys.skipped);
        Ok(report)
    }

    async fn push_documents(
        &self,
        snapshot: &mut GroupSnapshot,
        staged: Vec<ConfigDocument>,
    ) -> Result<FanOutReport, CoreError> {
        let targets = staged.iter().map(|d| d.group().to_owned()).collect();
        let staged: IndexMap<String, ConfigDocument> = staged
            .into_iter()
            .map(|d| (d.group().to_owned(), d))
            .collect();
        let staged = &staged;

        let mut report = self
            .fanout
            .run(targets, |group| async move {
                let document = staged
                    .get(&group)
                    .ok_or_else(|| CoreError::Internal(format!("no staged document for {group}")))?;
                self.backend.push_group_config(&group, document.lines()).await?;
                Ok(document.clone())
            })
            .await;

        snapshot.commit(std::mem::take(&mut report.succeeded));
        Ok(report.discard_values())
    }

    // ── Pre-shared keys ──────────────────────────────────────────────

    /// Plaintext pre-shared key of `wlan` in `group`.
    pub async fn wlan_psk(&self, group: &str, wlan: &str) -> Result<WlanPsk, CoreError> {
        let settings = self.backend.fetch_wlan(group, wlan).await?.wlan;
        let passphrase = settings
            .passphrase()
            .ok_or_else(|| not_psk(group, wlan))?
            .to_owned();
        Ok(WlanPsk {
            wlan: wlan.to_owned(),
            group: group.to_owned(),
            essid: settings.essid.unwrap_or_else(|| wlan.to_owned()),
            passphrase,
            hidden: settings.hide_ssid.unwrap_or(false),
        })
    }

    /// Replace the pre-shared key of `wlan` in `group`.
    ///
    /// The record is read and written back whole with the new key and the
    /// `wpa_passphrase_changed` flag set.
    pub async fn set_wlan_psk(
        &self,
        group: &str,
        wlan: &str,
        passphrase: &str,
    ) -> Result<(), CoreError> {
        WlanPsk::validate_passphrase(passphrase)?;
        let mut detail = self.backend.fetch_wlan(group, wlan).await?;
        if detail.wlan.passphrase().is_none() {
            return Err(not_psk(group, wlan));
        }
        detail.wlan.wpa_passphrase = Some(passphrase.to_owned());
        detail.wlan.wpa_passphrase_changed = Some(true);
        self.backend.update_wlan(group, wlan, &detail).await?;
        info!(group, wlan, "pre-shared key replaced");
        Ok(())
    }

    // ── Whole-group configuration ────────────────────────────────────

    /// Replace a group's configuration with `lines` as given.
    ///
    /// Trailing blank lines are dropped; an empty configuration is refused.
    pub async fn replace_group_config(
        &self,
        group: &str,
        mut lines: Vec<String>,
    ) -> Result<ConfigDocument, CoreError> {
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(CoreError::validation(format!(
                "refusing to push an empty configuration to group {group}"
            )));
        }
        if lines.iter().any(|line| {
            line.trim()
                .strip_prefix("wpa-passphrase")
                .is_some_and(|rest| rest.trim() == REDACTED_PASSPHRASE)
        }) {
            warn!(group, "configuration carries a redacted wpa-passphrase");
        }
        self.backend.push_group_config(group, &lines).await?;
        info!(group, lines = lines.len(), "group configuration replaced");
        Ok(ConfigDocument::new(group, lines))
    }

    // ── Gateway derivation ───────────────────────────────────────────

    /// Gateway groups serving the sites where `ap_group`'s APs are deployed.
    pub async fn gateway_groups_for(&self, ap_group: &str) -> Result<Vec<String>, CoreError> {
        let sites = gateway::dedupe_groups(self.backend.sites_for_group(ap_group).await?);
        let mut groups = Vec::new();
        for site in &sites {
            groups.extend(self.backend.gateway_groups_for_site(site).await?);
        }
        let groups = gateway::dedupe_groups(groups);
        debug!(ap_group, sites = sites.len(), gateway_groups = groups.len(), "resolved gateway groups");
        Ok(groups)
    }

    /// Push the same command list to every gateway group.
    pub async fn push_gateway_commands(
        &self,
        gateway_groups: Vec<String>,
        commands: &[String],
    ) -> FanOutReport {
        self.fanout
            .run(gateway_groups, |group| async move {
                self.backend.exec_gateway_commands(&group, commands).await
            })
            .await
    }

    async fn sync_gateways(
        &self,
        session: &Session,
        wlan: &WlanRecord,
        changes: &[(&str, GatewayChange)],
    ) -> Result<(), CoreError> {
        if changes.is_empty() {
            return Ok(());
        }
        let groups = self.gateway_groups_for(session.group()).await?;
        if groups.is_empty() {
            warn!(group = session.group(), "no gateway groups serve this AP group");
            return Ok(());
        }
        let profile = wlan.gateway_profile.as_deref().ok_or_else(|| {
            CoreError::validation(format!("WLAN {} has no gw-profile", wlan.name))
        })?;
        let commands = gateway::synthesize_batch(changes.iter().copied(), profile);
        self.push_gateway_commands(groups, &commands)
            .await
            .into_result("gateway derivation update")
            .map(|_| ())
    }

    // ── MPSK pools ───────────────────────────────────────────────────

    async fn push_pool(&self, session: &mut Session, pool: &MpskPool) -> Result<(), CoreError> {
        let staged = session.stage_pool(pool);
        self.backend
            .push_group_config(session.group(), staged.lines())
            .await?;
        info!(group = session.group(), pool = %pool.name, entries = pool.len(), "MPSK pool pushed");
        session.commit(staged);
        Ok(())
    }

    /// Add an entry; the gateway role is provisioned before the AP push.
    pub async fn add_mpsk(
        &self,
        session: &mut Session,
        wlan: &str,
        entry: MpskEntry,
    ) -> Result<(), CoreError> {
        let (record, mut pool) = session.mpsk_wlan(wlan)?;
        let record = record.clone();
        let name = entry.name.clone();
        pool.add(entry)?;

        self.sync_gateways(session, &record, &[(name.as_str(), GatewayChange::Provision)])
            .await?;
        self.push_pool(session, &pool).await
    }

    /// Replace the passphrase of an existing entry.
    pub async fn update_mpsk(
        &self,
        session: &mut Session,
        wlan: &str,
        name: &str,
        passphrase: &str,
    ) -> Result<(), CoreError> {
        let (_, mut pool) = session.mpsk_wlan(wlan)?;
        pool.update_passphrase(name, passphrase)?;
        self.push_pool(session, &pool).await
    }

    /// Remove an entry; the gateway teardown must succeed before the AP push.
    pub async fn remove_mpsk(
        &self,
        session: &mut Session,
        wlan: &str,
        selector: &MpskSelector,
    ) -> Result<MpskEntry, CoreError> {
        let (record, mut pool) = session.mpsk_wlan(wlan)?;
        let record = record.clone();
        let removed = match selector {
            MpskSelector::Index(index) => pool.remove_at(*index)?,
            MpskSelector::Name(name) => pool.remove_named(name)?,
        };

        self.sync_gateways(session, &record, &[(removed.name.as_str(), GatewayChange::Teardown)])
            .await?;
        self.push_pool(session, &pool).await?;
        Ok(removed)
    }

    /// Bulk import into the WLAN's pool.
    pub async fn import_mpsks(
        &self,
        session: &mut Session,
        wlan: &str,
        entries: Vec<MpskEntry>,
        mode: ImportMode,
    ) -> Result<ImportSummary, CoreError> {
        let (record, mut pool) = session.mpsk_wlan(wlan)?;
        let record = record.clone();
        let summary = pool.import(entries, mode);
        if !summary.changed() {
            return Ok(summary);
        }

        let changes: Vec<(&str, GatewayChange)> = summary
            .added
            .iter()
            .map(|n| (n.as_str(), GatewayChange::Provision))
            .chain(
                summary
                    .removed
                    .iter()
                    .map(|n| (n.as_str(), GatewayChange::Teardown)),
            )
            .collect();
        self.sync_gateways(session, &record, &changes).await?;
        self.push_pool(session, &pool).await?;
        Ok(summary)
    }

    // ── AP user roles ────────────────────────────────────────────────

    /// Make sure the group carries `role` with exactly its ACLs.
    ///
    /// Returns `false` when the role already matched and nothing was pushed.
    pub async fn ensure_ap_role(
        &self,
        session: &mut Session,
        role: &UserRole,
    ) -> Result<bool, CoreError> {
        validate_block_name(&role.name)?;
        if session.records().find_role(&role.name) == Some(role) {
            return Ok(false);
        }
        let staged = session.stage_role(role);
        self.backend
            .push_group_config(session.group(), staged.lines())
            .await?;
        info!(group = session.group(), role = %role.name, "user role pushed");
        session.commit(staged);
        Ok(true)
    }
}

fn validate_block_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(CoreError::validation(format!(
            "names containing spaces are not supported: {name:?}"
        )));
    }
    Ok(())
}

fn not_psk(group: &str, wlan: &str) -> CoreError {
    CoreError::validation(format!("WLAN {wlan} in group {group} is not a PSK-based network"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use wlanctl_api::{WlanDetail, WlanSettings};

    use super::*;

    /// In-memory platform recording every push.
    #[derive(Default)]
    struct FakeBackend {
        configs: Mutex<HashMap<String, Vec<String>>>,
        ap_pushes: Mutex<Vec<(String, Vec<String>)>>,
        gateway_pushes: Mutex<Vec<(String, Vec<String>)>>,
        /// v2 WLAN records keyed by `(group, wlan)`.
        wlans: Mutex<HashMap<(String, String), WlanDetail>>,
        wlan_updates: Mutex<Vec<(String, String, WlanDetail)>>,
        sites: HashMap<String, Vec<String>>,
        gateways: HashMap<String, Vec<String>>,
        failing_groups: Vec<String>,
    }

    fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    impl CentralBackend for FakeBackend {
        async fn fetch_group_config(&self, group: &str) -> Result<Vec<String>, CoreError> {
            lock(&self.configs)
                .get(group)
                .cloned()
                .ok_or_else(|| CoreError::ApplicationFault {
                    description: format!("unknown group {group}"),
                })
        }

        async fn push_group_config(&self, group: &str, lines: &[String]) -> Result<(), CoreError> {
            if self.failing_groups.iter().any(|g| g == group) {
                return Err(CoreError::TransientServerFault {
                    reason: "Service Unavailable".into(),
                });
            }
            lock(&self.ap_pushes).push((group.to_owned(), lines.to_vec()));
            lock(&self.configs).insert(group.to_owned(), lines.to_vec());
            Ok(())
        }

        async fn fetch_wlan(&self, group: &str, wlan: &str) -> Result<WlanDetail, CoreError> {
            lock(&self.wlans)
                .get(&(group.to_owned(), wlan.to_owned()))
                .cloned()
                .ok_or_else(|| CoreError::ApplicationFault {
                    description: format!("unknown WLAN {wlan}"),
                })
        }

        async fn update_wlan(
            &self,
            group: &str,
            wlan: &str,
            detail: &WlanDetail,
        ) -> Result<(), CoreError> {
            lock(&self.wlan_updates).push((group.to_owned(), wlan.to_owned(), detail.clone()));
            lock(&self.wlans).insert((group.to_owned(), wlan.to_owned()), detail.clone());
            Ok(())
        }

        async fn exec_gateway_commands(&self, group: &str, commands: &[String]) -> Result<(), CoreError> {
            if self.failing_groups.iter().any(|g| g == group) {
                return Err(CoreError::PushRejected {
                    message: "Failure".into(),
                });
            }
            lock(&self.gateway_pushes).push((group.to_owned(), commands.to_vec()));
            Ok(())
        }

        async fn list_groups(&self) -> Result<Vec<String>, CoreError> {
            let mut groups: Vec<_> = lock(&self.configs).keys().cloned().collect();
            groups.sort();
            Ok(groups)
        }

        async fn sites_for_group(&self, group: &str) -> Result<Vec<String>, CoreError> {
            Ok(self.sites.get(group).cloned().unwrap_or_default())
        }

        async fn gateway_groups_for_site(&self, site: &str) -> Result<Vec<String>, CoreError> {
            Ok(self.gateways.get(site).cloned().unwrap_or_default())
        }
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn branch_config() -> Vec<String> {
        lines(&[
            "wlan mpsk-local P",
            "  mpsk-local-passphrase alice ******** A",
            "wlan ssid-profile A",
            "  essid A-ssid",
            "  opmode mpsk-local",
            "  forward-mode l2",
            "  gw-profile GW1",
            "  mpsk-local P",
            "ap-group default",
        ])
    }

    fn backend() -> FakeBackend {
        FakeBackend {
            configs: Mutex::new(HashMap::from([
                ("Branch".to_string(), branch_config()),
                (
                    "Campus".to_string(),
                    lines(&["wlan ssid-profile Corp", "  essid Corp", "  enable"]),
                ),
            ])),
            sites: HashMap::from([(
                "Branch".to_string(),
                vec!["HQ".to_string(), "HQ".to_string(), "Annex".to_string()],
            )]),
            gateways: HashMap::from([
                ("HQ".to_string(), vec!["GW-East".to_string()]),
                ("Annex".to_string(), vec!["GW-East".to_string(), "GW-West".to_string()]),
            ]),
            ..FakeBackend::default()
        }
    }

    fn controller(backend: FakeBackend) -> Controller<FakeBackend> {
        Controller::with_backend(backend, FanOut::new(2, Duration::from_secs(5)))
    }

    fn wlan_detail(essid: &str, passphrase: &str) -> WlanDetail {
        WlanDetail {
            wlan: WlanSettings {
                essid: Some(essid.into()),
                wpa_passphrase: Some(passphrase.into()),
                ..WlanSettings::default()
            },
            ..WlanDetail::default()
        }
    }

    /// A disabled WPA2-PSK profile, as fetched with its key redacted.
    fn psk_config() -> Vec<String> {
        lines(&[
            "wlan ssid-profile Corp",
            "  essid Corp-WiFi",
            "  opmode wpa2-psk-aes",
            "  wpa-passphrase ********",
            "  disable",
        ])
    }

    fn ok<T>(result: Result<T, CoreError>) -> T {
        result.unwrap_or_else(|e| panic!("unexpected error: {e}"))
    }

    #[tokio::test]
    async fn gateway_groups_are_deduplicated() {
        let ctl = controller(backend());
        let groups = ok(ctl.gateway_groups_for("Branch").await);
        assert_eq!(groups, vec!["GW-East", "GW-West"]);
    }

    #[tokio::test]
    async fn add_mpsk_provisions_gateways_then_pushes_pool() {
        let ctl = controller(backend());
        let mut session = ok(ctl.open_session("Branch").await);
        let entry = ok(MpskEntry::new("bob", "hunter22", "A"));
        ok(ctl.add_mpsk(&mut session, "A", entry).await);

        let gateway_pushes = lock(&ctl.backend().gateway_pushes).clone();
        assert_eq!(gateway_pushes.len(), 2);
        assert!(gateway_pushes.iter().all(|(_, cmds)| cmds[0] == "user-role bob"));
        assert!(gateway_pushes
            .iter()
            .all(|(_, cmds)| cmds.contains(&"aaa derivation-rules user gw1".to_string())));

        let ap_pushes = lock(&ctl.backend().ap_pushes).clone();
        assert_eq!(ap_pushes.len(), 1);
        assert_eq!(
            &ap_pushes[0].1[..3],
            &lines(&[
                "wlan mpsk-local P",
                "  mpsk-local-passphrase alice ******** A",
                "  mpsk-local-passphrase bob hunter22 A",
            ])[..]
        );
        assert_eq!(session.records().find_pool("P").map(MpskPool::len), Some(2));
    }

    #[tokio::test]
    async fn redacted_passphrase_makes_no_network_call() {
        let ctl = controller(backend());
        let mut session = ok(ctl.open_session("Branch").await);
        let result = ctl.update_mpsk(&mut session, "A", "alice", "********").await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert!(lock(&ctl.backend().ap_pushes).is_empty());
        assert!(lock(&ctl.backend().gateway_pushes).is_empty());
    }

    #[tokio::test]
    async fn removing_only_entry_empties_pool_and_tears_down_role() {
        let ctl = controller(backend());
        let mut session = ok(ctl.open_session("Branch").await);
        let removed = ok(ctl
            .remove_mpsk(&mut session, "A", &MpskSelector::Index(0))
            .await);
        assert_eq!(removed.name, "alice");

        let gateway_pushes = lock(&ctl.backend().gateway_pushes).clone();
        assert_eq!(gateway_pushes.len(), 2);
        for (_, cmds) in &gateway_pushes {
            assert_eq!(cmds[0], "aaa derivation-rules user gw1");
            assert!(cmds.contains(&"no user-role alice".to_string()));
        }
        assert_eq!(session.records().find_pool("P").map(MpskPool::len), Some(0));
        assert_eq!(
            session.document().lines().first().map(String::as_str),
            Some("wlan mpsk-local P")
        );
    }

    #[tokio::test]
    async fn gateway_failure_aborts_ap_push() {
        let ctl = controller(FakeBackend {
            failing_groups: vec!["GW-West".to_string()],
            ..backend()
        });
        let mut session = ok(ctl.open_session("Branch").await);
        let before = session.document().clone();
        let result = ctl
            .remove_mpsk(&mut session, "A", &MpskSelector::Name("alice".into()))
            .await;
        assert!(matches!(result, Err(CoreError::PartialFailure { failed: 1, total: 2, .. })));
        assert!(lock(&ctl.backend().ap_pushes).is_empty());
        assert_eq!(session.document(), &before);
    }

    #[tokio::test]
    async fn ap_only_group_adds_without_gateway_profile() {
        let fake = backend();
        lock(&fake.configs).insert(
            "Kiosk".to_string(),
            lines(&[
                "wlan ssid-profile K",
                "  essid K",
                "  opmode mpsk-local",
                "  forward-mode l2",
                "  mpsk-local KP",
            ]),
        );
        let ctl = controller(fake);
        let mut session = ok(ctl.open_session("Kiosk").await);
        let entry = ok(MpskEntry::new("dave", "pw-dave", "K"));
        ok(ctl.add_mpsk(&mut session, "K", entry).await);

        assert!(lock(&ctl.backend().gateway_pushes).is_empty());
        let ap_pushes = lock(&ctl.backend().ap_pushes).clone();
        assert_eq!(ap_pushes.len(), 1);
        assert_eq!(ap_pushes[0].0, "Kiosk");
        assert_eq!(session.records().find_pool("KP").map(MpskPool::len), Some(1));
    }

    #[tokio::test]
    async fn import_provisions_added_entries() {
        let ctl = controller(backend());
        let mut session = ok(ctl.open_session("Branch").await);
        let summary = ok(ctl
            .import_mpsks(
                &mut session,
                "A",
                vec![
                    ok(MpskEntry::new("carol", "pw-carol", "A")),
                    ok(MpskEntry::new("alice", "********", "A")),
                ],
                ImportMode::AddAndUpdate,
            )
            .await);
        assert_eq!(summary.added, vec!["carol"]);
        assert!(summary.updated.is_empty());
        let gateway_pushes = lock(&ctl.backend().gateway_pushes).clone();
        assert!(gateway_pushes.iter().all(|(_, cmds)| cmds[0] == "user-role carol"));
        assert_eq!(session.records().find_pool("P").map(MpskPool::len), Some(2));
    }

    #[tokio::test]
    async fn unknown_wlan_is_not_found() {
        let ctl = controller(backend());
        let mut session = ok(ctl.open_session("Branch").await);
        let entry = ok(MpskEntry::new("x", "y", "z"));
        assert!(matches!(
            ctl.add_mpsk(&mut session, "Nope", entry).await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn deploy_wlan_to_two_groups() {
        let ctl = controller(backend());
        let groups = ok(ctl.list_groups().await);
        let (mut snapshot, failures) = ok(ctl.load_groups(&groups).await);
        assert!(failures.is_success());

        let report = ok(ctl
            .deploy_wlan(
                &mut snapshot,
                "Guest",
                &lines(&["essid Guest", "opmode opensystem"]),
                &groups,
            )
            .await);
        assert!(report.is_success());
        let guest = snapshot.catalog().variants("Guest");
        assert_eq!(guest.len(), 1);
        assert_eq!(guest[0].groups.len(), 2);

        let campus = ok(ctl.fetch_document("Campus").await);
        assert_eq!(
            campus.lines(),
            &lines(&[
                "wlan ssid-profile Guest",
                "  essid Guest",
                "  opmode opensystem",
                "wlan ssid-profile Corp",
                "  essid Corp",
                "  enable",
            ])[..]
        );
    }

    #[tokio::test]
    async fn deploy_reports_per_group_failures() {
        let ctl = controller(FakeBackend {
            failing_groups: vec!["Campus".to_string()],
            ..backend()
        });
        let groups = lines(&["Branch", "Campus"]);
        let (mut snapshot, _) = ok(ctl.load_groups(&groups).await);
        let report = ok(ctl
            .deploy_wlan(&mut snapshot, "Guest", &lines(&["essid Guest"]), &groups)
            .await);
        assert_eq!(report.succeeded.len(), 1);
        assert_eq!(report.failed.len(), 1);
        let guest = snapshot.catalog().variants("Guest");
        assert_eq!(guest[0].groups.iter().collect::<Vec<_>>(), vec!["Branch"]);
    }

    #[tokio::test]
    async fn deploy_rejects_spaced_names() {
        let ctl = controller(backend());
        let mut snapshot = GroupSnapshot::default();
        let result = ctl
            .deploy_wlan(&mut snapshot, "Guest WiFi", &lines(&["essid x"]), &[])
            .await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }

    #[tokio::test]
    async fn disable_and_remove_wlan() {
        let ctl = controller(backend());
        let groups = lines(&["Campus"]);
        let (mut snapshot, _) = ok(ctl.load_groups(&groups).await);

        let report = ok(ctl.set_wlan_enabled(&mut snapshot, "Corp", false).await);
        assert_eq!(report.succeeded.len(), 1);
        assert!(!snapshot.catalog().variants("Corp")[0].is_enabled());
        let again = ok(ctl.set_wlan_enabled(&mut snapshot, "Corp", false).await);
        assert_eq!(again.total(), 0);

        ok(ctl.remove_wlan(&mut snapshot, "Corp", &groups).await);
        assert!(snapshot.catalog().is_empty());
        assert!(matches!(
            ctl.remove_wlan(&mut snapshot, "Corp", &groups).await,
            Err(CoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn psk_is_read_from_wlan_record() {
        let fake = backend();
        lock(&fake.wlans).insert(
            ("Branch".into(), "Corp".into()),
            wlan_detail("Corp-WiFi", "corp-psk-1"),
        );
        let ctl = controller(fake);
        let psk = ok(ctl.wlan_psk("Branch", "Corp").await);
        assert_eq!(psk.passphrase, "corp-psk-1");
        assert_eq!(psk.essid, "Corp-WiFi");
        assert!(!psk.hidden);
    }

    #[tokio::test]
    async fn open_network_has_no_psk() {
        let fake = backend();
        lock(&fake.wlans).insert(("Branch".into(), "Guest".into()), wlan_detail("Guest", ""));
        let ctl = controller(fake);
        assert!(matches!(
            ctl.wlan_psk("Branch", "Guest").await,
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            ctl.set_wlan_psk("Branch", "Guest", "new-key-123").await,
            Err(CoreError::Validation { .. })
        ));
        assert!(lock(&ctl.backend().wlan_updates).is_empty());
    }

    #[tokio::test]
    async fn set_psk_writes_back_whole_record() {
        let fake = backend();
        let mut detail = wlan_detail("Corp-WiFi", "old-key-1");
        detail.wlan.extra.insert("vlan".into(), serde_json::json!("10"));
        lock(&fake.wlans).insert(("Branch".into(), "Corp".into()), detail);
        let ctl = controller(fake);

        ok(ctl.set_wlan_psk("Branch", "Corp", "new-key-123").await);
        let updates = lock(&ctl.backend().wlan_updates);
        assert_eq!(updates.len(), 1);
        let (group, wlan, sent) = &updates[0];
        assert_eq!((group.as_str(), wlan.as_str()), ("Branch", "Corp"));
        assert_eq!(sent.wlan.wpa_passphrase.as_deref(), Some("new-key-123"));
        assert_eq!(sent.wlan.wpa_passphrase_changed, Some(true));
        assert_eq!(sent.wlan.extra.get("vlan"), Some(&serde_json::json!("10")));
    }

    #[tokio::test]
    async fn short_psk_is_rejected_before_any_call() {
        let ctl = controller(backend());
        assert!(matches!(
            ctl.set_wlan_psk("Branch", "Corp", "short").await,
            Err(CoreError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn enabling_restores_real_passphrase() {
        let fake = backend();
        lock(&fake.configs).insert("Campus".into(), psk_config());
        lock(&fake.wlans).insert(
            ("Campus".into(), "Corp".into()),
            wlan_detail("Corp-WiFi", "corp-psk-1"),
        );
        let ctl = controller(fake);
        let groups = lines(&["Campus"]);
        let (mut snapshot, _) = ok(ctl.load_groups(&groups).await);

        let report = ok(ctl.set_wlan_enabled(&mut snapshot, "Corp", true).await);
        assert!(report.is_success());
        let pushes = lock(&ctl.backend().ap_pushes);
        assert_eq!(
            pushes[0].1,
            lines(&[
                "wlan ssid-profile Corp",
                "  essid Corp-WiFi",
                "  opmode wpa2-psk-aes",
                "  wpa-passphrase corp-psk-1",
                "  enable",
            ])
        );
    }

    #[tokio::test]
    async fn unreadable_passphrase_fails_only_that_group() {
        let fake = backend();
        lock(&fake.configs).insert("East".into(), psk_config());
        lock(&fake.configs).insert("West".into(), psk_config());
        lock(&fake.wlans).insert(
            ("East".into(), "Corp".into()),
            wlan_detail("Corp-WiFi", "east-psk-1"),
        );
        let ctl = controller(fake);
        let groups = lines(&["East", "West"]);
        let (mut snapshot, _) = ok(ctl.load_groups(&groups).await);

        let report = ok(ctl.set_wlan_enabled(&mut snapshot, "Corp", true).await);
        assert_eq!(report.succeeded.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "West");
        let pushes = lock(&ctl.backend().ap_pushes);
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, "East");
        assert!(pushes[0].1.contains(&"  wpa-passphrase east-psk-1".to_string()));
    }

    #[tokio::test]
    async fn whole_group_config_is_pushed_as_given() {
        let ctl = controller(backend());
        let document = ok(ctl
            .replace_group_config(
                "Campus",
                lines(&["wlan ssid-profile Lab", "  essid Lab", "", ""]),
            )
            .await);
        assert_eq!(document.lines(), &lines(&["wlan ssid-profile Lab", "  essid Lab"])[..]);
        let pushes = lock(&ctl.backend().ap_pushes);
        assert_eq!(pushes[0].0, "Campus");
        assert_eq!(pushes[0].1, document.lines());
    }

    #[tokio::test]
    async fn empty_group_config_is_refused() {
        let ctl = controller(backend());
        assert!(matches!(
            ctl.replace_group_config("Campus", lines(&["", "  "])).await,
            Err(CoreError::Validation { .. })
        ));
        assert!(lock(&ctl.backend().ap_pushes).is_empty());
    }

    #[tokio::test]
    async fn ensure_role_pushes_only_on_change() {
        let ctl = controller(backend());
        let mut session = ok(ctl.open_session("Branch").await);
        let role = UserRole::permit_all("bob");
        assert!(ok(ctl.ensure_ap_role(&mut session, &role).await));
        assert!(!ok(ctl.ensure_ap_role(&mut session, &role).await));
        assert_eq!(lock(&ctl.backend().ap_pushes).len(), 1);
        assert_eq!(session.records().find_role("bob"), Some(&role));
    }
}
