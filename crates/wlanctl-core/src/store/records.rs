// ── Per-group record store ──
//
// Decoded records of the selected group, keyed by name. Rebuilt from
// scratch whenever the group's document is replaced.

use indexmap::IndexMap;
use tracing::debug;

use crate::block::BlockKind;
use crate::error::CoreError;
use crate::model::{ConfigDocument, MpskPool, UserRole, WlanRecord};

/// MPSK-capable WLANs, user roles and MPSK pools of one group.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    wlans: IndexMap<String, WlanRecord>,
    roles: IndexMap<String, UserRole>,
    pools: IndexMap<String, MpskPool>,
}

impl RecordStore {
    /// Decode every record kind from `document`.
    pub fn from_document(document: &ConfigDocument) -> Self {
        let mut store = Self::default();
        store.ingest_wlans(document);
        store.ingest_roles(document);
        store.ingest_pools(document);
        debug!(
            group = document.group(),
            wlans = store.wlans.len(),
            roles = store.roles.len(),
            pools = store.pools.len(),
            "record store built"
        );
        store
    }

    /// Keep WLANs running local MPSK with L2 forwarding.
    ///
    /// A WLAN already present with an identical body gains the group;
    /// otherwise the newer copy replaces it.
    pub fn ingest_wlans(&mut self, document: &ConfigDocument) {
        for block in document.blocks(BlockKind::Wlan) {
            if !block.has_valid_name() {
                continue;
            }
            let record = WlanRecord::from_block(document, &block);
            if !record.is_mpsk_local() {
                continue;
            }
            match self.wlans.get_mut(&record.name) {
                Some(existing) if existing.lines == record.lines => {
                    existing.groups.extend(record.groups);
                }
                _ => {
                    self.wlans.insert(record.name.clone(), record);
                }
            }
        }
    }

    pub fn ingest_roles(&mut self, document: &ConfigDocument) {
        for block in document.blocks(BlockKind::AccessRule) {
            if !block.has_valid_name() {
                continue;
            }
            let role = UserRole::from_block(document, &block);
            self.roles.insert(role.name.clone(), role);
        }
    }

    pub fn ingest_pools(&mut self, document: &ConfigDocument) {
        for block in document.blocks(BlockKind::MpskPool) {
            if !block.has_valid_name() {
                continue;
            }
            let pool = MpskPool::from_block(document, &block);
            self.pools.insert(pool.name.clone(), pool);
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn find_wlan(&self, name: &str) -> Option<&WlanRecord> {
        self.wlans.get(name)
    }

    pub fn find_role(&self, name: &str) -> Option<&UserRole> {
        self.roles.get(name)
    }

    pub fn find_pool(&self, name: &str) -> Option<&MpskPool> {
        self.pools.get(name)
    }

    pub fn wlans(&self) -> impl Iterator<Item = &WlanRecord> {
        self.wlans.values()
    }

    pub fn roles(&self) -> impl Iterator<Item = &UserRole> {
        self.roles.values()
    }

    pub fn pools(&self) -> impl Iterator<Item = &MpskPool> {
        self.pools.values()
    }

    /// The MPSK WLAN `name` and the pool it references.
    ///
    /// A WLAN whose pool block does not exist yet gets an empty pool with the
    /// referenced name, so the first entry creates the block.
    pub fn wlan_with_pool(&self, name: &str) -> Result<(&WlanRecord, MpskPool), CoreError> {
        let wlan = self
            .find_wlan(name)
            .ok_or_else(|| CoreError::not_found("MPSK WLAN", name))?;
        let pool_name = wlan.mpsk_pool_name().ok_or_else(|| {
            CoreError::validation(format!("WLAN {name} does not reference an MPSK pool"))
        })?;
        let pool = self
            .find_pool(&pool_name)
            .cloned()
            .unwrap_or_else(|| MpskPool::new(pool_name));
        Ok((wlan, pool))
    }
}
