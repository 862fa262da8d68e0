// ── Group editing session ──
//
// The selected group's document and the records decoded from it. A
// session is created when a group is selected and dropped on switch;
// edits are staged on a copy of the document and committed only after
// the platform accepted the push.

use crate::block::BlockKind;
use crate::error::CoreError;
use crate::model::{ConfigDocument, MpskPool, UserRole, WlanRecord};
use crate::store::RecordStore;

#[derive(Debug, Clone)]
pub struct Session {
    document: ConfigDocument,
    records: RecordStore,
}

impl Session {
    pub fn new(document: ConfigDocument) -> Self {
        let records = RecordStore::from_document(&document);
        Self { document, records }
    }

    pub fn group(&self) -> &str {
        self.document.group()
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// The MPSK WLAN `name` and its pool (empty if the block is missing).
    pub fn mpsk_wlan(&self, name: &str) -> Result<(&WlanRecord, MpskPool), CoreError> {
        self.records.wlan_with_pool(name)
    }

    /// Document with `pool` patched in, leaving the session untouched.
    pub fn stage_pool(&self, pool: &MpskPool) -> ConfigDocument {
        let mut staged = self.document.clone();
        staged.upsert_block(BlockKind::MpskPool, &pool.name, &pool.encoded_body());
        staged
    }

    /// Document with `role` patched in, leaving the session untouched.
    pub fn stage_role(&self, role: &UserRole) -> ConfigDocument {
        let mut staged = self.document.clone();
        staged.upsert_block(BlockKind::AccessRule, &role.name, &role.encoded_body());
        staged
    }

    /// Adopt a document the platform accepted and rebuild the records.
    pub fn commit(&mut self, document: ConfigDocument) {
        self.records = RecordStore::from_document(&document);
        self.document = document;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MpskEntry;

    fn session() -> Session {
        Session::new(ConfigDocument::new(
            "Branch",
            [
                "wlan mpsk-local P",
                "  mpsk-local-passphrase alice ******** alice",
                "wlan ssid-profile A",
                "  essid A-ssid",
                "  opmode mpsk-local",
                "  forward-mode l2",
                "  gw-profile gw1",
                "  mpsk-local P",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        ))
    }

    #[test]
    fn staging_does_not_touch_the_session() {
        let session = session();
        let (_, mut pool) = session.mpsk_wlan("A").unwrap_or_else(|e| panic!("{e}"));
        pool.add(MpskEntry::new("bob", "hunter22", "A").unwrap_or_else(|e| panic!("{e}")))
            .unwrap_or_else(|e| panic!("{e}"));
        let staged = session.stage_pool(&pool);
        assert_eq!(staged.len(), session.document().len() + 1);
        assert_eq!(session.records().find_pool("P").map(MpskPool::len), Some(1));
    }

    #[test]
    fn commit_rebuilds_records() {
        let mut session = session();
        let (_, mut pool) = session.mpsk_wlan("A").unwrap_or_else(|e| panic!("{e}"));
        pool.remove_at(0).unwrap_or_else(|e| panic!("{e}"));
        let staged = session.stage_pool(&pool);
        session.commit(staged);
        assert_eq!(session.records().find_pool("P").map(MpskPool::len), Some(0));
        assert_eq!(session.group(), "Branch");
    }
}
