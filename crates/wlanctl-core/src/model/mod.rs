// ── Domain model ──
//
// Records decoded from configuration blocks. Every record knows how to
// build itself from a located block and how to encode its body back.

pub mod document;
pub mod mpsk;
pub mod role;
pub mod wlan;

pub use document::ConfigDocument;
pub use mpsk::{
    ImportMode, ImportSummary, MAX_POOL_ENTRIES, MpskEntry, MpskPool, REDACTED_PASSPHRASE,
};
pub use role::{DEFAULT_ROLE_ACL, UserRole};
pub use wlan::{WlanPsk, WlanRecord, WlanSummary};
