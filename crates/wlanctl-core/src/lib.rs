//! Configuration editing layer between `wlanctl-api` and the CLI.
//!
//! This crate owns the domain model and the fetch, edit and push flows:
//!
//! - **[`block`]**: locates, extracts and patches named blocks inside a
//!   group's line-oriented configuration.
//!
//! - **Domain model** ([`model`]): [`ConfigDocument`], [`WlanRecord`],
//!   [`MpskPool`] / [`MpskEntry`] and [`UserRole`], each decoded from and
//!   encoded back into a block.
//!
//! - **[`RecordStore`]** / **[`WlanCatalog`]**: the selected group's
//!   records, and the cross-group WLAN view with identical copies merged.
//!
//! - **[`gateway`]**: the role/ACL/derivation fragments pushed to gateway
//!   groups when MPSK entries come and go.
//!
//! - **[`Controller`]**: orchestrates every change. Edits are staged on a
//!   copy and only committed once the platform confirmed the push;
//!   multi-group actions go through a bounded [`FanOut`].

pub mod backend;
pub mod block;
pub mod config;
pub mod controller;
pub mod error;
pub mod fanout;
pub mod gateway;
pub mod model;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::CentralBackend;
pub use block::{Block, BlockKind};
pub use config::{ControllerConfig, DEFAULT_FANOUT_WIDTH, TlsVerification};
pub use controller::{Controller, GroupSnapshot, MpskSelector};
pub use error::CoreError;
pub use fanout::{FanOut, FanOutReport};
pub use gateway::GatewayChange;
pub use session::Session;
pub use store::{RecordStore, WlanCatalog};

pub use model::{
    ConfigDocument, DEFAULT_ROLE_ACL, ImportMode, ImportSummary, MAX_POOL_ENTRIES, MpskEntry,
    MpskPool, REDACTED_PASSPHRASE, UserRole, WlanPsk, WlanRecord, WlanSummary,
};
