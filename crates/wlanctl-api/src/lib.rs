// wlanctl-api: Async Rust client for the management platform's REST APIs
//
// Three surfaces are covered: AP group configuration (`ap_cli` plus the
// structured v2 WLAN record), gateway command execution (`caasapi`) and
// the monitoring lookups used to find which gateway groups serve an AP
// group.

pub mod client;
pub mod configuration;
pub mod error;
pub mod exec;
pub mod models;
pub mod monitoring;
pub mod response;
pub mod transport;

pub use client::CentralClient;
pub use error::Error;
pub use models::{ApSummary, GatewaySummary, WlanDetail, WlanSettings};
pub use response::CentralResponse;
pub use transport::{TlsMode, TransportConfig};
