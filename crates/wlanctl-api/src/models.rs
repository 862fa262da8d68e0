// Wire models for the monitoring and configuration endpoints.
//
// Only the fields the tool reads are modelled; everything else in the
// platform's payloads is ignored by serde, except on the WLAN detail
// record, which is written back and so keeps its unknown fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An access point as reported by `GET /monitoring/v2/aps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApSummary {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
}

/// A gateway as reported by `GET /monitoring/v1/gateways`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySummary {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
}

/// `GET /configuration/v2/wlan/{group}/{wlan}` body.
///
/// The record is read, modified and PUT back whole, so every field the
/// platform sent survives the round trip in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WlanDetail {
    #[serde(default)]
    pub wlan: WlanSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Settings object nested under `wlan` in [`WlanDetail`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WlanSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essid: Option<String>,
    /// Plaintext pre-shared key; empty or absent on non-PSK networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wpa_passphrase: Option<String>,
    /// Must be `true` on a PUT for a new passphrase to take effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wpa_passphrase_changed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_ssid: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WlanSettings {
    /// The pre-shared key, when the network uses one.
    pub fn passphrase(&self) -> Option<&str> {
        self.wpa_passphrase.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApList {
    #[serde(default)]
    pub aps: Vec<ApSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GatewayList {
    #[serde(default)]
    pub gateways: Vec<GatewaySummary>,
}

/// `GET /configuration/v2/groups` returns each group as a one-element array.
#[derive(Debug, Deserialize)]
pub(crate) struct GroupPage {
    #[serde(default)]
    pub data: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApCliBody<'a> {
    pub clis: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct ExecBody<'a> {
    pub cli_cmds: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecResponse {
    #[serde(rename = "_global_result")]
    pub global_result: ExecGlobalResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecGlobalResult {
    #[serde(default)]
    pub status_str: String,
}
