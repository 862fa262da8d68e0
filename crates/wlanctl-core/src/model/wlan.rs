// ── WLAN profile records ──
//
// A `wlan ssid-profile <name>` block decoded into a record. Lines are kept
// clean (trimmed) so records from different groups compare structurally.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::block::{self, Block};
use crate::error::CoreError;
use crate::model::document::ConfigDocument;
use crate::model::mpsk::REDACTED_PASSPHRASE;

const ESSID_TOKEN: &str = "essid ";
const GATEWAY_PROFILE_TOKEN: &str = "gw-profile ";
const MPSK_POOL_TOKEN: &str = "mpsk-local ";
const MPSK_OPMODE: &str = "opmode mpsk-local";
const L2_FORWARDING: &str = "forward-mode l2";
const HIDDEN_SSID: &str = "hide-ssid";
const DISABLE: &str = "disable";
const ENABLE: &str = "enable";
const WPA_PASSPHRASE: &str = "wpa-passphrase";
const PSK_LEN: std::ops::RangeInclusive<usize> = 8..=63;

/// A decoded WLAN profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WlanRecord {
    pub name: String,
    pub essid: Option<String>,
    pub gateway_profile: Option<String>,
    /// Clean body lines, decorations removed.
    pub lines: Vec<String>,
    /// Groups carrying an identical copy of this profile.
    pub groups: BTreeSet<String>,
}

impl WlanRecord {
    /// Decode a located block of `document`.
    pub fn from_block(document: &ConfigDocument, block: &Block) -> Self {
        Self::from_lines(
            block.name.clone(),
            document.clean_body(block),
            document.group(),
        )
    }

    /// Build a record from clean body lines.
    pub fn from_lines(name: String, lines: Vec<String>, group: &str) -> Self {
        Self {
            essid: block::scalar_field(&lines, ESSID_TOKEN),
            gateway_profile: block::scalar_field(&lines, GATEWAY_PROFILE_TOKEN),
            name,
            lines,
            groups: BTreeSet::from([group.to_owned()]),
        }
    }

    fn has_line_containing(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Local MPSK with L2 forwarding: the only WLANs whose pools are edited.
    pub fn is_mpsk_local(&self) -> bool {
        self.has_line_containing(MPSK_OPMODE) && self.has_line_containing(L2_FORWARDING)
    }

    /// Name of the `wlan mpsk-local` pool this WLAN references.
    pub fn mpsk_pool_name(&self) -> Option<String> {
        block::scalar_field(&self.lines, MPSK_POOL_TOKEN)
    }

    pub fn is_hidden(&self) -> bool {
        self.has_line_containing(HIDDEN_SSID)
    }

    pub fn is_enabled(&self) -> bool {
        !self.lines.iter().any(|line| line == DISABLE)
    }

    /// SSID broadcast to clients; falls back to the profile name.
    pub fn broadcast_name(&self) -> &str {
        self.essid.as_deref().unwrap_or(&self.name)
    }

    /// Swap the `disable` / `enable` line. Returns `false` when nothing changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if enabled == self.is_enabled() {
            return false;
        }
        let (from, to) = if enabled {
            (DISABLE, ENABLE)
        } else {
            (ENABLE, DISABLE)
        };
        match self.lines.iter_mut().find(|line| line.as_str() == from) {
            Some(line) => to.clone_into(line),
            None => self.lines.push(to.to_owned()),
        }
        true
    }

    /// Whether the body carries a `wpa-passphrase` line. Fetched documents
    /// only ever hold it redacted.
    pub fn carries_passphrase(&self) -> bool {
        self.lines.iter().any(|line| line.starts_with(WPA_PASSPHRASE))
    }

    /// Rewrite every `wpa-passphrase` line with the plaintext key.
    pub fn set_passphrase(&mut self, passphrase: &str) {
        for line in &mut self.lines {
            if line.starts_with(WPA_PASSPHRASE) {
                *line = format!("{WPA_PASSPHRASE} {passphrase}");
            }
        }
    }

    /// Body lines indented for patching into a document.
    pub fn encoded_body(&self) -> Vec<String> {
        block::encode_body(&self.lines)
    }

    /// Display columns derived from the body.
    pub fn summary(&self) -> WlanSummary {
        WlanSummary::from_lines(&self.lines)
    }

    /// `WIFI:` URI understood by phone cameras for joining the network.
    pub fn wifi_qr_payload(&self, passphrase: &str) -> String {
        wifi_uri(self.broadcast_name(), passphrase, self.is_hidden())
    }
}

fn wifi_uri(ssid: &str, passphrase: &str, hidden: bool) -> String {
    format!("WIFI:S:{ssid};T:WPA;P:{passphrase};H:{hidden};;")
}

// ── Pre-shared keys ─────────────────────────────────────────────────

/// Plaintext pre-shared key of one WLAN in one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WlanPsk {
    pub wlan: String,
    pub group: String,
    pub essid: String,
    pub passphrase: String,
    pub hidden: bool,
}

impl WlanPsk {
    pub fn wifi_qr_payload(&self) -> String {
        wifi_uri(&self.essid, &self.passphrase, self.hidden)
    }

    /// WPA passphrase rules: 8 to 63 printable ASCII characters, and not the
    /// redaction placeholder.
    pub fn validate_passphrase(passphrase: &str) -> Result<(), CoreError> {
        if passphrase == REDACTED_PASSPHRASE {
            return Err(CoreError::validation(
                "passphrase is still the redacted placeholder; enter a new passphrase",
            ));
        }
        if !PSK_LEN.contains(&passphrase.len()) {
            return Err(CoreError::validation(format!(
                "WPA passphrase must be {} to {} characters",
                PSK_LEN.start(),
                PSK_LEN.end()
            )));
        }
        if !passphrase.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
            return Err(CoreError::validation("WPA passphrase must be printable ASCII"));
        }
        Ok(())
    }
}

/// Derived, display-only view of a WLAN profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WlanSummary {
    pub key_management: String,
    pub min_basic_rates: String,
    pub fast_roaming: String,
    pub zone: String,
    pub rf_band: String,
    pub enabled: bool,
}

impl WlanSummary {
    fn from_lines(lines: &[String]) -> Self {
        let mut key_management = String::new();
        let mut rate_2g = "1".to_owned();
        let mut rate_5g = "6".to_owned();
        let mut roaming = Vec::new();
        let mut zone = String::new();
        let mut band = "All".to_owned();
        let mut six_ghz = false;
        let mut enabled = true;

        for line in lines {
            if let Some(value) = line.strip_prefix("opmode ") {
                value.clone_into(&mut key_management);
            } else if let Some(value) = line.strip_prefix("g-min-tx-rate ") {
                value.clone_into(&mut rate_2g);
            } else if let Some(value) = line.strip_prefix("a-min-tx-rate ") {
                value.clone_into(&mut rate_5g);
            } else if let Some(value) = line.strip_prefix("zone ") {
                value.clone_into(&mut zone);
            } else if let Some(value) = line.strip_prefix("rf-band ") {
                value.clone_into(&mut band);
            } else if line.starts_with("rf-band-6ghz") {
                six_ghz = true;
            } else if let Some(amendment) = line.strip_prefix("dot11") {
                if matches!(amendment, "k" | "v" | "r") {
                    roaming.push(format!("11{amendment}"));
                }
            } else if line == DISABLE {
                enabled = false;
            }
        }
        roaming.sort();

        Self {
            key_management,
            min_basic_rates: format!("2.4GHz: {rate_2g}Mbps / 5GHz: {rate_5g}Mbps"),
            fast_roaming: roaming.join("/"),
            zone,
            rf_band: format_band(&band, six_ghz),
            enabled,
        }
    }
}

fn format_band(band: &str, six_ghz: bool) -> String {
    if band.eq_ignore_ascii_case("all") {
        return "All".to_owned();
    }
    let band = if band == "5.0" { "5" } else { band };
    if six_ghz {
        format!("{band}GHz/6GHz")
    } else {
        format!("{band}GHz")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(lines: &[&str]) -> WlanRecord {
        WlanRecord::from_lines(
            "A".into(),
            lines.iter().map(ToString::to_string).collect(),
            "Branch",
        )
    }

    #[test]
    fn scalar_fields_are_decoded() {
        let wlan = record(&[
            "essid A-ssid",
            "opmode mpsk-local",
            "forward-mode l2",
            "gw-profile gw1",
            "mpsk-local P",
        ]);
        assert_eq!(wlan.essid.as_deref(), Some("A-ssid"));
        assert_eq!(wlan.gateway_profile.as_deref(), Some("gw1"));
        assert_eq!(wlan.mpsk_pool_name().as_deref(), Some("P"));
        assert!(wlan.is_mpsk_local());
        assert_eq!(wlan.groups, BTreeSet::from(["Branch".to_string()]));
    }

    #[test]
    fn mpsk_local_requires_l2_forwarding() {
        let tunnel = record(&["essid A", "opmode mpsk-local", "forward-mode tunnel"]);
        assert!(!tunnel.is_mpsk_local());
        let psk = record(&["essid A", "opmode wpa2-psk-aes", "forward-mode l2"]);
        assert!(!psk.is_mpsk_local());
    }

    #[test]
    fn summary_defaults() {
        let summary = record(&["essid A", "opmode wpa2-aes"]).summary();
        assert_eq!(
            summary,
            WlanSummary {
                key_management: "wpa2-aes".into(),
                min_basic_rates: "2.4GHz: 1Mbps / 5GHz: 6Mbps".into(),
                fast_roaming: String::new(),
                zone: String::new(),
                rf_band: "All".into(),
                enabled: true,
            }
        );
    }

    #[test]
    fn summary_reads_every_column() {
        let summary = record(&[
            "essid A",
            "opmode wpa3-sae-aes",
            "g-min-tx-rate 12",
            "a-min-tx-rate 24",
            "dot11r",
            "dot11k",
            "dot11v",
            "zone lobby",
            "rf-band 5.0",
            "rf-band-6ghz",
            "disable",
        ])
        .summary();
        assert_eq!(summary.key_management, "wpa3-sae-aes");
        assert_eq!(summary.min_basic_rates, "2.4GHz: 12Mbps / 5GHz: 24Mbps");
        assert_eq!(summary.fast_roaming, "11k/11r/11v");
        assert_eq!(summary.zone, "lobby");
        assert_eq!(summary.rf_band, "5GHz/6GHz");
        assert!(!summary.enabled);
    }

    #[test]
    fn band_formatting() {
        assert_eq!(format_band("2.4", false), "2.4GHz");
        assert_eq!(format_band("5.0", false), "5GHz");
        assert_eq!(format_band("all", true), "All");
    }

    #[test]
    fn enable_disable_swaps_line() {
        let mut wlan = record(&["essid A", "enable", "opmode wpa2-aes"]);
        assert!(wlan.is_enabled());
        assert!(wlan.set_enabled(false));
        assert_eq!(wlan.lines, vec!["essid A", "disable", "opmode wpa2-aes"]);
        assert!(!wlan.set_enabled(false));
        assert!(wlan.set_enabled(true));
        assert_eq!(wlan.lines, vec!["essid A", "enable", "opmode wpa2-aes"]);
    }

    #[test]
    fn disabling_without_enable_line_appends() {
        let mut wlan = record(&["essid A"]);
        assert!(wlan.set_enabled(false));
        assert_eq!(wlan.lines, vec!["essid A", "disable"]);
    }

    #[test]
    fn passphrase_line_is_rewritten_in_place() {
        let mut wlan = record(&[
            "essid A",
            "opmode wpa2-psk-aes",
            "wpa-passphrase ********",
            "vlan 10",
        ]);
        assert!(wlan.carries_passphrase());
        wlan.set_passphrase("real-key-1");
        assert_eq!(
            wlan.lines,
            vec!["essid A", "opmode wpa2-psk-aes", "wpa-passphrase real-key-1", "vlan 10"]
        );
        assert!(!record(&["essid A", "opmode opensystem"]).carries_passphrase());
    }

    #[test]
    fn psk_rules() {
        assert!(WlanPsk::validate_passphrase("correct horse").is_ok());
        assert!(WlanPsk::validate_passphrase("short").is_err());
        assert!(WlanPsk::validate_passphrase(&"x".repeat(64)).is_err());
        assert!(WlanPsk::validate_passphrase(REDACTED_PASSPHRASE).is_err());
        assert!(WlanPsk::validate_passphrase("tab\tinside-key").is_err());
    }

    #[test]
    fn psk_qr_payload() {
        let psk = WlanPsk {
            wlan: "Corp".into(),
            group: "Branch".into(),
            essid: "Corp-WiFi".into(),
            passphrase: "s3cret-psk".into(),
            hidden: true,
        };
        assert_eq!(psk.wifi_qr_payload(), "WIFI:S:Corp-WiFi;T:WPA;P:s3cret-psk;H:true;;");
    }

    #[test]
    fn qr_payload_uses_essid_and_hidden_flag() {
        let visible = record(&["essid Corp-WiFi", "opmode mpsk-local"]);
        assert_eq!(
            visible.wifi_qr_payload("s3cret"),
            "WIFI:S:Corp-WiFi;T:WPA;P:s3cret;H:false;;"
        );
        let hidden = record(&["essid Hidden", "hide-ssid"]);
        assert_eq!(
            hidden.wifi_qr_payload("pw"),
            "WIFI:S:Hidden;T:WPA;P:pw;H:true;;"
        );
    }
}
