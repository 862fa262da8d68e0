// ── Gateway derivation fragments ──
//
// Each MPSK entry maps to a gateway user role of the same name. The
// gateway groups serving the WLAN's sites need that role, its session ACL
// and a derivation rule on the WLAN's gateway profile that matches the
// MPSK key name. Adding an entry pushes the provisioning fragment, removing
// one pushes the matching teardown.

use indexmap::IndexSet;

const MPSK_PLACEHOLDER: &str = "<mpsk-name>";
const PROFILE_PLACEHOLDER: &str = "<gw-profile>";

const PROVISION_TEMPLATE: &str = "user-role <mpsk-name>
!
ip access-list session <mpsk-name>
user any svc-dhcp permit
user any svc-dns permit
userrole <mpsk-name> userrole <mpsk-name> any permit
user alias private-networks any deny
any any any permit
!
user-role <mpsk-name>
access-list session <mpsk-name>
!
aaa derivation-rules user <gw-profile>
\tset role condition mpsk-key-name equals \"<mpsk-name>\" set-value <mpsk-name>
!";

const TEARDOWN_TEMPLATE: &str = "aaa derivation-rules user <gw-profile>
no set role condition mpsk-key-name equals \"<mpsk-name>\"
!
ip access-list session <mpsk-name>
no userrole <mpsk-name> userrole <mpsk-name> any permit
!
no user-role <mpsk-name>
!
no ip access-list session <mpsk-name>
!";

/// Which fragment to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum GatewayChange {
    #[strum(serialize = "provision")]
    Provision,
    #[strum(serialize = "teardown")]
    Teardown,
}

/// Gateway CLI lines for one MPSK entry.
///
/// The gateway profile is lower-cased; the platform stores profile names
/// that way on gateways.
pub fn synthesize(mpsk_name: &str, gateway_profile: &str, change: GatewayChange) -> Vec<String> {
    let template = match change {
        GatewayChange::Provision => PROVISION_TEMPLATE,
        GatewayChange::Teardown => TEARDOWN_TEMPLATE,
    };
    let profile = gateway_profile.to_lowercase();
    let text = replace_ignore_case(template, MPSK_PLACEHOLDER, mpsk_name);
    let text = replace_ignore_case(&text, PROFILE_PLACEHOLDER, &profile);
    text.lines().map(str::to_owned).collect()
}

/// Concatenated fragments for several entries, one command list per push.
pub fn synthesize_batch<'a>(
    changes: impl IntoIterator<Item = (&'a str, GatewayChange)>,
    gateway_profile: &str,
) -> Vec<String> {
    changes
        .into_iter()
        .flat_map(|(name, change)| synthesize(name, gateway_profile, change))
        .collect()
}

/// Deduplicate gateway group names, keeping first-seen order.
pub fn dedupe_groups(groups: impl IntoIterator<Item = String>) -> Vec<String> {
    groups
        .into_iter()
        .filter(|g| !g.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// ASCII case-insensitive replace of every `needle` occurrence.
fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    let lowered = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    for (at, _) in lowered.match_indices(&needle) {
        out.push_str(haystack.get(cursor..at).unwrap_or_default());
        out.push_str(replacement);
        cursor = at + needle.len();
    }
    out.push_str(haystack.get(cursor..).unwrap_or_default());
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn provision_fragment_text() {
        assert_eq!(
            synthesize("alice", "GW1", GatewayChange::Provision),
            vec![
                "user-role alice",
                "!",
                "ip access-list session alice",
                "user any svc-dhcp permit",
                "user any svc-dns permit",
                "userrole alice userrole alice any permit",
                "user alias private-networks any deny",
                "any any any permit",
                "!",
                "user-role alice",
                "access-list session alice",
                "!",
                "aaa derivation-rules user gw1",
                "\tset role condition mpsk-key-name equals \"alice\" set-value alice",
                "!",
            ]
        );
    }

    #[test]
    fn teardown_fragment_text() {
        assert_eq!(
            synthesize("alice", "gw1", GatewayChange::Teardown),
            vec![
                "aaa derivation-rules user gw1",
                "no set role condition mpsk-key-name equals \"alice\"",
                "!",
                "ip access-list session alice",
                "no userrole alice userrole alice any permit",
                "!",
                "no user-role alice",
                "!",
                "no ip access-list session alice",
                "!",
            ]
        );
    }

    #[test]
    fn fragments_reference_the_same_identifiers() {
        let provision = synthesize("bob", "Corp-GW", GatewayChange::Provision).join("\n");
        let teardown = synthesize("bob", "Corp-GW", GatewayChange::Teardown).join("\n");
        for identifier in [
            "user-role bob",
            "ip access-list session bob",
            "userrole bob userrole bob any permit",
            "aaa derivation-rules user corp-gw",
            "mpsk-key-name equals \"bob\"",
        ] {
            assert!(provision.contains(identifier), "provision lacks {identifier}");
            assert!(teardown.contains(identifier), "teardown lacks {identifier}");
        }
    }

    #[test]
    fn replacement_is_case_insensitive() {
        assert_eq!(
            replace_ignore_case("x <MPSK-Name> y <mpsk-name>", "<mpsk-name>", "Z"),
            "x Z y Z"
        );
    }

    #[test]
    fn mpsk_name_case_is_preserved() {
        let lines = synthesize("Alice", "GW", GatewayChange::Teardown);
        assert_eq!(lines[6], "no user-role Alice");
    }

    #[test]
    fn batch_concatenates_in_order() {
        let lines = synthesize_batch(
            [("a", GatewayChange::Provision), ("b", GatewayChange::Teardown)],
            "gw",
        );
        assert_eq!(lines.len(), 15 + 10);
        assert_eq!(lines[0], "user-role a");
        assert_eq!(lines[15], "aaa derivation-rules user gw");
    }

    #[test]
    fn dedupe_keeps_first_seen_order() {
        let groups = dedupe_groups(
            ["GW-East", "GW-West", "GW-East", "", "GW-North"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(groups, vec!["GW-East", "GW-West", "GW-North"]);
    }
}
