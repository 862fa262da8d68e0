// ── Multi-group WLAN catalog ──
//
// Every WLAN profile across the fetched groups. Profiles with the same name
// and an identical clean body collapse into one entry listing all of its
// groups; a profile that differs by even one line stays a separate variant.

use indexmap::IndexMap;

use crate::block::BlockKind;
use crate::model::{ConfigDocument, WlanRecord};

#[derive(Debug, Clone, Default)]
pub struct WlanCatalog {
    by_name: IndexMap<String, Vec<WlanRecord>>,
}

impl WlanCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from several group documents.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a ConfigDocument>) -> Self {
        let mut catalog = Self::new();
        for document in documents {
            catalog.ingest(document);
        }
        catalog
    }

    /// Add every WLAN of `document`, merging structurally equal copies.
    pub fn ingest(&mut self, document: &ConfigDocument) {
        for block in document.blocks(BlockKind::Wlan) {
            if !block.has_valid_name() {
                continue;
            }
            self.insert(WlanRecord::from_block(document, &block));
        }
    }

    fn insert(&mut self, record: WlanRecord) {
        let variants = self.by_name.entry(record.name.clone()).or_default();
        match variants.iter_mut().find(|v| v.lines == record.lines) {
            Some(existing) => existing.groups.extend(record.groups),
            None => variants.push(record),
        }
    }

    /// All records, grouped by name in first-seen order.
    pub fn records(&self) -> impl Iterator<Item = &WlanRecord> {
        self.by_name.values().flatten()
    }

    /// Every variant of the WLAN called `name`.
    pub fn variants(&self, name: &str) -> &[WlanRecord] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn document(group: &str, lines: &[&str]) -> ConfigDocument {
        ConfigDocument::new(group, lines.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn identical_bodies_merge_groups() {
        let body = ["wlan ssid-profile Corp", "  essid Corp", "  opmode wpa2-aes"];
        let catalog = WlanCatalog::from_documents(&[
            document("Branch", &body),
            document("Campus", &body),
        ]);
        assert_eq!(catalog.len(), 1);
        let groups: Vec<_> = catalog.variants("Corp")[0].groups.iter().cloned().collect();
        assert_eq!(groups, vec!["Branch", "Campus"]);
    }

    #[test]
    fn one_differing_line_keeps_two_records() {
        let catalog = WlanCatalog::from_documents(&[
            document("Branch", &["wlan ssid-profile Corp", "  essid Corp", "  opmode wpa2-aes"]),
            document("Campus", &["wlan ssid-profile Corp", "  essid Corp", "  opmode wpa3-sae-aes"]),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.variants("Corp").len(), 2);
    }

    #[test]
    fn decorations_do_not_break_equality() {
        let catalog = WlanCatalog::from_documents(&[
            document("Branch", &["wlan ssid-profile Corp", "  essid Corp", "  utf8"]),
            document("Campus", &["wlan ssid-profile Corp", "  essid Corp"]),
        ]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn catalog_keeps_non_mpsk_and_skips_spaced_names() {
        let catalog = WlanCatalog::from_documents(&[document(
            "Branch",
            &[
                "wlan ssid-profile Corp",
                "  opmode wpa2-aes",
                "wlan ssid-profile Guest WiFi",
                "  opmode opensystem",
            ],
        )]);
        let names: Vec<_> = catalog.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Corp"]);
        assert!(catalog.variants("Guest WiFi").is_empty());
    }
}
