// ── Block location ──
//
// Single left-to-right scan over a document. Blocks of one kind are
// expected to sit in one contiguous run: once a block closes on a line
// that is not another header of the same kind, the scan stops.

use tracing::trace;

use super::{Block, is_indented};

/// Find every block whose header starts with `header_prefix`.
///
/// Lines before the first matching header are skipped. A block ends at the
/// first following line that is not indented; if that line is another
/// header of the kind, a new block opens there, otherwise scanning stops.
/// A block still open at the end of the document ends at `lines.len()`.
pub fn locate(lines: &[String], header_prefix: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open: Option<(usize, &str)> = None;

    for (idx, line) in lines.iter().enumerate() {
        match open {
            None => {
                if let Some(name) = line.strip_prefix(header_prefix) {
                    open = Some((idx, name));
                }
            }
            Some((start, name)) => {
                if is_indented(line) {
                    continue;
                }
                blocks.push(Block::new(name, start, idx));
                if let Some(next) = line.strip_prefix(header_prefix) {
                    open = Some((idx, next));
                } else {
                    trace!(header_prefix, stop = idx, "end of contiguous block run");
                    return blocks;
                }
            }
        }
    }

    if let Some((start, name)) = open {
        blocks.push(Block::new(name, start, lines.len()));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const WLAN: &str = "wlan ssid-profile ";

    fn doc(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_document_has_no_blocks() {
        assert!(locate(&[], WLAN).is_empty());
    }

    #[test]
    fn single_block_between_other_lines() {
        let lines = doc(&[
            "other 1",
            "wlan ssid-profile A",
            "  essid A-ssid",
            "  opmode mpsk-local",
            "  forward-mode l2",
            "  gw-profile gw1",
            "  mpsk-local P",
            "other 2",
        ]);
        assert_eq!(locate(&lines, WLAN), vec![Block::new("A", 1, 7)]);
    }

    #[test]
    fn consecutive_blocks_are_all_found() {
        let lines = doc(&[
            "wlan ssid-profile A",
            "  essid A",
            "wlan ssid-profile B",
            "  essid B",
            "wlan ssid-profile C",
        ]);
        assert_eq!(
            locate(&lines, WLAN),
            vec![
                Block::new("A", 0, 2),
                Block::new("B", 2, 4),
                Block::new("C", 4, 5),
            ]
        );
    }

    #[test]
    fn scan_stops_after_contiguous_run() {
        let lines = doc(&[
            "wlan ssid-profile A",
            "  essid A",
            "ap-group default",
            "wlan ssid-profile B",
            "  essid B",
        ]);
        assert_eq!(locate(&lines, WLAN), vec![Block::new("A", 0, 2)]);
    }

    #[test]
    fn header_without_body_spans_one_line() {
        let lines = doc(&["wlan ssid-profile A", "wlan ssid-profile B", "  essid B"]);
        let blocks = locate(&lines, WLAN);
        assert_eq!(blocks[0], Block::new("A", 0, 1));
        assert!(blocks[0].body_range().is_empty());
    }

    #[test]
    fn names_with_spaces_are_still_located() {
        let lines = doc(&["wlan ssid-profile Guest WiFi", "  essid Guest"]);
        let blocks = locate(&lines, WLAN);
        assert_eq!(blocks, vec![Block::new("Guest WiFi", 0, 2)]);
        assert!(!blocks[0].has_valid_name());
    }

    #[test]
    fn other_kinds_do_not_match() {
        let lines = doc(&[
            "wlan access-rule staff",
            "  rule any any match any any any permit",
            "wlan mpsk-local pool",
            "  mpsk-local-passphrase alice s3cret alice",
        ]);
        assert!(locate(&lines, WLAN).is_empty());
        assert_eq!(
            locate(&lines, "wlan mpsk-local "),
            vec![Block::new("pool", 2, 4)]
        );
    }
}
