// ── Block body extraction ──

use super::{Block, INDENT};

/// Lines the platform emits for display only (`utf8` ESSID encodings,
/// `index` ordering hints). They are never part of a record body.
pub fn is_decoration(line: &str) -> bool {
    line.contains("utf8") || line.contains("index ")
}

fn body_lines<'a>(lines: &'a [String], block: &Block) -> impl Iterator<Item = &'a String> {
    lines
        .get(block.body_range())
        .unwrap_or_default()
        .iter()
        .filter(|line| !is_decoration(line))
}

/// Body lines trimmed of indentation, decorations removed.
pub fn clean_body(lines: &[String], block: &Block) -> Vec<String> {
    body_lines(lines, block)
        .map(|line| line.trim().to_owned())
        .collect()
}

/// Body lines as they appear in the document, decorations removed.
pub fn raw_body(lines: &[String], block: &Block) -> Vec<String> {
    body_lines(lines, block).cloned().collect()
}

/// Re-indent clean body lines for insertion under a header.
pub fn encode_body<S: AsRef<str>>(clean: &[S]) -> Vec<String> {
    clean
        .iter()
        .map(|line| format!("{INDENT}{}", line.as_ref().trim()))
        .collect()
}

/// Value following `token` in the newline-joined body, up to the next newline.
///
/// `token` includes its trailing space (`"essid "`), so `essid` does not
/// match `essid-utf8`-style keys.
pub fn scalar_field<S: AsRef<str>>(clean: &[S], token: &str) -> Option<String> {
    let text = clean
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    let at = text.find(token)? + token.len();
    let rest = text.get(at..)?;
    let value = rest.split('\n').next().unwrap_or_default().trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn clean_body_trims_and_drops_decorations() {
        let lines = doc(&[
            "wlan ssid-profile A",
            "  essid A-ssid",
            "  utf8 essid",
            "  index 3",
            "  opmode mpsk-local",
        ]);
        let block = Block::new("A", 0, 5);
        assert_eq!(clean_body(&lines, &block), vec!["essid A-ssid", "opmode mpsk-local"]);
        assert_eq!(
            raw_body(&lines, &block),
            vec!["  essid A-ssid", "  opmode mpsk-local"]
        );
    }

    #[test]
    fn out_of_range_block_yields_nothing() {
        let lines = doc(&["wlan ssid-profile A"]);
        assert!(clean_body(&lines, &Block::new("A", 4, 9)).is_empty());
    }

    #[test]
    fn scalar_fields_read_to_end_of_line() {
        let body = ["essid A-ssid", "gw-profile GW1", "mpsk-local P"];
        assert_eq!(scalar_field(&body, "essid ").as_deref(), Some("A-ssid"));
        assert_eq!(scalar_field(&body, "gw-profile ").as_deref(), Some("GW1"));
        assert_eq!(scalar_field(&body, "mpsk-local ").as_deref(), Some("P"));
        assert_eq!(scalar_field(&body, "zone "), None);
    }

    #[test]
    fn scalar_field_at_end_of_text() {
        assert_eq!(
            scalar_field(&["opmode wpa2-aes", "essid Last"], "essid ").as_deref(),
            Some("Last")
        );
    }

    #[test]
    fn encode_body_indents_each_line() {
        assert_eq!(
            encode_body(&["essid A", " opmode wpa2-aes "]),
            vec!["  essid A", "  opmode wpa2-aes"]
        );
    }
}
