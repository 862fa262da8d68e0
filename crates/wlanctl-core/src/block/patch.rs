// ── Block patching ──
//
// Edits one named block of a document in place. Positions are recomputed
// from the current document on every call, so a caller never holds stale
// indices across edits.

use std::ops::Range;

use tracing::debug;

use super::is_indented;

/// What [`replace`] did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// An existing block occupying `replaced` was swapped out at its start.
    Replaced { replaced: Range<usize> },
    /// No block of that name existed; the new one was inserted at `at`.
    Inserted { at: usize },
}

/// Positions found by one pass over the document.
struct Scan {
    /// Index of the exact header line.
    start: Option<usize>,
    /// First non-indented line after `start`.
    end: Option<usize>,
    /// First line containing the header prefix anywhere in the document.
    first_of_kind: Option<usize>,
}

fn scan(lines: &[String], header_prefix: &str, header: &str) -> Scan {
    let mut found = Scan {
        start: None,
        end: None,
        first_of_kind: None,
    };

    for (idx, line) in lines.iter().enumerate() {
        if found.first_of_kind.is_none() && line.contains(header_prefix) {
            found.first_of_kind = Some(idx);
        }
        if found.start.is_none() {
            if line == header {
                found.start = Some(idx);
            }
        } else if found.end.is_none() && !is_indented(line) {
            found.end = Some(idx);
            break;
        }
    }
    found
}

/// Replace the block `header_prefix + name` with `new_body`, or insert it.
///
/// An existing block is removed and the new one spliced in at the same
/// position. A missing block is inserted before the first line mentioning
/// the prefix, or appended when the document has none. `new_body` must
/// already carry its indentation (see [`encode_body`](super::encode_body)).
pub fn replace(
    lines: &mut Vec<String>,
    header_prefix: &str,
    name: &str,
    new_body: &[String],
) -> PatchOutcome {
    let header = format!("{header_prefix}{name}");
    let found = scan(lines, header_prefix, &header);

    let block = std::iter::once(header).chain(new_body.iter().cloned());

    if let Some(start) = found.start {
        let end = found.end.unwrap_or(lines.len());
        lines.splice(start..end, block);
        debug!(name, start, end, "replaced block");
        PatchOutcome::Replaced {
            replaced: start..end,
        }
    } else {
        let at = found.first_of_kind.unwrap_or(lines.len());
        lines.splice(at..at, block);
        debug!(name, at, "inserted block");
        PatchOutcome::Inserted { at }
    }
}

/// Remove the block `header_prefix + name`.
///
/// Returns the removed range, or `None` when no such header exists.
pub fn remove(lines: &mut Vec<String>, header_prefix: &str, name: &str) -> Option<Range<usize>> {
    let header = format!("{header_prefix}{name}");
    let found = scan(lines, header_prefix, &header);
    let start = found.start?;
    let end = found.end.unwrap_or(lines.len());
    lines.drain(start..end);
    debug!(name, start, end, "removed block");
    Some(start..end)
}
