//! Line-oriented configuration blocks.
//!
//! A group's configuration is a flat, ordered list of CLI lines. A *block*
//! is a non-indented header line (`wlan ssid-profile Corp`) followed by the
//! indented lines belonging to it:
//!
//! ```text
//! wlan ssid-profile Corp      <- start
//!   essid Corp
//!   opmode wpa2-aes
//! wlan ssid-profile Guest     <- end of Corp, start of Guest
//! ```
//!
//! - [`locate`] finds every block of one kind as `[start, end)` ranges.
//! - [`extract`] turns a block body into clean lines and scalar fields.
//! - [`patch`] replaces, inserts or removes one named block in place,
//!   leaving every other line where it was.

pub mod extract;
pub mod locate;
pub mod patch;

use std::ops::Range;

use strum::Display;

pub use extract::{clean_body, encode_body, is_decoration, raw_body, scalar_field};
pub use locate::locate;
pub use patch::{PatchOutcome, remove, replace};

/// Lines whose first two characters are spaces belong to the block above.
pub const INDENT: &str = "  ";

/// Returns `true` if `line` continues the current block.
pub fn is_indented(line: &str) -> bool {
    line.starts_with(INDENT)
}

/// The block kinds this tool edits, with their exact header prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BlockKind {
    #[strum(serialize = "WLAN")]
    Wlan,
    #[strum(serialize = "user role")]
    AccessRule,
    #[strum(serialize = "MPSK pool")]
    MpskPool,
}

impl BlockKind {
    /// Header prefix, including the trailing space before the name.
    pub const fn header_prefix(self) -> &'static str {
        match self {
            Self::Wlan => "wlan ssid-profile ",
            Self::AccessRule => "wlan access-rule ",
            Self::MpskPool => "wlan mpsk-local ",
        }
    }

    /// Full header line for a block of this kind.
    pub fn header(self, name: &str) -> String {
        format!("{}{name}", self.header_prefix())
    }
}

/// A located block: header at `start`, body `start + 1 .. end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl Block {
    pub fn new(name: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Range of the whole block, header included.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Range of the body lines.
    pub fn body_range(&self) -> Range<usize> {
        (self.start + 1).min(self.end)..self.end
    }

    /// Names containing whitespace are located but never edited.
    pub fn has_valid_name(&self) -> bool {
        !self.name.is_empty() && !self.name.contains(char::is_whitespace)
    }
}
