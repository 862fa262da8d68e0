// ── MPSK pools ──
//
// A `wlan mpsk-local <pool>` block holds up to 24 passphrase entries, one
// per line: `  mpsk-local-passphrase <name> <passphrase> <role>`. The
// platform returns existing passphrases redacted as `********`; pushing that
// literal back leaves the stored secret untouched.

use serde::{Deserialize, Serialize};

use crate::block::{self, Block, INDENT};
use crate::error::CoreError;
use crate::model::document::ConfigDocument;

/// Maximum entries the platform accepts in one pool.
pub const MAX_POOL_ENTRIES: usize = 24;

/// How the platform returns a stored passphrase.
pub const REDACTED_PASSPHRASE: &str = "********";

const ENTRY_KEYWORD: &str = "mpsk-local-passphrase";

/// One named passphrase in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpskEntry {
    pub name: String,
    pub passphrase: String,
    pub role: String,
}

impl MpskEntry {
    /// Validated constructor: fields must be non-empty and contain no spaces.
    pub fn new(
        name: impl Into<String>,
        passphrase: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let entry = Self {
            name: name.into(),
            passphrase: passphrase.into(),
            role: role.into(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the field rules without the redaction guard.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("name", &self.name),
            ("passphrase", &self.passphrase),
            ("role", &self.role),
        ] {
            if value.is_empty() {
                return Err(CoreError::validation(format!("MPSK {field} must not be empty")));
            }
            if value.contains(char::is_whitespace) {
                return Err(CoreError::validation(format!(
                    "MPSK {field} must not contain spaces: {value:?}"
                )));
            }
        }
        Ok(())
    }

    /// Parse one pool body line. Returns `None` for anything else.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        if parts.next()? != ENTRY_KEYWORD {
            return None;
        }
        let name = parts.next()?;
        let passphrase = parts.next()?;
        let role = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            passphrase: passphrase.to_owned(),
            role: role.to_owned(),
        })
    }

    /// Pool body line, indented.
    pub fn to_line(&self) -> String {
        format!(
            "{INDENT}{ENTRY_KEYWORD} {} {} {}",
            self.name, self.passphrase, self.role
        )
    }

    pub fn is_redacted(&self) -> bool {
        self.passphrase == REDACTED_PASSPHRASE
    }
}

fn reject_redacted(passphrase: &str) -> Result<(), CoreError> {
    if passphrase == REDACTED_PASSPHRASE {
        return Err(CoreError::validation(
            "passphrase is still the redacted placeholder; enter a new passphrase",
        ));
    }
    Ok(())
}

/// How a bulk import treats the existing pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ImportMode {
    /// Update entries with matching names, append the rest while there is room.
    #[default]
    AddAndUpdate,
    /// Discard the pool and keep the first 24 imported entries.
    ReplaceAll,
}

/// Counts reported after a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    /// Entries not applied, with the reason.
    pub rejected: Vec<(String, String)>,
}

impl ImportSummary {
    pub fn changed(&self) -> bool {
        !(self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }
}

/// One body line of a pool, kept in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PoolLine {
    Entry(MpskEntry),
    /// Any other body line, re-emitted unchanged.
    Other(String),
}

impl PoolLine {
    fn entry(&self) -> Option<&MpskEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Other(_) => None,
        }
    }

    fn to_line(&self) -> String {
        match self {
            Self::Entry(entry) => entry.to_line(),
            Self::Other(line) => line.clone(),
        }
    }
}

/// A decoded `wlan mpsk-local` block.
///
/// Entries are edited where they sit; new entries go after the last
/// existing entry, so re-encoding an unchanged pool yields its body as it
/// was fetched (minus decoration lines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MpskPool {
    pub name: String,
    body: Vec<PoolLine>,
}

impl MpskPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }

    pub fn from_block(document: &ConfigDocument, block: &Block) -> Self {
        let mut pool = Self::new(block.name.clone());
        pool.body = document
            .raw_body(block)
            .into_iter()
            .map(|line| match MpskEntry::parse(&line) {
                Some(entry) => PoolLine::Entry(entry),
                None => PoolLine::Other(line),
            })
            .collect();
        pool
    }

    pub fn entries(&self) -> impl Iterator<Item = &MpskEntry> {
        self.body.iter().filter_map(PoolLine::entry)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut MpskEntry> {
        self.body.iter_mut().find_map(|line| match line {
            PoolLine::Entry(entry) if entry.name == name => Some(entry),
            _ => None,
        })
    }

    /// Body position of the entry listed at `index`.
    fn body_index(&self, index: usize) -> Option<usize> {
        self.body
            .iter()
            .enumerate()
            .filter(|(_, line)| line.entry().is_some())
            .nth(index)
            .map(|(at, _)| at)
    }

    fn push_entry(&mut self, entry: MpskEntry) {
        let at = self
            .body
            .iter()
            .rposition(|line| line.entry().is_some())
            .map_or(self.body.len(), |last| last + 1);
        self.body.insert(at, PoolLine::Entry(entry));
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_POOL_ENTRIES
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries().position(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&MpskEntry> {
        self.entries().find(|e| e.name == name)
    }

    /// Append a new entry after the last existing one.
    pub fn add(&mut self, entry: MpskEntry) -> Result<(), CoreError> {
        entry.validate()?;
        reject_redacted(&entry.passphrase)?;
        if self.position(&entry.name).is_some() {
            return Err(CoreError::validation(format!(
                "an MPSK named {} already exists in pool {}",
                entry.name, self.name
            )));
        }
        if self.is_full() {
            return Err(CoreError::validation(format!(
                "pool {} already holds the maximum of {MAX_POOL_ENTRIES} MPSKs",
                self.name
            )));
        }
        self.push_entry(entry);
        Ok(())
    }

    /// Change the passphrase of an existing entry.
    pub fn update_passphrase(&mut self, name: &str, passphrase: &str) -> Result<(), CoreError> {
        reject_redacted(passphrase)?;
        let pool = self.name.clone();
        let entry = self
            .entry_mut(name)
            .ok_or_else(|| CoreError::not_found("MPSK", format!("{name} in pool {pool}")))?;
        let candidate = MpskEntry {
            passphrase: passphrase.to_owned(),
            ..entry.clone()
        };
        candidate.validate()?;
        *entry = candidate;
        Ok(())
    }

    /// Remove the entry at `index` (as listed).
    pub fn remove_at(&mut self, index: usize) -> Result<MpskEntry, CoreError> {
        let Some(at) = self.body_index(index) else {
            return Err(CoreError::not_found(
                "MPSK",
                format!("index {index} in pool {} ({} entries)", self.name, self.len()),
            ));
        };
        match self.body.remove(at) {
            PoolLine::Entry(entry) => Ok(entry),
            PoolLine::Other(line) => Err(CoreError::Internal(format!(
                "pool line {line:?} is not an entry"
            ))),
        }
    }

    /// Remove the entry called `name`.
    pub fn remove_named(&mut self, name: &str) -> Result<MpskEntry, CoreError> {
        let index = self
            .position(name)
            .ok_or_else(|| CoreError::not_found("MPSK", format!("{name} in pool {}", self.name)))?;
        self.remove_at(index)
    }

    /// Merge imported entries into the pool.
    pub fn import(&mut self, entries: Vec<MpskEntry>, mode: ImportMode) -> ImportSummary {
        match mode {
            ImportMode::AddAndUpdate => self.add_and_update(entries),
            ImportMode::ReplaceAll => self.replace_all(entries),
        }
    }

    fn add_and_update(&mut self, entries: Vec<MpskEntry>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for entry in entries {
            if let Err(e) = entry.validate() {
                summary.rejected.push((entry.name, e.to_string()));
                continue;
            }
            let full = self.is_full();
            if let Some(existing) = self.entry_mut(&entry.name) {
                if entry.is_redacted() || *existing == entry {
                    continue;
                }
                summary.updated.push(entry.name.clone());
                *existing = entry;
            } else if entry.is_redacted() {
                summary
                    .rejected
                    .push((entry.name, "redacted passphrase for a new MPSK".into()));
            } else if full {
                summary
                    .rejected
                    .push((entry.name, format!("pool is full ({MAX_POOL_ENTRIES})")));
            } else {
                summary.added.push(entry.name.clone());
                self.push_entry(entry);
            }
        }
        summary
    }

    fn replace_all(&mut self, entries: Vec<MpskEntry>) -> ImportSummary {
        let previous: Vec<MpskEntry> = self.entries().cloned().collect();
        let first_entry = self.body.iter().position(|line| line.entry().is_some());
        self.body.retain(|line| line.entry().is_none());
        let mut insert_at = first_entry.unwrap_or(self.body.len());
        let mut kept: Vec<MpskEntry> = Vec::new();
        let mut summary = ImportSummary::default();

        for entry in entries {
            if let Err(e) = entry.validate() {
                summary.rejected.push((entry.name, e.to_string()));
            } else if kept.iter().any(|k| k.name == entry.name) {
                summary
                    .rejected
                    .push((entry.name, "duplicate name in import".into()));
            } else if entry.is_redacted() && !previous.iter().any(|p| p.name == entry.name) {
                summary
                    .rejected
                    .push((entry.name, "redacted passphrase for a new MPSK".into()));
            } else if kept.len() >= MAX_POOL_ENTRIES {
                summary
                    .rejected
                    .push((entry.name, format!("pool is full ({MAX_POOL_ENTRIES})")));
            } else {
                match previous.iter().find(|p| p.name == entry.name) {
                    Some(old) if *old == entry || entry.is_redacted() => {}
                    Some(_) => summary.updated.push(entry.name.clone()),
                    None => summary.added.push(entry.name.clone()),
                }
                kept.push(entry);
            }
        }

        summary.removed = previous
            .into_iter()
            .filter(|p| !kept.iter().any(|k| k.name == p.name))
            .map(|p| p.name)
            .collect();
        for entry in kept {
            self.body.insert(insert_at, PoolLine::Entry(entry));
            insert_at += 1;
        }
        summary
    }

    /// Pool body lines, indented, in their original order.
    pub fn encoded_body(&self) -> Vec<String> {
        self.body.iter().map(PoolLine::to_line).collect()
    }
}
