// ── Group configuration document ──

use serde::Serialize;

use crate::block::{self, Block, BlockKind, PatchOutcome};
use crate::error::CoreError;

/// The full configuration of one group, as ordered CLI lines.
///
/// Only the block patcher rewrites `lines`; every edit goes through
/// [`upsert_block`](Self::upsert_block) or [`remove_block`](Self::remove_block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDocument {
    group: String,
    lines: Vec<String>,
}

impl ConfigDocument {
    pub fn new(group: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            group: group.into(),
            lines,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every block of `kind`, in document order.
    pub fn blocks(&self, kind: BlockKind) -> Vec<Block> {
        block::locate(&self.lines, kind.header_prefix())
    }

    /// The block of `kind` named exactly `name`.
    pub fn find_block(&self, kind: BlockKind, name: &str) -> Result<Block, CoreError> {
        self.blocks(kind)
            .into_iter()
            .find(|b| b.name == name)
            .ok_or_else(|| CoreError::not_found(&kind.to_string(), name))
    }

    /// Trimmed body lines of a located block.
    pub fn clean_body(&self, block: &Block) -> Vec<String> {
        block::clean_body(&self.lines, block)
    }

    /// Body lines of a located block, indentation kept.
    pub fn raw_body(&self, block: &Block) -> Vec<String> {
        block::raw_body(&self.lines, block)
    }

    /// Replace or insert the block `kind` / `name` with an indented body.
    pub fn upsert_block(&mut self, kind: BlockKind, name: &str, body: &[String]) -> PatchOutcome {
        block::replace(&mut self.lines, kind.header_prefix(), name, body)
    }

    /// Delete the block `kind` / `name`; `false` when it was not present.
    pub fn remove_block(&mut self, kind: BlockKind, name: &str) -> bool {
        block::remove(&mut self.lines, kind.header_prefix(), name).is_some()
    }
}
