// ── AP user roles ──

use serde::Serialize;

use crate::block::{self, Block};
use crate::model::document::ConfigDocument;

/// ACL applied to a role created on demand for a new MPSK.
pub const DEFAULT_ROLE_ACL: &str = "rule any any match any any any permit";

/// A `wlan access-rule <name>` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRole {
    pub name: String,
    pub acls: Vec<String>,
}

impl UserRole {
    pub fn new(name: impl Into<String>, acls: Vec<String>) -> Self {
        Self {
            name: name.into(),
            acls,
        }
    }

    /// A permit-all role, as created for a new MPSK entry.
    pub fn permit_all(name: impl Into<String>) -> Self {
        Self::new(name, vec![DEFAULT_ROLE_ACL.to_owned()])
    }

    pub fn from_block(document: &ConfigDocument, block: &Block) -> Self {
        Self::new(block.name.clone(), document.clean_body(block))
    }

    pub fn encoded_body(&self) -> Vec<String> {
        block::encode_body(&self.acls)
    }
}
