//! # Exception Aliases
//!
//! Short alias tokens that stand in for fully-qualified error-kind names,
//! so call sites can write `"http"` instead of `"guardrail::HttpError"`.
//!
//! The table is replaced wholesale; there is no per-entry mutation. `get`
//! hands out the current table as a shared `Arc` snapshot, so a later
//! `set` installs a new table without disturbing snapshots already held.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::kind::HTTP_ERROR;

/// Alias → fully-qualified kind name.
pub type AliasTable = BTreeMap<String, String>;

/// The built-in alias table: `"http"` → [`HTTP_ERROR`].
pub fn default_aliases() -> AliasTable {
    BTreeMap::from([("http".to_string(), HTTP_ERROR.to_string())])
}

#[derive(Debug)]
pub struct AliasRegistry {
    table: RwLock<Arc<AliasTable>>,
}

impl AliasRegistry {
    pub fn new(table: AliasTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// The current table.
    pub fn get(&self) -> Arc<AliasTable> {
        Arc::clone(&self.table.read())
    }

    /// Replace the table. No validation is performed.
    pub fn set(&self, table: AliasTable) {
        *self.table.write() = Arc::new(table);
    }

    /// The kind name `token` stands for, if it is an alias.
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.table.read().get(token).cloned()
    }
}

impl Default for AliasRegistry {
    fn default() -> Self {
        Self::new(default_aliases())
    }
}
