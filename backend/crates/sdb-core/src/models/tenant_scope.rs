use serde::{Deserialize, Serialize};

/// Wildcard value meaning "any namespace" or "any database"
pub const ANY: &str = "*";

/// A namespace/database pair. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TenantScope {
    pub ns: String,
    pub db: String,
}

impl TenantScope {
    pub fn new(ns: impl Into<String>, db: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            db: db.into(),
        }
    }

    pub fn has_namespace(&self) -> bool {
        !self.ns.is_empty()
    }

    pub fn has_database(&self) -> bool {
        !self.db.is_empty()
    }
}
