use crate::{ANY, AuthLevel, Identity, TenantScope};

use serde::{Deserialize, Serialize};

/// Per-request authentication outcome.
///
/// Created unauthenticated at the start of a request, filled in by the
/// resolver, then handed read-only to everything downstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrustContext {
    pub kind: AuthLevel,
    /// Widest tenant scope the caller may use
    pub possible: TenantScope,
    /// Tenant scope the request asked for, pinned once authenticated
    pub selected: TenantScope,
    /// Authenticated scope name, only at scope level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Bound principal, only at scope level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

impl TrustContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthetic database-level context used to run a scope's connect statement
    pub fn database(ns: &str, db: &str) -> Self {
        Self {
            kind: AuthLevel::Database,
            possible: TenantScope::new(ns, db),
            selected: TenantScope::new(ns, db),
            scope: None,
            identity: None,
        }
    }

    /// Record a requested namespace as both selected and possible
    pub fn select_namespace(&mut self, ns: &str) {
        self.selected.ns = ns.to_string();
        self.possible.ns = ns.to_string();
    }

    /// Record a requested database as both selected and possible
    pub fn select_database(&mut self, db: &str) {
        self.selected.db = db.to_string();
        self.possible.db = db.to_string();
    }

    pub fn grant_root(&mut self) {
        self.kind = AuthLevel::Root;
        self.possible = TenantScope::new(ANY, ANY);
    }

    pub fn is_authenticated(&self) -> bool {
        self.kind.is_authenticated()
    }
}
