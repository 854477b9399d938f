use crate::{
    AuthError, QueryResponse, Result as AuthErrorResult, ScopeDefinition, SigningKey, StoreError,
    Transaction, UserDefinition, Variables,
};

use sdb_core::TrustContext;

use std::collections::HashMap;
use std::panic::Location;

use error_location::ErrorLocation;
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LookupKey {
    Scope { ns: String, db: String, sc: String },
    ScopeToken { ns: String, db: String, sc: String, tk: String },
    DatabaseToken { ns: String, db: String, tk: String },
    DatabaseUser { ns: String, db: String, us: String },
    NamespaceToken { ns: String, tk: String },
    NamespaceUser { ns: String, us: String },
}

/// Memoizing view over one read transaction, scoped to one bearer attempt.
///
/// Lookups that miss, or hit a storage error, fail as `CredentialsFailed`.
/// Statements run through [`KeyCache::execute`] share the same transaction
/// and are never memoized. [`KeyCache::release`] cancels the transaction; calling it again is a no-op.
pub struct KeyCache {
    tx: Option<Box<dyn Transaction>>,
    scopes: HashMap<LookupKey, ScopeDefinition>,
    keys: HashMap<LookupKey, SigningKey>,
    users: HashMap<LookupKey, UserDefinition>,
}

impl KeyCache {
    pub fn new(tx: Box<dyn Transaction>) -> Self {
        Self {
            tx: Some(tx),
            scopes: HashMap::new(),
            keys: HashMap::new(),
            users: HashMap::new(),
        }
    }

    pub fn is_released(&self) -> bool {
        self.tx.is_none()
    }

    pub async fn scope(&mut self, ns: &str, db: &str, sc: &str) -> AuthErrorResult<ScopeDefinition> {
        let key = LookupKey::Scope {
            ns: ns.to_string(),
            db: db.to_string(),
            sc: sc.to_string(),
        };
        if let Some(found) = self.scopes.get(&key) {
            return Ok(found.clone());
        }

        let found = self
            .tx()?
            .get_scope(ns, db, sc)
            .await
            .map_err(|e| lookup_failed("scope", e))?;
        self.scopes.insert(key, found.clone());
        Ok(found)
    }

    pub async fn scope_token(
        &mut self,
        ns: &str,
        db: &str,
        sc: &str,
        tk: &str,
    ) -> AuthErrorResult<SigningKey> {
        let key = LookupKey::ScopeToken {
            ns: ns.to_string(),
            db: db.to_string(),
            sc: sc.to_string(),
            tk: tk.to_string(),
        };
        if let Some(found) = self.keys.get(&key) {
            return Ok(found.clone());
        }

        let found = self
            .tx()?
            .get_scope_token(ns, db, sc, tk)
            .await
            .map_err(|e| lookup_failed("scope token", e))?;
        self.keys.insert(key, found.clone());
        Ok(found)
    }

    pub async fn database_token(
        &mut self,
        ns: &str,
        db: &str,
        tk: &str,
    ) -> AuthErrorResult<SigningKey> {
        let key = LookupKey::DatabaseToken {
            ns: ns.to_string(),
            db: db.to_string(),
            tk: tk.to_string(),
        };
        if let Some(found) = self.keys.get(&key) {
            return Ok(found.clone());
        }

        let found = self
            .tx()?
            .get_database_token(ns, db, tk)
            .await
            .map_err(|e| lookup_failed("database token", e))?;
        self.keys.insert(key, found.clone());
        Ok(found)
    }

    pub async fn database_user(
        &mut self,
        ns: &str,
        db: &str,
        us: &str,
    ) -> AuthErrorResult<UserDefinition> {
        let key = LookupKey::DatabaseUser {
            ns: ns.to_string(),
            db: db.to_string(),
            us: us.to_string(),
        };
        if let Some(found) = self.users.get(&key) {
            return Ok(found.clone());
        }

        let found = self
            .tx()?
            .get_database_user(ns, db, us)
            .await
            .map_err(|e| lookup_failed("database user", e))?;
        self.users.insert(key, found.clone());
        Ok(found)
    }

    pub async fn namespace_token(&mut self, ns: &str, tk: &str) -> AuthErrorResult<SigningKey> {
        let key = LookupKey::NamespaceToken {
            ns: ns.to_string(),
            tk: tk.to_string(),
        };
        if let Some(found) = self.keys.get(&key) {
            return Ok(found.clone());
        }

        let found = self
            .tx()?
            .get_namespace_token(ns, tk)
            .await
            .map_err(|e| lookup_failed("namespace token", e))?;
        self.keys.insert(key, found.clone());
        Ok(found)
    }

    pub async fn namespace_user(&mut self, ns: &str, us: &str) -> AuthErrorResult<UserDefinition> {
        let key = LookupKey::NamespaceUser {
            ns: ns.to_string(),
            us: us.to_string(),
        };
        if let Some(found) = self.users.get(&key) {
            return Ok(found.clone());
        }

        let found = self
            .tx()?
            .get_namespace_user(ns, us)
            .await
            .map_err(|e| lookup_failed("namespace user", e))?;
        self.users.insert(key, found.clone());
        Ok(found)
    }

    /// Run `query` on the attempt's transaction
    pub async fn execute(
        &mut self,
        ctx: &TrustContext,
        query: &str,
        vars: &Variables,
    ) -> AuthErrorResult<Vec<QueryResponse>> {
        self.tx()?.execute(ctx, query, vars).await.map_err(|e| {
            warn!(
                "Statement failed in {}/{}: {e}",
                ctx.selected.ns, ctx.selected.db
            );
            AuthError::CredentialsFailed {
                message: "statement failed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    /// Cancel the underlying transaction. Nothing read through it is ever committed.
    pub async fn release(&mut self) {
        if let Some(tx) = self.tx.take() {
            match tx.cancel().await {
                Ok(()) => debug!("Key lookup transaction cancelled"),
                Err(e) => warn!("Failed to cancel key lookup transaction: {e}"),
            }
        }
    }

    #[track_caller]
    fn tx(&mut self) -> AuthErrorResult<&mut Box<dyn Transaction>> {
        self.tx.as_mut().ok_or_else(|| AuthError::Internal {
            message: "key lookup after the transaction was released".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Drop for KeyCache {
    fn drop(&mut self) {
        if self.tx.is_some() {
            warn!("Key lookup transaction dropped without being cancelled");
        }
    }
}

#[track_caller]
fn lookup_failed(what: &str, err: StoreError) -> AuthError {
    if err.is_not_found() {
        debug!("No {what} matches the token claims");
    } else {
        warn!("Failed to read {what}: {err}");
    }

    AuthError::CredentialsFailed {
        message: format!("{what} could not be resolved"),
        location: ErrorLocation::from(Location::caller()),
    }
}
