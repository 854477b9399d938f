//! Storage-facing collaborators of the resolver.
//!
//! The resolver never talks to a storage engine directly. It reads signing
//! material and runs scope connect statements through a [`Transaction`], and
//! verifies passwords through [`Signin`].

use crate::{ScopeDefinition, SigningKey, UserDefinition};

use sdb_core::TrustContext;

use std::collections::BTreeMap;
use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {what} {location}")]
    NotFound {
        what: String,
        location: ErrorLocation,
    },

    #[error("Storage failure: {message} {location}")]
    Backend {
        message: String,
        location: ErrorLocation,
    },

    #[error("Query failed: {message} {location}")]
    Query {
        message: String,
        location: ErrorLocation,
    },
}

impl StoreError {
    #[track_caller]
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound {
            what: what.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read-only view over the catalog, valid for one authentication attempt.
///
/// A transaction is never committed. `cancel` must be called exactly once;
/// implementations also roll back when dropped. Statements passed to
/// `execute` run on the same transaction, so an attempt never needs a
/// second connection and nothing a statement does outlives the attempt.
#[async_trait]
pub trait Transaction: Send {
    async fn get_scope(&mut self, ns: &str, db: &str, sc: &str) -> StoreResult<ScopeDefinition>;

    async fn get_scope_token(
        &mut self,
        ns: &str,
        db: &str,
        sc: &str,
        tk: &str,
    ) -> StoreResult<SigningKey>;

    async fn get_database_token(&mut self, ns: &str, db: &str, tk: &str)
    -> StoreResult<SigningKey>;

    async fn get_database_user(
        &mut self,
        ns: &str,
        db: &str,
        us: &str,
    ) -> StoreResult<UserDefinition>;

    async fn get_namespace_token(&mut self, ns: &str, tk: &str) -> StoreResult<SigningKey>;

    async fn get_namespace_user(&mut self, ns: &str, us: &str) -> StoreResult<UserDefinition>;

    /// Run `query` on behalf of `ctx`, one response per statement
    async fn execute(
        &mut self,
        ctx: &TrustContext,
        query: &str,
        vars: &Variables,
    ) -> StoreResult<Vec<QueryResponse>>;

    async fn cancel(self: Box<Self>) -> StoreResult<()>;
}

/// Source of read transactions
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn transaction(&self) -> StoreResult<Box<dyn Transaction>>;
}

/// Username/password verification for namespace and database users.
///
/// `Ok(false)` means the credentials did not match (including unknown
/// users); `Err` is reserved for storage failures.
#[async_trait]
pub trait Signin: Send + Sync {
    async fn signin_namespace(&self, ns: &str, user: &str, pass: &str) -> StoreResult<bool>;

    async fn signin_database(
        &self,
        ns: &str,
        db: &str,
        user: &str,
        pass: &str,
    ) -> StoreResult<bool>;
}

/// Named values bound into a statement
pub type Variables = BTreeMap<String, serde_json::Value>;

/// Output of one statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResponse {
    pub result: Vec<serde_json::Value>,
}
