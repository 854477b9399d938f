//! In-memory collaborators for resolver tests.

use crate::{
    Datastore, QueryResponse, ScopeDefinition, Signin, SigningKey, StoreError, StoreResult,
    Transaction, UserDefinition, Variables,
};

use sdb_core::TrustContext;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;

pub const SCOPE_SECRET: &str = "scope-signing-code";
pub const TOKEN_SECRET: &str = "named-token-secret";
pub const USER_SECRET: &str = "user-signing-code";

/// Signing material and definitions, keyed by `/`-joined path
#[derive(Default)]
pub struct Catalog {
    pub scopes: HashMap<String, ScopeDefinition>,
    pub scope_tokens: HashMap<String, SigningKey>,
    pub database_tokens: HashMap<String, SigningKey>,
    pub database_users: HashMap<String, UserDefinition>,
    pub namespace_tokens: HashMap<String, SigningKey>,
    pub namespace_users: HashMap<String, UserDefinition>,
    /// Canned output of every executed statement
    pub statement_responses: Vec<QueryResponse>,
    pub statement_fails: bool,
}

impl Catalog {
    pub fn with_scope(mut self, ns: &str, db: &str, sc: &str, connect: Option<&str>) -> Self {
        self.scopes.insert(
            format!("{ns}/{db}/{sc}"),
            ScopeDefinition {
                name: sc.to_string(),
                code: SCOPE_SECRET.to_string(),
                connect: connect.map(String::from),
            },
        );
        self
    }

    pub fn with_scope_token(mut self, path: &str, algorithm: Algorithm) -> Self {
        self.scope_tokens
            .insert(path.to_string(), SigningKey::new(algorithm, TOKEN_SECRET));
        self
    }

    pub fn with_database_token(mut self, path: &str, algorithm: Algorithm) -> Self {
        self.database_tokens
            .insert(path.to_string(), SigningKey::new(algorithm, TOKEN_SECRET));
        self
    }

    pub fn with_database_user(mut self, path: &str) -> Self {
        self.database_users.insert(path.to_string(), user(path));
        self
    }

    pub fn with_namespace_token(mut self, path: &str, algorithm: Algorithm) -> Self {
        self.namespace_tokens
            .insert(path.to_string(), SigningKey::new(algorithm, TOKEN_SECRET));
        self
    }

    pub fn with_namespace_user(mut self, path: &str) -> Self {
        self.namespace_users.insert(path.to_string(), user(path));
        self
    }

    /// Statements return a single result holding `records`
    pub fn with_statement_result(self, records: Vec<Value>) -> Self {
        self.with_statement_responses(vec![QueryResponse { result: records }])
    }

    pub fn with_statement_responses(mut self, responses: Vec<QueryResponse>) -> Self {
        self.statement_responses = responses;
        self
    }

    pub fn with_failing_statements(mut self) -> Self {
        self.statement_fails = true;
        self
    }
}

fn user(path: &str) -> UserDefinition {
    UserDefinition {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        code: USER_SECRET.to_string(),
    }
}

fn lookup<T: Clone>(map: &HashMap<String, T>, path: String) -> StoreResult<T> {
    map.get(&path)
        .cloned()
        .ok_or_else(|| StoreError::not_found(path))
}

type Executed = (TrustContext, String, Variables);

/// Counts transaction begins, cancels and lookups, and records executed statements
#[derive(Clone, Default)]
pub struct TxCounters {
    pub begins: Arc<AtomicUsize>,
    pub cancels: Arc<AtomicUsize>,
    pub lookups: Arc<AtomicUsize>,
    pub statements: Arc<Mutex<Vec<Executed>>>,
}

impl TxCounters {
    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn statements(&self) -> Vec<Executed> {
        self.statements.lock().unwrap().clone()
    }
}

pub struct MockDatastore {
    catalog: Arc<Catalog>,
    pub counters: TxCounters,
    pub fail_begin: bool,
}

impl MockDatastore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            counters: TxCounters::default(),
            fail_begin: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_begin: true,
            ..Self::new(Catalog::default())
        }
    }
}

#[async_trait]
impl Datastore for MockDatastore {
    async fn transaction(&self) -> StoreResult<Box<dyn Transaction>> {
        if self.fail_begin {
            return Err(StoreError::backend("datastore unavailable"));
        }
        self.counters.begins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockTransaction {
            catalog: Arc::clone(&self.catalog),
            counters: self.counters.clone(),
        }))
    }
}

pub struct MockTransaction {
    catalog: Arc<Catalog>,
    counters: TxCounters,
}

impl MockTransaction {
    pub fn new(catalog: Catalog, counters: TxCounters) -> Self {
        Self {
            catalog: Arc::new(catalog),
            counters,
        }
    }

    fn count(&self) {
        self.counters.lookups.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn get_scope(&mut self, ns: &str, db: &str, sc: &str) -> StoreResult<ScopeDefinition> {
        self.count();
        lookup(&self.catalog.scopes, format!("{ns}/{db}/{sc}"))
    }

    async fn get_scope_token(
        &mut self,
        ns: &str,
        db: &str,
        sc: &str,
        tk: &str,
    ) -> StoreResult<SigningKey> {
        self.count();
        lookup(&self.catalog.scope_tokens, format!("{ns}/{db}/{sc}/{tk}"))
    }

    async fn get_database_token(
        &mut self,
        ns: &str,
        db: &str,
        tk: &str,
    ) -> StoreResult<SigningKey> {
        self.count();
        lookup(&self.catalog.database_tokens, format!("{ns}/{db}/{tk}"))
    }

    async fn get_database_user(
        &mut self,
        ns: &str,
        db: &str,
        us: &str,
    ) -> StoreResult<UserDefinition> {
        self.count();
        lookup(&self.catalog.database_users, format!("{ns}/{db}/{us}"))
    }

    async fn get_namespace_token(&mut self, ns: &str, tk: &str) -> StoreResult<SigningKey> {
        self.count();
        lookup(&self.catalog.namespace_tokens, format!("{ns}/{tk}"))
    }

    async fn get_namespace_user(&mut self, ns: &str, us: &str) -> StoreResult<UserDefinition> {
        self.count();
        lookup(&self.catalog.namespace_users, format!("{ns}/{us}"))
    }

    async fn execute(
        &mut self,
        ctx: &TrustContext,
        query: &str,
        vars: &Variables,
    ) -> StoreResult<Vec<QueryResponse>> {
        self.counters.statements.lock().unwrap().push((
            ctx.clone(),
            query.to_string(),
            vars.clone(),
        ));
        if self.catalog.statement_fails {
            return Err(StoreError::query("statement failed"));
        }
        Ok(self.catalog.statement_responses.clone())
    }

    async fn cancel(self: Box<Self>) -> StoreResult<()> {
        self.counters.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Password checks against fixed user tables, recording the order of attempts
#[derive(Default)]
pub struct MockSignin {
    pub namespace_users: HashMap<(String, String), String>,
    pub database_users: HashMap<(String, String, String), String>,
    pub calls: Mutex<Vec<&'static str>>,
    pub fail: bool,
}

impl MockSignin {
    pub fn with_namespace_user(mut self, ns: &str, user: &str, pass: &str) -> Self {
        self.namespace_users
            .insert((ns.to_string(), user.to_string()), pass.to_string());
        self
    }

    pub fn with_database_user(mut self, ns: &str, db: &str, user: &str, pass: &str) -> Self {
        self.database_users.insert(
            (ns.to_string(), db.to_string(), user.to_string()),
            pass.to_string(),
        );
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signin for MockSignin {
    async fn signin_namespace(&self, ns: &str, user: &str, pass: &str) -> StoreResult<bool> {
        self.calls.lock().unwrap().push("namespace");
        if self.fail {
            return Err(StoreError::backend("signin store unavailable"));
        }
        Ok(self
            .namespace_users
            .get(&(ns.to_string(), user.to_string()))
            .is_some_and(|expected| expected == pass))
    }

    async fn signin_database(
        &self,
        ns: &str,
        db: &str,
        user: &str,
        pass: &str,
    ) -> StoreResult<bool> {
        self.calls.lock().unwrap().push("database");
        if self.fail {
            return Err(StoreError::backend("signin store unavailable"));
        }
        Ok(self
            .database_users
            .get(&(ns.to_string(), db.to_string(), user.to_string()))
            .is_some_and(|expected| expected == pass))
    }
}

/// Far enough ahead that no test token expires mid-run
pub fn later() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

pub fn sign(claims: &Value, algorithm: Algorithm, secret: &str) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Token with an arbitrary header algorithm and a junk signature
pub fn unsigned(alg: &str, claims: &Value) -> String {
    let header = serde_json::json!({ "alg": alg, "typ": "JWT" });
    format!(
        "{}.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}
