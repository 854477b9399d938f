#![allow(dead_code)]

//! Test infrastructure for sdb-server integration tests

use sdb_auth::{AuthSettings, Authenticator, RootCredentials};
use sdb_config::Network;
use sdb_db::{SqliteDatastore, open_catalog};
use sdb_server::{AppState, build_router};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::connect_info::MockConnectInfo;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;
use tempfile::TempDir;

pub const ROOT_USER: &str = "root";
pub const ROOT_PASS: &str = "root-pass";
pub const SCOPE_SECRET: &str = "scope-signing-secret";

/// Router over a populated catalog. The directory must outlive the router.
pub struct TestApp {
    pub router: Router,
    pub datastore: SqliteDatastore,
    _dir: TempDir,
}

/// Build the app as if every request came from `peer`.
///
/// The catalog holds namespace user `acme/alice`, database user
/// `acme/sales/bob`, and scope `acme/sales/user` whose connect statement
/// looks the caller up in a `person` table.
pub async fn create_test_app(peer: &str) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pool = open_catalog(&dir.path().join("catalog.db"))
        .await
        .expect("Failed to open catalog");
    let datastore = SqliteDatastore::new(pool);

    seed(&datastore).await;

    let settings = AuthSettings {
        root: Some(RootCredentials {
            user: ROOT_USER.to_string(),
            pass: ROOT_PASS.to_string(),
        }),
        allowed_networks: vec!["127.0.0.1/32".parse::<Network>().unwrap()],
    };
    let shared = Arc::new(datastore.clone());
    let authenticator = Authenticator::new(settings, shared.clone(), shared);

    let addr: SocketAddr = peer.parse().expect("Invalid peer address");
    let router = build_router(AppState::new(authenticator)).layer(MockConnectInfo(addr));

    TestApp {
        router,
        datastore,
        _dir: dir,
    }
}

async fn seed(datastore: &SqliteDatastore) {
    datastore
        .define_namespace_user("acme", "alice", "secret", "alice-code")
        .await
        .unwrap();
    datastore
        .define_database_user("acme", "sales", "bob", "pw", "bob-code")
        .await
        .unwrap();
    datastore
        .define_scope(
            "acme",
            "sales",
            "user",
            SCOPE_SECRET,
            Some("SELECT id, name FROM person WHERE id = $id"),
        )
        .await
        .unwrap();

    sqlx::query("CREATE TABLE person (id TEXT PRIMARY KEY, name TEXT NOT NULL)")
        .execute(datastore.pool())
        .await
        .unwrap();
    sqlx::query("INSERT INTO person (id, name) VALUES ('person:tobie', 'Tobie')")
        .execute(datastore.pool())
        .await
        .unwrap();
}

pub fn basic(user: &str, pass: &str) -> String {
    use base64::Engine;
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"))
    )
}

pub fn sign(claims: &Value, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS512),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn later() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}
