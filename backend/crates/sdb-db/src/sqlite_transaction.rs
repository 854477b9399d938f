use crate::connect_statement;

use sdb_auth::{
    QueryResponse, ScopeDefinition, SigningKey, StoreError, StoreResult, Transaction,
    UserDefinition, Variables,
};
use sdb_core::TrustContext;

use std::str::FromStr;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite};

/// Catalog lookups and scope connect statements inside one SQLite
/// transaction.
///
/// The transaction is only ever rolled back, by [`Transaction::cancel`] or
/// when dropped.
pub struct SqliteTransaction {
    tx: sqlx::Transaction<'static, Sqlite>,
}

impl SqliteTransaction {
    pub fn new(tx: sqlx::Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    async fn fetch_key(
        &mut self,
        sql: &str,
        params: &[&str],
        what: String,
    ) -> StoreResult<SigningKey> {
        let row = self.fetch_one(sql, params, what).await?;
        let algorithm: String = row.try_get("algorithm").map_err(backend)?;
        let code: String = row.try_get("code").map_err(backend)?;

        let algorithm = Algorithm::from_str(&algorithm)
            .map_err(|_| StoreError::backend(format!("unknown algorithm '{algorithm}'")))?;

        Ok(SigningKey::new(algorithm, code))
    }

    async fn fetch_user(
        &mut self,
        sql: &str,
        params: &[&str],
        what: String,
    ) -> StoreResult<UserDefinition> {
        let row = self.fetch_one(sql, params, what).await?;

        Ok(UserDefinition {
            name: row.try_get("name").map_err(backend)?,
            code: row.try_get("code").map_err(backend)?,
        })
    }

    async fn fetch_one(
        &mut self,
        sql: &str,
        params: &[&str],
        what: String,
    ) -> StoreResult<SqliteRow> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        query
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found(what))
    }
}

#[async_trait]
impl Transaction for SqliteTransaction {
    async fn get_scope(&mut self, ns: &str, db: &str, sc: &str) -> StoreResult<ScopeDefinition> {
        let row = self
            .fetch_one(
                "SELECT name, code, connect FROM scopes WHERE ns = ? AND db = ? AND name = ?",
                &[ns, db, sc],
                format!("scope {sc} in {ns}/{db}"),
            )
            .await?;

        Ok(ScopeDefinition {
            name: row.try_get("name").map_err(backend)?,
            code: row.try_get("code").map_err(backend)?,
            connect: row.try_get("connect").map_err(backend)?,
        })
    }

    async fn get_scope_token(
        &mut self,
        ns: &str,
        db: &str,
        sc: &str,
        tk: &str,
    ) -> StoreResult<SigningKey> {
        self.fetch_key(
            "SELECT algorithm, code FROM scope_tokens
             WHERE ns = ? AND db = ? AND sc = ? AND name = ?",
            &[ns, db, sc, tk],
            format!("token {tk} on scope {sc} in {ns}/{db}"),
        )
        .await
    }

    async fn get_database_token(
        &mut self,
        ns: &str,
        db: &str,
        tk: &str,
    ) -> StoreResult<SigningKey> {
        self.fetch_key(
            "SELECT algorithm, code FROM database_tokens WHERE ns = ? AND db = ? AND name = ?",
            &[ns, db, tk],
            format!("database token {tk} in {ns}/{db}"),
        )
        .await
    }

    async fn get_database_user(
        &mut self,
        ns: &str,
        db: &str,
        us: &str,
    ) -> StoreResult<UserDefinition> {
        self.fetch_user(
            "SELECT name, code FROM database_users WHERE ns = ? AND db = ? AND name = ?",
            &[ns, db, us],
            format!("database user {us} in {ns}/{db}"),
        )
        .await
    }

    async fn get_namespace_token(&mut self, ns: &str, tk: &str) -> StoreResult<SigningKey> {
        self.fetch_key(
            "SELECT algorithm, code FROM namespace_tokens WHERE ns = ? AND name = ?",
            &[ns, tk],
            format!("namespace token {tk} in {ns}"),
        )
        .await
    }

    async fn get_namespace_user(&mut self, ns: &str, us: &str) -> StoreResult<UserDefinition> {
        self.fetch_user(
            "SELECT name, code FROM namespace_users WHERE ns = ? AND name = ?",
            &[ns, us],
            format!("namespace user {us} in {ns}"),
        )
        .await
    }

    async fn execute(
        &mut self,
        ctx: &TrustContext,
        query: &str,
        vars: &Variables,
    ) -> StoreResult<Vec<QueryResponse>> {
        connect_statement::execute(&mut self.tx, ctx, query, vars).await
    }

    async fn cancel(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback().await.map_err(backend)?;
        debug!("Catalog transaction rolled back");
        Ok(())
    }
}

#[track_caller]
pub(crate) fn backend(err: sqlx::Error) -> StoreError {
    StoreError::backend(err.to_string())
}
