use crate::sqlite_transaction::backend;
use crate::{Result as DbErrorResult, SqliteTransaction, password};

use sdb_auth::{Datastore, Signin, StoreResult, Transaction};

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use log::debug;
use sqlx::{Row, SqlitePool};

/// SQLite-backed catalog of signing keys, scopes and users
#[derive(Clone)]
pub struct SqliteDatastore {
    pool: SqlitePool,
}

impl SqliteDatastore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn define_namespace_token(
        &self,
        ns: &str,
        name: &str,
        algorithm: Algorithm,
        code: &str,
    ) -> DbErrorResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO namespace_tokens (ns, name, algorithm, code)
             VALUES (?, ?, ?, ?)",
        )
        .bind(ns)
        .bind(name)
        .bind(algorithm_name(algorithm))
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// `code` signs the user's "default" tokens
    pub async fn define_namespace_user(
        &self,
        ns: &str,
        name: &str,
        pass: &str,
        code: &str,
    ) -> DbErrorResult<()> {
        let salt = password::salt();
        sqlx::query(
            "INSERT OR REPLACE INTO namespace_users (ns, name, pass_salt, pass_hash, code)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(ns)
        .bind(name)
        .bind(&salt)
        .bind(password::digest(&salt, pass))
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn define_database_token(
        &self,
        ns: &str,
        db: &str,
        name: &str,
        algorithm: Algorithm,
        code: &str,
    ) -> DbErrorResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO database_tokens (ns, db, name, algorithm, code)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(ns)
        .bind(db)
        .bind(name)
        .bind(algorithm_name(algorithm))
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn define_database_user(
        &self,
        ns: &str,
        db: &str,
        name: &str,
        pass: &str,
        code: &str,
    ) -> DbErrorResult<()> {
        let salt = password::salt();
        sqlx::query(
            "INSERT OR REPLACE INTO database_users (ns, db, name, pass_salt, pass_hash, code)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(ns)
        .bind(db)
        .bind(name)
        .bind(&salt)
        .bind(password::digest(&salt, pass))
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn define_scope(
        &self,
        ns: &str,
        db: &str,
        name: &str,
        code: &str,
        connect: Option<&str>,
    ) -> DbErrorResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO scopes (ns, db, name, code, connect)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(ns)
        .bind(db)
        .bind(name)
        .bind(code)
        .bind(connect)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn define_scope_token(
        &self,
        ns: &str,
        db: &str,
        sc: &str,
        name: &str,
        algorithm: Algorithm,
        code: &str,
    ) -> DbErrorResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO scope_tokens (ns, db, sc, name, algorithm, code)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(ns)
        .bind(db)
        .bind(sc)
        .bind(name)
        .bind(algorithm_name(algorithm))
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn check_password(&self, sql: &str, params: &[&str], pass: &str) -> StoreResult<bool> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        let row = query.fetch_optional(&self.pool).await.map_err(backend)?;

        match row {
            Some(row) => {
                let salt: String = row.try_get("pass_salt").map_err(backend)?;
                let stored: String = row.try_get("pass_hash").map_err(backend)?;
                Ok(password::verify(pass, &salt, &stored))
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Datastore for SqliteDatastore {
    async fn transaction(&self) -> StoreResult<Box<dyn Transaction>> {
        let tx = self.pool.begin().await.map_err(backend)?;
        debug!("Catalog transaction opened");
        Ok(Box::new(SqliteTransaction::new(tx)))
    }
}

#[async_trait]
impl Signin for SqliteDatastore {
    async fn signin_namespace(&self, ns: &str, user: &str, pass: &str) -> StoreResult<bool> {
        self.check_password(
            "SELECT pass_salt, pass_hash FROM namespace_users WHERE ns = ? AND name = ?",
            &[ns, user],
            pass,
        )
        .await
    }

    async fn signin_database(
        &self,
        ns: &str,
        db: &str,
        user: &str,
        pass: &str,
    ) -> StoreResult<bool> {
        self.check_password(
            "SELECT pass_salt, pass_hash FROM database_users WHERE ns = ? AND db = ? AND name = ?",
            &[ns, db, user],
            pass,
        )
        .await
    }
}

/// Name stored in the catalog, parsed back with `Algorithm::from_str`
fn algorithm_name(algorithm: Algorithm) -> String {
    format!("{algorithm:?}")
}
