use crate::{DbError, Result};

use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use error_location::ErrorLocation;
use log::info;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

const MAX_CONNECTIONS: u32 = 5;

/// Open (creating if needed) the catalog database at `path` and bring its
/// schema up to date.
///
/// A bearer login holds exactly one connection, for its lookup transaction,
/// and runs any scope connect statement on it.
pub async fn open_catalog(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DbError::Initialization {
                message: format!("Failed to create catalog directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        // A connect statement abandoned mid-flight must not leave its
        // connection read-only
        .after_release(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA query_only = OFF")
                    .execute(&mut *conn)
                    .await?;
                Ok(true)
            })
        })
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    info!("Catalog database ready at {}", path.display());
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::Migration {
            message: format!("Migration failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}
