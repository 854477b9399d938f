mod connect_statement;
pub mod connection;
pub mod error;
pub mod password;
pub mod sqlite_datastore;
pub mod sqlite_transaction;

pub use connection::catalog_pool::{open_catalog, run_migrations};
pub use error::{DbError, Result};
pub use sqlite_datastore::SqliteDatastore;
pub use sqlite_transaction::SqliteTransaction;
