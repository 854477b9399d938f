use sdb_db::{SqliteDatastore, open_catalog};

use tempfile::TempDir;

/// Catalog on a temporary file. File-backed so the pool can hand out more
/// than one connection to the same data.
pub struct TestCatalog {
    pub datastore: SqliteDatastore,
    _dir: TempDir,
}

pub async fn create_test_catalog() -> TestCatalog {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pool = open_catalog(&dir.path().join("catalog.db"))
        .await
        .expect("Failed to open catalog");

    TestCatalog {
        datastore: SqliteDatastore::new(pool),
        _dir: dir,
    }
}
