pub mod test_db;

pub use test_db::{TestCatalog, create_test_catalog};
