pub mod catalog_pool;
