pub mod memory_cluster;
pub mod memory_object_store;
pub mod selector;
pub mod static_catalog_source;
