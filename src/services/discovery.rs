pub mod catalog_source;
pub mod discovery_catalog;
pub mod type_descriptor;
pub mod type_resolver;
