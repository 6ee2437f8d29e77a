pub mod object_store;
pub mod status;
pub mod types;
