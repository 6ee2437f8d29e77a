pub mod client_config;
pub mod object_client;
pub mod object_source;
