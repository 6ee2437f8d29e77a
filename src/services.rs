pub mod apply;
pub mod backends;
pub mod base;
pub mod client;
pub mod discovery;
pub mod manifest;
pub mod watch;
