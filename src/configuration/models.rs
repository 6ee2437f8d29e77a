pub mod client_settings;
