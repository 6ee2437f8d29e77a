pub mod event_handler;
pub mod watch_loop;
pub mod watch_state;
