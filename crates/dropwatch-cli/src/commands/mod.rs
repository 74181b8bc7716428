pub mod common;
pub mod config;
pub mod snapshot;
pub mod watch;
