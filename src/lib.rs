pub mod config;
pub mod host;
pub mod log;
pub mod release;
pub mod update;
