//! Shared utilities for the delegation workspace
//!
//! Process entry points build one [`AppConfig`] from the environment and
//! pass it by reference to every constructor; nothing else reads the
//! environment.

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError};
pub use logging::{LogFormat, init_tracing};
