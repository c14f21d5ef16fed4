//! Logging utilities.
//!
//! Everything logs through the `log` facade; binaries install the
//! `env_logger` backend once with [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
