//! Logger initialization.
//!
//! The crate only emits through the `log` facade; hosts that install their
//! own logger can skip this module entirely.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
