//! Logging setup and display helpers shared by lockrate binaries.

pub mod format;
pub mod logging;

pub use format::{format_duration, format_units};
pub use logging::{init_logging, LogFormat};
