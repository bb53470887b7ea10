//! System-level modules
//!
//! - Logging initialization (tracing + tracing-appender)

pub mod logging;

pub use logging::init_logging;
