//! System-level modules
//!
//! Process-wide plumbing that sits below the services: logging setup.

pub mod logging;

pub use logging::init_logging;
