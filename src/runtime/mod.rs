//! Application lifecycle: shared state, server mode and shutdown.

pub mod server;
pub mod shutdown;
pub mod startup;

pub use server::run_server;
pub use startup::AppState;
