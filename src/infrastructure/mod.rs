//! Infrastructure Layer
//!
//! Process-level concerns shared by the adapters.

pub mod shutdown;

pub use shutdown::shutdown_signal;
