//! Blockchain interaction module

pub mod connection;
pub mod transfer;

// Re-export for convenience
pub use connection::*;
pub use transfer::*;
