//! Command handlers
//!
//! One async entry point per CLI subcommand. Handlers take the resolved
//! [`AppConfig`](crate::core::AppConfig) and return plain data; printing is
//! left to the binary.

pub mod config;
pub mod download;
pub mod import;
pub mod system;

// Re-export all command functions for easy access
pub use config::*;
pub use download::*;
pub use import::*;
pub use system::*;
