//! Utility modules
//!
//! Filename sanitization, path helpers, text encoding detection and logging
//! setup.

pub mod encoding;
pub mod file_utils;
pub mod logging;

pub use file_utils::{append_extension, sanitize_filename};
