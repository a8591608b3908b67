//! Core business logic module
//!
//! Domain models, the pipeline stages (loading, fetching, tagging) and the
//! batch driver that ties them together.

pub mod config;
pub mod error_handling;
pub mod file_parser;
pub mod manager;
pub mod models;
pub mod progress_tracker;
pub mod tag_writer;
pub mod youtube_downloader;

#[cfg(test)]
mod config_test;




// Re-export commonly used types
pub use config::AppConfig;
pub use manager::{BatchConfig, BatchManager};
