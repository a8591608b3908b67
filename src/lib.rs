//! Audio Batch Downloader - Core Library
//!
//! Reads a (track, artist) song list, finds each song with yt-dlp, saves it
//! as audio and writes title/artist/album tags.

pub mod commands;
pub mod core;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use core::{
    config::AppConfig,
    error_handling::{FetchError, LoadError, RowError, TagError},
    file_parser::FileParser,
    manager::{BatchConfig, BatchManager},
    models::{AppError, AppResult, BatchReport, MetadataRecord, Row, RowOutcome, RowStatus},
    tag_writer::{LoftyTagWriter, TagWriter},
    youtube_downloader::{AudioFetcher, YoutubeDownloader},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "audio-batch-downloader");
    }
}
