//! Batch download command

use std::sync::Arc;
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::core::file_parser::FileParser;
use crate::core::manager::{BatchConfig, BatchManager};
use crate::core::models::{AppError, AppResult, BatchReport, Row};
use crate::core::progress_tracker::ProgressTracker;
use crate::core::tag_writer::LoftyTagWriter;
use crate::core::youtube_downloader::{YoutubeDownloader, YoutubeDownloaderConfig};

/// Load the song list and process every row.
///
/// Failing to load the list is fatal; per-row failures only show up in the
/// returned report.
pub async fn run_batch(config: &AppConfig) -> AppResult<BatchReport> {
    info!("📂 Reading song list from: {}", config.input.path.display());

    let rows = match load_rows(config).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("❌ Failed to load song list: {}", e);
            return Err(e);
        }
    };

    let manager = create_manager(config);
    let mut progress = ProgressTracker::for_config(rows.len(), config.ui.show_progress);
    manager.run(&rows, &mut progress).await
}

/// Driver wired to yt-dlp and lofty
pub fn create_manager(config: &AppConfig) -> BatchManager {
    let fetcher = YoutubeDownloader::new(YoutubeDownloaderConfig::from_app_config(config));
    let tag_writer = LoftyTagWriter::new(&config.output.audio_format);

    BatchManager::new(
        BatchConfig::from_app_config(config),
        Arc::new(fetcher),
        Arc::new(tag_writer),
    )
}

async fn load_rows(config: &AppConfig) -> AppResult<Vec<Row>> {
    let path = config.input.path.clone();
    tokio::task::spawn_blocking(move || FileParser::load_rows(path))
        .await
        .map_err(|e| AppError::System(format!("Loader task failed: {}", e)))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_input_is_fatal() {
        let dir = tempdir().unwrap();
        let mut config = AppConfig::default();
        config.input.path = dir.path().join("songs.xlsx");
        config.output.directory = dir.path().join("out");

        let err = run_batch(&config).await.unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
        assert!(!config.output.directory.exists());
    }

    #[tokio::test]
    async fn test_empty_list_creates_output_dir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("songs.csv");
        std::fs::write(&input, ",\n").unwrap();

        let mut config = AppConfig::default();
        config.input.path = input;
        config.output.directory = dir.path().join("out");
        config.ui.show_progress = false;

        let report = run_batch(&config).await.unwrap();
        assert_eq!(report.total(), 0);
        assert!(config.output.directory.is_dir());
    }
}
