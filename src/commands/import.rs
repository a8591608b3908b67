//! Song list preview
//!
//! Shows what a run would do with each row without touching the network or
//! the output directory.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::file_parser::{FileParser, FileParserConfig, ParseStats};
use crate::core::manager::BatchConfig;
use crate::core::models::{AppError, AppResult};

/// One planned row
#[derive(Debug, Clone, Serialize)]
pub struct PreviewRow {
    pub row_number: usize,
    pub track: String,
    pub artist: Option<String>,
    /// `None` when the row cannot be processed
    pub query: Option<String>,
    pub output_file: Option<PathBuf>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview {
    pub rows: Vec<PreviewRow>,
    pub statistics: ParseStats,
}

/// Parse up to `max_rows` rows and plan them
pub async fn preview_import_data(
    config: &AppConfig,
    max_rows: Option<usize>,
) -> AppResult<ImportPreview> {
    let path = config.input.path.clone();
    info!("👀 Previewing song list: {}", path.display());

    let parser = FileParser::with_config(FileParserConfig {
        max_rows: max_rows.unwrap_or(0),
        ..FileParserConfig::default()
    });

    let (rows, statistics) = tokio::task::spawn_blocking(move || parser.parse_file(path))
        .await
        .map_err(|e| AppError::System(format!("Loader task failed: {}", e)))??;

    let batch = BatchConfig::from_app_config(config);
    let rows = rows
        .into_iter()
        .map(|row| {
            let (query, output_file, error) = match batch.plan_row(&row) {
                Ok(plan) => (Some(plan.query), Some(plan.output_file), None),
                Err(e) => (None, None, Some(e.to_string())),
            };
            PreviewRow {
                row_number: row.row_number,
                track: row.track,
                artist: row.artist,
                query,
                output_file,
                error,
            }
        })
        .collect();

    Ok(ImportPreview { rows, statistics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_preview_plans_rows() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("songs.csv");
        std::fs::write(&input, "Bohemian Rhapsody,Queen\n***,\nTrack1\n").unwrap();

        let mut config = AppConfig::default();
        config.input.path = input;
        config.output.directory = dir.path().join("out");

        let preview = preview_import_data(&config, None).await.unwrap();

        assert_eq!(preview.rows.len(), 3);
        assert_eq!(
            preview.rows[0].query.as_deref(),
            Some("Bohemian Rhapsody Queen")
        );
        assert_eq!(
            preview.rows[0].output_file,
            Some(dir.path().join("out").join("Queen - Bohemian Rhapsody.mp3"))
        );
        assert!(preview.rows[1].error.is_some());
        assert_eq!(preview.rows[2].query.as_deref(), Some("Track1"));
        // preview never creates the output directory
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_preview_respects_max_rows() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("songs.csv");
        std::fs::write(&input, "A\nB\nC\n").unwrap();

        let mut config = AppConfig::default();
        config.input.path = input;

        let preview = preview_import_data(&config, Some(2)).await.unwrap();
        assert_eq!(preview.rows.len(), 2);
    }
}
