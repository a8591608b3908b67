//! Core data models for the batch audio downloader

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::error_handling::LoadError;

/// One (track, artist) entry of the input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// 1-based row number in the source table, for log messages
    pub row_number: usize,

    pub track: String,

    /// `None` when the artist cell is absent or blank
    pub artist: Option<String>,
}

impl Row {
    pub fn new(row_number: usize, track: impl Into<String>, artist: Option<&str>) -> Self {
        Self {
            row_number,
            track: track.into(),
            artist: artist
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        }
    }
}

/// Everything derived from a row before any I/O happens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackPlan {
    /// Sanitized track title
    pub title: String,

    /// Sanitized artist, `None` when absent or empty after sanitizing
    pub artist: Option<String>,

    /// Free-text query handed to the fetcher
    pub query: String,

    /// Output path without extension
    pub output_stem: PathBuf,

    /// `output_stem` plus the audio extension
    pub output_file: PathBuf,
}

/// Title/artist/album triple written into the tag container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub title: String,

    pub artist: String,

    pub album: String,
}

/// Terminal state of a row

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RowStatus {
    /// Output file already existed, nothing fetched
    Skipped,

    /// Downloaded and tagged
    Completed,

    DownloadFailed,

    /// Audio file kept, tags missing
    TagFailed,

    RowError,
}

impl RowStatus {
    pub const ALL: [RowStatus; 5] = [
        RowStatus::Completed,
        RowStatus::Skipped,
        RowStatus::DownloadFailed,
        RowStatus::TagFailed,
        RowStatus::RowError,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Completed => "completed",
            Self::DownloadFailed => "download failed",
            Self::TagFailed => "tagging failed",
            Self::RowError => "row error",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::DownloadFailed | Self::TagFailed | Self::RowError
        )
    }
}

/// Result of processing one row

#[derive(Debug, Clone, Serialize)]
pub struct RowOutcome {
    pub row_number: usize,

    /// Search query, or the raw track text when no query could be built
    pub query: String,

    pub output_file: Option<PathBuf>,

    pub status: RowStatus,

    pub error_message: Option<String>,
}

impl RowOutcome {
    pub fn succeeded(plan: &TrackPlan, row_number: usize, status: RowStatus) -> Self {
        Self {
            row_number,
            query: plan.query.clone(),
            output_file: Some(plan.output_file.clone()),
            status,
            error_message: None,
        }
    }

    pub fn failed(
        plan: &TrackPlan,
        row_number: usize,
        status: RowStatus,
        error: impl ToString,
    ) -> Self {
        Self {
            row_number,
            query: plan.query.clone(),
            output_file: Some(plan.output_file.clone()),
            status,
            error_message: Some(error.to_string()),
        }
    }
}

/// Outcomes of a whole batch run, in input order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<RowOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn count(&self, status: RowStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// "3 completed, 1 skipped, ..." with zero counts left out
    pub fn summary(&self) -> String {
        let parts: Vec<String> = RowStatus::ALL
            .iter()
            .map(|status| (status, self.count(*status)))
            .filter(|(_, n)| *n > 0)
            .map(|(status, n)| format!("{} {}", n, status.label()))
            .collect();

        if parts.is_empty() {
            "no rows".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Application error types

#[derive(Debug, thiserror::Error)]

pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("System error: {0}")]
    System(String),
}

/// Result type alias for application operations

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: RowStatus) -> RowOutcome {
        RowOutcome {
            row_number: 1,
            query: "q".to_string(),
            output_file: None,
            status,
            error_message: None,
        }
    }

    #[test]
    fn test_row_blank_artist_is_none() {
        assert_eq!(Row::new(1, "Track1", Some("  ")).artist, None);
        assert_eq!(Row::new(1, "Track1", None).artist, None);
        assert_eq!(
            Row::new(1, "Track1", Some(" Queen ")).artist.as_deref(),
            Some("Queen")
        );
    }

    #[test]
    fn test_report_counts_and_summary() {
        let report = BatchReport {
            outcomes: vec![
                outcome(RowStatus::Completed),
                outcome(RowStatus::Completed),
                outcome(RowStatus::Skipped),
                outcome(RowStatus::DownloadFailed),
            ],
        };

        assert_eq!(report.total(), 4);
        assert_eq!(report.count(RowStatus::Completed), 2);
        assert_eq!(
            report.summary(),
            "2 completed, 1 skipped, 1 download failed"
        );
        assert_eq!(BatchReport::default().summary(), "no rows");
    }
}
