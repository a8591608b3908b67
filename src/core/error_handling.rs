//! Error taxonomy for the batch pipeline
//!
//! Each pipeline stage has its own error type so the batch driver can tell
//! fatal failures (the input table cannot be loaded) from per-row failures
//! (fetch, tagging, anything else while processing one row). Per-row errors
//! never escape the driver; they are collapsed into a
//! [`RowStatus`](crate::core::models::RowStatus) and logged.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Coarse error categories, attached to log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Input table could not be read or parsed
    Input,
    /// External tool (yt-dlp / ffmpeg) could not run or failed
    ExternalTool,
    /// File system errors (permissions, missing files, IO)
    FileSystem,
    /// Tag container could not be read or written
    Metadata,
    /// Row data is unusable
    Data,
}

/// Failure to load the input table. Fatal: the batch cannot start.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Unsupported input format '{extension}' (expected xlsx, xls, xlsm, xlsb, ods or csv)")]
    UnsupportedFormat { extension: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure while searching, downloading or transcoding one track
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} exited with {status}: {stderr}")]
    ToolFailed {
        binary: String,
        status: String,
        stderr: String,
    },

    #[error("File not found after download: {}", path.display())]
    OutputMissing { path: PathBuf },

    #[error("Failed to check {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while embedding metadata into a downloaded file
#[derive(Debug, Error)]
pub enum TagError {
    #[error("File not found for metadata embedding: {}", path.display())]
    FileMissing { path: PathBuf },

    #[error("Failed to open {} as audio: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("{} is {actual}, expected {expected}", path.display())]
    UnexpectedFormat {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("No writable tag available for {}", path.display())]
    NoWritableTag { path: PathBuf },

    #[error("Failed to write tags to {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// Any other failure while processing a single row
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Row {row_number} has no usable track title")]
    EmptyTrack { row_number: usize },

    #[error("Failed to check {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::Io { .. } => ErrorCategory::FileSystem,
            _ => ErrorCategory::Input,
        }
    }
}

impl FetchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Spawn { .. } | Self::ToolFailed { .. } => ErrorCategory::ExternalTool,
            Self::OutputMissing { .. } | Self::Io { .. } => ErrorCategory::FileSystem,
        }
    }
}

impl TagError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileMissing { .. } => ErrorCategory::FileSystem,
            _ => ErrorCategory::Metadata,
        }
    }
}

impl RowError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyTrack { .. } => ErrorCategory::Data,
            Self::Io { .. } => ErrorCategory::FileSystem,
        }
    }
}
