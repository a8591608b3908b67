//! Song list loading
//!
//! Reads a two-column table with no header row: column 1 is the track title,
//! column 2 the artist (may be blank). Workbooks (xlsx, xlsm, xlsb, xls, ods)
//! go through calamine and only the first worksheet is read; CSV files are
//! decoded to UTF-8 first, whatever their original encoding.
//!
//! Columns past the second are ignored. Rows with both cells blank are
//! skipped; a row with a blank title but an artist is kept so the batch
//! driver can report it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::error_handling::LoadError;
use crate::core::models::Row;
use crate::parsers::{csv_parser, excel_parser};
use crate::utils::encoding::EncodingDetector;
use crate::utils::file_utils::get_file_extension;

/// Supported input formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    /// xlsx, xlsm, xlsb, xls, ods
    Excel,
}

/// Parse statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseStats {
    /// Rows seen in the source, including blank ones
    pub total_rows: usize,
    pub parsed_rows: usize,
    pub skipped_rows: usize,
    pub detected_encoding: String,
    pub file_format: FileFormat,
    pub parse_time_ms: u64,
}

#[derive(Debug, Clone)]
pub struct FileParserConfig {
    /// Stop after this many rows (0 = no limit)
    pub max_rows: usize,
    pub skip_empty_rows: bool,
}

impl Default for FileParserConfig {
    fn default() -> Self {
        Self {
            max_rows: 0,
            skip_empty_rows: true,
        }
    }
}

/// Input loader
pub struct FileParser {
    config: FileParserConfig,
    encoding_detector: EncodingDetector,
}

impl FileParser {
    pub fn new() -> Self {
        Self::with_config(FileParserConfig::default())
    }

    pub fn with_config(config: FileParserConfig) -> Self {
        Self {
            config,
            encoding_detector: EncodingDetector::new(),
        }
    }

    /// Load the whole song list with default settings
    pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Row>, LoadError> {
        FileParser::new().parse_file(path).map(|(rows, _)| rows)
    }

    /// Parse a song list into rows, in table order
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<(Vec<Row>, ParseStats), LoadError> {
        let path = path.as_ref();
        let started = Instant::now();

        let exists = path.try_exists().map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !exists || !path.is_file() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let format = Self::detect_file_format(path)?;
        debug!("Parsing {} as {:?}", path.display(), format);

        let (cells, encoding) = match format {
            FileFormat::Excel => {
                let records = excel_parser::parse_excel_file(path)?;
                let cells = records.into_iter().map(|r| (r.row, r.values)).collect();
                (cells, "UTF-8".to_string())
            }
            FileFormat::Csv => {
                let (reader, encoding) = self
                    .encoding_detector
                    .detect_and_create_reader(path)
                    .map_err(|source| LoadError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                let records = csv_parser::parse_csv_from_reader(reader)?;
                let cells = records.into_iter().map(|r| (r.line, r.fields)).collect();
                (cells, encoding.name().to_string())
            }
        };

        let mut stats = ParseStats {
            total_rows: 0,
            parsed_rows: 0,
            skipped_rows: 0,
            detected_encoding: encoding,
            file_format: format,
            parse_time_ms: 0,
        };

        let rows = self.rows_from_cells(cells, &mut stats);
        stats.parse_time_ms = started.elapsed().as_millis() as u64;

        info!(
            "📄 Loaded {} rows from {} (skipped {} blank)",
            stats.parsed_rows,
            path.display(),
            stats.skipped_rows
        );

        Ok((rows, stats))
    }

    /// Pick the format from the file extension
    pub fn detect_file_format<P: AsRef<Path>>(path: P) -> Result<FileFormat, LoadError> {
        let name = path.as_ref().to_string_lossy();
        let ext = get_file_extension(&name).unwrap_or_default().to_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Excel),
            _ => Err(LoadError::UnsupportedFormat { extension: ext }),
        }
    }

    fn rows_from_cells(&self, cells: Vec<(usize, Vec<String>)>, stats: &mut ParseStats) -> Vec<Row> {
        let mut rows = Vec::new();

        for (row_number, values) in cells {
            stats.total_rows += 1;

            let track = values.first().map(|s| s.trim()).unwrap_or_default();
            let artist = values.get(1).map(|s| s.as_str());

            if self.config.skip_empty_rows
                && track.is_empty()
                && artist.map_or(true, |a| a.trim().is_empty())
            {
                stats.skipped_rows += 1;
                continue;
            }

            rows.push(Row::new(row_number, track, artist));

            if self.config.max_rows > 0 && rows.len() >= self.config.max_rows {
                debug!("Reached row limit: {}", self.config.max_rows);
                break;
            }
        }

        stats.parsed_rows = rows.len();
        rows
    }
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new()
    }
}
