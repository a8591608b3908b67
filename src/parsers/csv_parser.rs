//! CSV parsing utilities

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::core::error_handling::LoadError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRecord {
    /// 1-based line on which the record starts
    pub line: usize,
    pub fields: Vec<String>,
}

/// Parse header-less CSV; records may have any number of fields
pub fn parse_csv_from_reader<R: Read>(reader: R) -> Result<Vec<CsvRecord>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(records.len() + 1);
        let fields: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        records.push(CsvRecord { line, fields });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_header_and_flexible_rows() {
        let data = "Bohemian Rhapsody,Queen\nTrack1\n\"Hello, Goodbye\", The Beatles ,extra\n";
        let records = parse_csv_from_reader(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].fields, vec!["Bohemian Rhapsody", "Queen"]);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].fields, vec!["Track1"]);
        assert_eq!(
            records[2].fields,
            vec!["Hello, Goodbye", "The Beatles", "extra"]
        );
        assert_eq!(records[2].line, 3);
    }
}
