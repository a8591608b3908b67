//! Excel parsing utilities

use calamine::{open_workbook_auto, DataType, Reader};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error_handling::LoadError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcelRecord {
    /// 1-based row number within the worksheet
    pub row: usize,
    pub values: Vec<String>,
}

/// Parse the first worksheet of a workbook (xlsx, xlsm, xlsb, xls, ods)
pub fn parse_excel_file<P: AsRef<Path>>(path: P) -> Result<Vec<ExcelRecord>, LoadError> {
    let mut workbook =
        open_workbook_auto(path.as_ref()).map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)?
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    // Range rows start at the first used cell, not necessarily A1
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let records = range
        .rows()
        .enumerate()
        .map(|(row_idx, row)| ExcelRecord {
            row: first_row + row_idx + 1,
            values: row.iter().map(datatype_to_string).collect(),
        })
        .collect();

    Ok(records)
}

/// Render a cell as text; integral floats lose their trailing `.0`
pub fn datatype_to_string(data: &DataType) -> String {
    match data {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(dt) => dt.to_string(),
        DataType::Error(_) => String::new(),
        DataType::DurationIso(d) => d.to_string(),
        DataType::DateTimeIso(dt) => dt.to_string(),
        DataType::Duration(d) => format!("{}", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_cell_rendering() {
        assert_eq!(datatype_to_string(&DataType::Empty), "");
        assert_eq!(
            datatype_to_string(&DataType::String("Queen".to_string())),
            "Queen"
        );
        assert_eq!(datatype_to_string(&DataType::Int(1999)), "1999");
        assert_eq!(datatype_to_string(&DataType::Float(1999.0)), "1999");
        assert_eq!(datatype_to_string(&DataType::Float(2.5)), "2.5");
        assert_eq!(datatype_to_string(&DataType::Bool(true)), "true");
        assert_eq!(
            datatype_to_string(&DataType::Error(CellErrorType::NA)),
            ""
        );
    }

    #[test]
    fn test_garbage_workbook_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        let err = parse_excel_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }
}
