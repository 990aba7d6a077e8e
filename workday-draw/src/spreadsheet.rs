//! Read the candidate pool from an uploaded spreadsheet
//!
//! Only the first worksheet is read. The first row is ordinary data (no
//! header skipping) and only the first cell of each row is kept.

use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};

use crate::assignment::{CandidatePool, CellValue};

/// The uploaded file could not be read as a spreadsheet
#[derive(Debug, Clone)]
pub struct SpreadsheetParseError {
    pub path: PathBuf,
    pub reason: String,
}

impl SpreadsheetParseError {
    fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SpreadsheetParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to read spreadsheet {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl std::error::Error for SpreadsheetParseError {}

/// Convert an Excel cell to a pool value
pub fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => {
            // Spreadsheets store every number as a float; show whole ones as integers
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(format!("{}", dt)),
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

/// Read the first column of the first worksheet into a candidate pool
///
/// Row and column positions are absolute, so a sheet whose data starts
/// below row 1 or right of column A still yields one (possibly null) value
/// per row from the top of the sheet.
pub fn read_first_column<P: AsRef<Path>>(path: P) -> Result<CandidatePool, SpreadsheetParseError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SpreadsheetParseError::new(path, format!("cannot open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SpreadsheetParseError::new(path, "workbook has no sheets"))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        SpreadsheetParseError::new(path, format!("cannot read sheet '{}': {}", sheet_name, e))
    })?;

    let Some((last_row, _)) = range.end() else {
        log::debug!("Sheet '{}' in {} is empty", sheet_name, path.display());
        return Ok(CandidatePool::new());
    };

    let values: Vec<CellValue> = (0..=last_row)
        .map(|row| {
            range
                .get_value((row, 0))
                .map(cell_to_value)
                .unwrap_or(CellValue::Null)
        })
        .collect();
    let pool = CandidatePool::from_values(values);

    log::debug!(
        "Read {} candidate values ({} blank) from sheet '{}' of {}",
        pool.len(),
        pool.values().iter().filter(|v| v.is_null()).count(),
        sheet_name,
        path.display()
    );

    Ok(pool)
}
