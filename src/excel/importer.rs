//! Workbook importer - Excel (.xlsx) → Ledger

use super::{
    DATE_COLUMN, PREDICTIONS_SHEET, PREDICTION_COLUMNS, RESULTS_SHEET, RESULT_COLUMNS,
    SERIES_SHEET,
};
use crate::error::{TirageError, TirageResult};
use crate::types::{is_valid_number, DailySeries, DrawResult, Ledger, Prediction, Source};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{Days, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Columns the overlay-style writer used for predictions
const LEGACY_PREDICTION_COLUMNS: [&str; 5] = RESULT_COLUMNS;

/// Reads the three ledger sheets from an .xlsx workbook
pub struct WorkbookImporter {
    path: PathBuf,
}

impl WorkbookImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import all three tables; any missing sheet or column is an error
    pub fn import(&self) -> TirageResult<Ledger> {
        if !self.path.exists() {
            return Err(TirageError::WorkbookNotFound(self.path.clone()));
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| TirageError::Import(format!("Failed to open Excel file: {}", e)))?;
        let sheet_names = workbook.sheet_names().to_vec();

        let results = read_sheet(&mut workbook, &sheet_names, RESULTS_SHEET)?;
        let series = read_sheet(&mut workbook, &sheet_names, SERIES_SHEET)?;
        let predictions = read_sheet(&mut workbook, &sheet_names, PREDICTIONS_SHEET)?;

        let ledger = Ledger {
            results: parse_results(&results)?,
            series: parse_series(&series)?,
            predictions: parse_predictions(&predictions)?,
        };
        debug!(
            results = ledger.results.len(),
            series = ledger.series.len(),
            predictions = ledger.predictions.len(),
            "workbook imported"
        );
        Ok(ledger)
    }
}

fn read_sheet(
    workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
    sheet_names: &[String],
    name: &str,
) -> TirageResult<Range<Data>> {
    if !sheet_names.iter().any(|s| s == name) {
        return Err(TirageError::MissingSheet(name.to_string()));
    }
    workbook
        .worksheet_range(name)
        .map_err(|e| TirageError::Import(format!("Failed to read sheet '{}': {}", name, e)))
}

//==============================================================================
// Header handling
//==============================================================================

/// Column positions by header name
struct Header {
    sheet: &'static str,
    positions: HashMap<String, usize>,
}

impl Header {
    fn read(sheet: &'static str, range: &Range<Data>) -> TirageResult<Self> {
        let first = range
            .rows()
            .next()
            .ok_or_else(|| TirageError::schema(sheet, "missing header row"))?;
        let positions = first
            .iter()
            .enumerate()
            .map(|(idx, cell)| (cell_text(cell), idx))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Ok(Self { sheet, positions })
    }

    fn has(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    fn require(&self, column: &str) -> TirageResult<usize> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| TirageError::schema(self.sheet, format!("missing column '{}'", column)))
    }

    fn require_all(&self, columns: &[&str]) -> TirageResult<Vec<usize>> {
        columns.iter().map(|c| self.require(c)).collect()
    }
}

/// Data rows with their 1-based Excel row number, skipping blank rows
fn data_rows(range: &Range<Data>) -> impl Iterator<Item = (usize, &[Data])> {
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
    range
        .rows()
        .enumerate()
        .skip(1)
        .map(move |(idx, row)| (first_row + idx + 1, row))
        .filter(|(_, row)| !row.iter().all(is_blank))
}

static EMPTY: Data = Data::Empty;

fn cell(row: &[Data], idx: usize) -> &Data {
    row.get(idx).unwrap_or(&EMPTY)
}

//==============================================================================
// Sheets
//==============================================================================

fn parse_results(range: &Range<Data>) -> TirageResult<Vec<DrawResult>> {
    let header = Header::read(RESULTS_SHEET, range)?;
    let date_col = header.require(DATE_COLUMN)?;
    let num_cols = header.require_all(&RESULT_COLUMNS)?;

    let mut results = Vec::new();
    for (row_no, row) in data_rows(range) {
        let date = row_date(RESULTS_SHEET, row_no, cell(row, date_col))?;
        let mut numbers = Vec::with_capacity(num_cols.len());
        for (col, name) in num_cols.iter().zip(RESULT_COLUMNS) {
            let n = cell_number(cell(row, *col)).ok_or_else(|| {
                TirageError::schema(
                    RESULTS_SHEET,
                    format!("row {}: '{}' is not a draw number", row_no, name),
                )
            })?;
            numbers.push(n);
        }
        let result = DrawResult::new(date, &numbers)
            .map_err(|e| TirageError::schema(RESULTS_SHEET, format!("row {}: {}", row_no, e)))?;
        results.push(result);
    }
    Ok(results)
}

fn parse_series(range: &Range<Data>) -> TirageResult<Vec<DailySeries>> {
    let header = Header::read(SERIES_SHEET, range)?;
    let date_col = header.require(DATE_COLUMN)?;
    let source_cols: Vec<(Source, usize)> = Source::ALL
        .iter()
        .map(|s| header.require(s.column()).map(|idx| (*s, idx)))
        .collect::<TirageResult<_>>()?;

    let mut series = Vec::new();
    for (row_no, row) in data_rows(range) {
        let date = row_date(SERIES_SHEET, row_no, cell(row, date_col))?;
        let mut entry = DailySeries::empty(date);
        for (source, col) in &source_cols {
            entry.set_field(*source, cell_text(cell(row, *col)));
        }
        series.push(entry);
    }
    Ok(series)
}

fn parse_predictions(range: &Range<Data>) -> TirageResult<Vec<Prediction>> {
    let header = Header::read(PREDICTIONS_SHEET, range)?;
    let date_col = header.require(DATE_COLUMN)?;
    let columns = if !header.has(PREDICTION_COLUMNS[0]) && header.has(LEGACY_PREDICTION_COLUMNS[0])
    {
        &LEGACY_PREDICTION_COLUMNS
    } else {
        &PREDICTION_COLUMNS
    };
    let pred_cols = header.require_all(columns)?;

    let mut predictions = Vec::new();
    for (row_no, row) in data_rows(range) {
        let date = row_date(PREDICTIONS_SHEET, row_no, cell(row, date_col))?;
        let mut numbers = Vec::new();
        for (col, name) in pred_cols.iter().zip(columns) {
            let value = cell(row, *col);
            if is_blank(value) {
                continue;
            }
            let n = cell_number(value)
                .filter(|n| is_valid_number(*n))
                .ok_or_else(|| {
                    TirageError::schema(
                        PREDICTIONS_SHEET,
                        format!("row {}: '{}' is not a draw number", row_no, name),
                    )
                })?;
            numbers.push(n);
        }
        predictions.push(Prediction::new(date, numbers)?);
    }
    Ok(predictions)
}

//==============================================================================
// Cell conversion
//==============================================================================

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Cell rendered as text; whole floats lose their `.0`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        other => other.to_string(),
    }
}

/// Cell as a whole number that fits in a u8
fn cell_number(cell: &Data) -> Option<u8> {
    let value = match cell {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
        return None;
    }
    Some(value as u8)
}

fn row_date(sheet: &'static str, row_no: usize, cell: &Data) -> TirageResult<NaiveDate> {
    cell_date(cell).ok_or_else(|| {
        TirageError::schema(
            sheet,
            format!("row {}: '{}' is not a date", row_no, cell_text(cell)),
        )
    })
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::Float(f) => serial_to_date(*f),
        Data::Int(i) => serial_to_date(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        _ => None,
    }
}

/// Excel 1900 date system serial → date (time part dropped)
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}
