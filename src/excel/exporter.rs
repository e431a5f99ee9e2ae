//! Workbook exporter - Ledger → Excel (.xlsx)

use super::{
    DATE_COLUMN, PREDICTIONS_SHEET, PREDICTION_COLUMNS, RESULTS_SHEET, RESULT_COLUMNS,
    SERIES_SHEET,
};
use crate::error::{TirageError, TirageResult};
use crate::types::{Ledger, Source};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

/// Writes the three ledger sheets, replacing the whole file
pub struct WorkbookExporter<'a> {
    ledger: &'a Ledger,
    header_format: Format,
    date_format: Format,
}

impl<'a> WorkbookExporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self {
            ledger,
            header_format: Format::new().set_bold(),
            date_format: Format::new().set_num_format("yyyy-mm-dd"),
        }
    }

    /// Export the ledger to an .xlsx file
    pub fn export(&self, output_path: &Path) -> TirageResult<()> {
        let mut workbook = Workbook::new();

        self.export_results(workbook.add_worksheet())?;
        self.export_series(workbook.add_worksheet())?;
        self.export_predictions(workbook.add_worksheet())?;

        workbook
            .save(output_path)
            .map_err(|e| TirageError::Export(format!("Failed to save Excel file: {}", e)))?;

        debug!(path = %output_path.display(), "workbook written");
        Ok(())
    }

    fn export_results(&self, worksheet: &mut Worksheet) -> TirageResult<()> {
        worksheet.set_name(RESULTS_SHEET)?;
        self.write_header(worksheet, &RESULT_COLUMNS)?;

        for (idx, result) in self.ledger.results.iter().enumerate() {
            let row = idx as u32 + 1;
            self.write_date(worksheet, row, result.date)?;
            for (col, n) in result.numbers.iter().enumerate() {
                worksheet.write_number(row, col as u16 + 1, *n as f64)?;
            }
        }
        Ok(())
    }

    fn export_series(&self, worksheet: &mut Worksheet) -> TirageResult<()> {
        worksheet.set_name(SERIES_SHEET)?;
        let columns: Vec<&str> = Source::ALL.iter().map(|s| s.column()).collect();
        self.write_header(worksheet, &columns)?;

        for (idx, series) in self.ledger.series.iter().enumerate() {
            let row = idx as u32 + 1;
            self.write_date(worksheet, row, series.date)?;
            for (col, source) in Source::ALL.iter().enumerate() {
                let text = series.field(*source);
                // Blank cells read back as empty text
                if !text.is_empty() {
                    worksheet.write_string(row, col as u16 + 1, text)?;
                }
            }
        }
        Ok(())
    }

    fn export_predictions(&self, worksheet: &mut Worksheet) -> TirageResult<()> {
        worksheet.set_name(PREDICTIONS_SHEET)?;
        self.write_header(worksheet, &PREDICTION_COLUMNS)?;

        for (idx, prediction) in self.ledger.predictions.iter().enumerate() {
            let row = idx as u32 + 1;
            self.write_date(worksheet, row, prediction.date)?;
            for (col, n) in prediction.numbers.iter().enumerate() {
                worksheet.write_number(row, col as u16 + 1, *n as f64)?;
            }
        }
        Ok(())
    }

    /// Date column followed by `columns`
    fn write_header(&self, worksheet: &mut Worksheet, columns: &[&str]) -> TirageResult<()> {
        worksheet.write_string_with_format(0, 0, DATE_COLUMN, &self.header_format)?;
        worksheet.set_column_width(0, 12.0)?;
        for (idx, name) in columns.iter().enumerate() {
            worksheet.write_string_with_format(0, idx as u16 + 1, *name, &self.header_format)?;
        }
        Ok(())
    }

    fn write_date(&self, worksheet: &mut Worksheet, row: u32, date: NaiveDate) -> TirageResult<()> {
        let year = u16::try_from(date.year())
            .map_err(|_| TirageError::Export(format!("Date {} cannot be stored", date)))?;
        let datetime = ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?;
        worksheet.write_datetime_with_format(row, 0, &datetime, &self.date_format)?;
        Ok(())
    }
}
