//! Workbook import/export
//!
//! The workbook holds three sheets, always read and written together:
//! - `Historique_Gagnants`: Date, Num1..Num5
//! - `Series_Journalieres`: Date, Matrice, Clavier, Cerveau, Code, Event
//! - `Predictions`: Date, Pred1..Pred5

mod exporter;
mod importer;

pub use exporter::WorkbookExporter;
pub use importer::WorkbookImporter;

pub const RESULTS_SHEET: &str = "Historique_Gagnants";
pub const SERIES_SHEET: &str = "Series_Journalieres";
pub const PREDICTIONS_SHEET: &str = "Predictions";

pub const DATE_COLUMN: &str = "Date";
pub const RESULT_COLUMNS: [&str; 5] = ["Num1", "Num2", "Num3", "Num4", "Num5"];
pub const PREDICTION_COLUMNS: [&str; 5] = ["Pred1", "Pred2", "Pred3", "Pred4", "Pred5"];
