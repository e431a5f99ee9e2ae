//! Tirage - daily draw ledger with naive predictions
//!
//! Records the day's series (five free-text sources) and the drawn numbers in
//! an Excel workbook, predicts numbers from the series and scores predictions
//! against results.
//!
//! # Example
//!
//! ```no_run
//! use tirage::core::{compare, FrequencyPolicy, PredictionPolicy};
//! use tirage::store::WorkbookStore;
//! use tirage::types::{DailySeries, Prediction, Source};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let mut store = WorkbookStore::open("Donnees_Tirage.xlsx")?;
//!
//! let series = DailySeries::empty(date).with(Source::Matrice, "123,456");
//! let numbers = FrequencyPolicy::default().predict(&series);
//! store.record_series(series);
//! store.record_prediction(Prediction::new(date, numbers)?);
//! store.save()?;
//!
//! println!("Score: {:?}", compare(store.ledger(), date).score);
//! # Ok::<(), tirage::error::TirageError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{TirageError, TirageResult};
pub use types::{DailySeries, DrawResult, Ledger, Prediction, Source};
