use crate::error::{TirageError, TirageResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest number a draw can produce
pub const MIN_NUMBER: u8 = 1;
/// Largest number a draw can produce
pub const MAX_NUMBER: u8 = 99;
/// Numbers per draw
pub const DRAW_SIZE: usize = 5;

//==============================================================================
// Series sources
//==============================================================================

/// One of the five free-text "sources" entered before the draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Matrice,
    Clavier,
    Cerveau,
    Code,
    Event,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Matrice,
        Source::Clavier,
        Source::Cerveau,
        Source::Code,
        Source::Event,
    ];

    /// Column header used in the `Series_Journalieres` sheet
    pub fn column(&self) -> &'static str {
        match self {
            Source::Matrice => "Matrice",
            Source::Clavier => "Clavier",
            Source::Cerveau => "Cerveau",
            Source::Code => "Code",
            Source::Event => "Event",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for Source {
    type Err = TirageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|src| src.column().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TirageError::Validation(format!("Unknown source '{}'", s)))
    }
}

//==============================================================================
// Rows
//==============================================================================

/// Daily series: five free-text fields entered before the draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub date: NaiveDate,
    pub matrice: String,
    pub clavier: String,
    pub cerveau: String,
    pub code: String,
    pub event: String,
}

impl DailySeries {
    /// Series with every field empty
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            matrice: String::new(),
            clavier: String::new(),
            cerveau: String::new(),
            code: String::new(),
            event: String::new(),
        }
    }

    pub fn field(&self, source: Source) -> &str {
        match source {
            Source::Matrice => &self.matrice,
            Source::Clavier => &self.clavier,
            Source::Cerveau => &self.cerveau,
            Source::Code => &self.code,
            Source::Event => &self.event,
        }
    }

    pub fn set_field(&mut self, source: Source, value: impl Into<String>) {
        let value = value.into();
        match source {
            Source::Matrice => self.matrice = value,
            Source::Clavier => self.clavier = value,
            Source::Cerveau => self.cerveau = value,
            Source::Code => self.code = value,
            Source::Event => self.event = value,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, source: Source, value: impl Into<String>) -> Self {
        self.set_field(source, value);
        self
    }
}

/// Actual numbers drawn on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    pub date: NaiveDate,
    pub numbers: [u8; DRAW_SIZE],
}

impl DrawResult {
    /// Build a result, checking there are exactly five numbers in 1..=99
    pub fn new(date: NaiveDate, numbers: &[u8]) -> TirageResult<Self> {
        let numbers: [u8; DRAW_SIZE] = numbers.try_into().map_err(|_| {
            TirageError::Validation(format!(
                "A result needs exactly {} numbers, got {}",
                DRAW_SIZE,
                numbers.len()
            ))
        })?;
        if let Some(bad) = numbers.iter().find(|n| !is_valid_number(**n)) {
            return Err(TirageError::Validation(format!(
                "Number {} is outside {}..={}",
                bad, MIN_NUMBER, MAX_NUMBER
            )));
        }
        Ok(Self { date, numbers })
    }
}

/// System-generated guess for a day (up to five numbers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
}

impl Prediction {
    pub fn new(date: NaiveDate, numbers: Vec<u8>) -> TirageResult<Self> {
        if numbers.len() > DRAW_SIZE {
            return Err(TirageError::Validation(format!(
                "A prediction holds at most {} numbers, got {}",
                DRAW_SIZE,
                numbers.len()
            )));
        }
        if let Some(bad) = numbers.iter().find(|n| !is_valid_number(**n)) {
            return Err(TirageError::Validation(format!(
                "Number {} is outside {}..={}",
                bad, MIN_NUMBER, MAX_NUMBER
            )));
        }
        Ok(Self { date, numbers })
    }
}

pub fn is_valid_number(n: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&n)
}

//==============================================================================
// Ledger (the three in-memory tables)
//==============================================================================

/// In-memory copy of the three workbook tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pub results: Vec<DrawResult>,
    pub series: Vec<DailySeries>,
    pub predictions: Vec<Prediction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series row with the same date, or append it.
    /// Older duplicates of that date are dropped.
    pub fn upsert_series(&mut self, series: DailySeries) {
        upsert_by_date(&mut self.series, series, |s| s.date);
    }

    /// Replace the prediction row with the same date, or append it.
    /// Older duplicates of that date are dropped.
    pub fn upsert_prediction(&mut self, prediction: Prediction) {
        upsert_by_date(&mut self.predictions, prediction, |p| p.date);
    }

    /// Results are append-only
    pub fn append_result(&mut self, result: DrawResult) {
        self.results.push(result);
    }

    /// Series for a date. Rows loaded from older workbooks may repeat a
    /// date; the last one wins.
    pub fn series_for(&self, date: NaiveDate) -> Option<&DailySeries> {
        self.series.iter().rev().find(|s| s.date == date)
    }

    pub fn prediction_for(&self, date: NaiveDate) -> Option<&Prediction> {
        self.predictions.iter().rev().find(|p| p.date == date)
    }

    /// Most recently appended result for a date
    pub fn result_for(&self, date: NaiveDate) -> Option<&DrawResult> {
        self.results.iter().rev().find(|r| r.date == date)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.series.is_empty() && self.predictions.is_empty()
    }
}

/// Overwrite the last row sharing `row`'s date and remove the earlier ones,
/// so lookups (which take the last match) see the new row
fn upsert_by_date<T>(rows: &mut Vec<T>, row: T, date_of: impl Fn(&T) -> NaiveDate) {
    let date = date_of(&row);
    match rows.iter().rposition(|r| date_of(r) == date) {
        Some(last) => {
            rows[last] = row;
            let mut idx = 0;
            rows.retain(|r| {
                let keep = idx >= last || date_of(r) != date;
                idx += 1;
                keep
            });
        }
        None => rows.push(row),
    }
}
