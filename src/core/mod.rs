//! Extraction, prediction and scoring

pub mod extractor;
pub mod predictor;
pub mod scorer;

pub use extractor::{extract, ExtractionMode, ValueRange};
pub use predictor::{
    frequency_table, FrequencyPolicy, PolicyKind, PredictionPolicy, PredictorSettings,
    RandomPolicy,
};
pub use scorer::{compare, history, score, DayReport, ScoreHistory};
