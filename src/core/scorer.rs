//! Scoring predictions against recorded results

use crate::types::{DailySeries, Ledger};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Number of values shared by a prediction and a result
pub fn score(prediction: &[u8], result: &[u8]) -> usize {
    let predicted: HashSet<u8> = prediction.iter().copied().collect();
    let drawn: HashSet<u8> = result.iter().copied().collect();
    predicted.intersection(&drawn).count()
}

/// Shared values, ascending
pub fn matched(prediction: &[u8], result: &[u8]) -> Vec<u8> {
    let predicted: BTreeSet<u8> = prediction.iter().copied().collect();
    let drawn: BTreeSet<u8> = result.iter().copied().collect();
    predicted.intersection(&drawn).copied().collect()
}

/// Everything known about a single date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub series: Option<DailySeries>,
    pub prediction: Option<Vec<u8>>,
    pub result: Option<Vec<u8>>,
    pub matched: Vec<u8>,
    /// `None` until both a prediction and a result exist
    pub score: Option<usize>,
}

/// Join the three tables on `date`
pub fn compare(ledger: &Ledger, date: NaiveDate) -> DayReport {
    let prediction = ledger.prediction_for(date).map(|p| p.numbers.clone());
    let result = ledger.result_for(date).map(|r| r.numbers.to_vec());

    let (matched, score) = match (&prediction, &result) {
        (Some(p), Some(r)) => (matched(p, r), Some(score(p, r))),
        _ => (Vec::new(), None),
    };

    DayReport {
        date,
        series: ledger.series_for(date).cloned(),
        prediction,
        result,
        matched,
        score,
    }
}

/// Scores for every date that has both a prediction and a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreHistory {
    pub days: Vec<DayReport>,
    pub total_hits: usize,
    pub best: Option<(NaiveDate, usize)>,
}

impl ScoreHistory {
    pub fn days_scored(&self) -> usize {
        self.days.len()
    }

    /// Average hits per scored day
    pub fn mean_hits(&self) -> Option<f64> {
        if self.days.is_empty() {
            None
        } else {
            Some(self.total_hits as f64 / self.days.len() as f64)
        }
    }
}

pub fn history(ledger: &Ledger) -> ScoreHistory {
    let dates: BTreeSet<NaiveDate> = ledger
        .predictions
        .iter()
        .map(|p| p.date)
        .filter(|d| ledger.result_for(*d).is_some())
        .collect();

    let days: Vec<DayReport> = dates.into_iter().map(|d| compare(ledger, d)).collect();
    let total_hits = days.iter().filter_map(|d| d.score).sum();

    // Earliest date wins a tie
    let mut best: Option<(NaiveDate, usize)> = None;
    for day in &days {
        if let Some(s) = day.score {
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((day.date, s));
            }
        }
    }

    ScoreHistory {
        days,
        total_hits,
        best,
    }
}
