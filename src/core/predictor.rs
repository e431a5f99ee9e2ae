//! Prediction policies
//!
//! Two unrelated strategies are offered and never mixed:
//! - `RandomPolicy` draws five distinct numbers uniformly from 1..=99.
//! - `FrequencyPolicy` counts the digits and digit pairs found in the day's
//!   series and keeps the most frequent ones.
//!
//! The frequency policy sorts the union of frequent values ascending and then
//! truncates, so the final picks favour small numbers over frequent ones.

use super::extractor::{extract, ExtractionMode, ValueRange};
use crate::types::{DailySeries, Source, DRAW_SIZE, MAX_NUMBER};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// A strategy that turns a day's series into up to five numbers
pub trait PredictionPolicy {
    fn name(&self) -> &'static str;

    /// Numbers for the day, sorted ascending
    fn predict(&mut self, series: &DailySeries) -> Vec<u8>;
}

/// Which policy to build
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Random,
    #[default]
    Frequency,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Random => write!(f, "random"),
            PolicyKind::Frequency => write!(f, "frequency"),
        }
    }
}

/// Knobs shared by the policies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorSettings {
    /// Seed for the random policy; entropy when absent
    pub seed: Option<u64>,
    /// Source fields read by the frequency policy
    pub sources: Vec<Source>,
    /// How many of the most frequent pairs to keep
    pub top_couples: usize,
    /// How many of the most frequent single digits to keep
    pub top_digits: usize,
    /// Final number of picks
    pub picks: usize,
}

impl Default for PredictorSettings {
    fn default() -> Self {
        Self {
            seed: None,
            sources: Source::ALL.to_vec(),
            top_couples: 10,
            top_digits: 20,
            picks: DRAW_SIZE,
        }
    }
}

impl PolicyKind {
    pub fn build(&self, settings: &PredictorSettings) -> Box<dyn PredictionPolicy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(settings.seed)),
            PolicyKind::Frequency => Box::new(FrequencyPolicy::from_settings(settings)),
        }
    }
}

//==============================================================================
// Random policy
//==============================================================================

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl PredictionPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn predict(&mut self, _series: &DailySeries) -> Vec<u8> {
        let mut picks: Vec<u8> =
            rand::seq::index::sample(&mut self.rng, MAX_NUMBER as usize, DRAW_SIZE)
                .into_iter()
                .map(|i| i as u8 + 1)
                .collect();
        picks.sort_unstable();
        picks
    }
}

//==============================================================================
// Frequency policy
//==============================================================================

/// Occurrences of one value across the series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValueCounts {
    pub unite: usize,
    pub couple: usize,
}

/// Count every drawable value found in the given source fields
pub fn frequency_table(series: &DailySeries, sources: &[Source]) -> BTreeMap<u8, ValueCounts> {
    let mut table: BTreeMap<u8, ValueCounts> = BTreeMap::new();
    for source in sources {
        let text = series.field(*source);
        for v in extract(text, ExtractionMode::Unite, ValueRange::drawable()) {
            table.entry(v).or_default().unite += 1;
        }
        for v in extract(text, ExtractionMode::Couple, ValueRange::drawable()) {
            table.entry(v).or_default().couple += 1;
        }
    }
    table
}

/// The `k` most frequent values; ties go to the smaller value
fn top_k(counts: impl Iterator<Item = (u8, usize)>, k: usize) -> Vec<u8> {
    let mut ranked: Vec<(u8, usize)> = counts.filter(|(_, n)| *n > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(k).map(|(v, _)| v).collect()
}

pub struct FrequencyPolicy {
    sources: Vec<Source>,
    top_couples: usize,
    top_digits: usize,
    picks: usize,
}

impl FrequencyPolicy {
    pub fn from_settings(settings: &PredictorSettings) -> Self {
        Self {
            sources: settings.sources.clone(),
            top_couples: settings.top_couples,
            top_digits: settings.top_digits,
            picks: settings.picks.min(DRAW_SIZE),
        }
    }
}

impl Default for FrequencyPolicy {
    fn default() -> Self {
        Self::from_settings(&PredictorSettings::default())
    }
}

impl PredictionPolicy for FrequencyPolicy {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn predict(&mut self, series: &DailySeries) -> Vec<u8> {
        let table = frequency_table(series, &self.sources);
        let couples = top_k(table.iter().map(|(v, c)| (*v, c.couple)), self.top_couples);
        let digits = top_k(table.iter().map(|(v, c)| (*v, c.unite)), self.top_digits);
        debug!(?couples, ?digits, "frequency candidates");

        let union: BTreeSet<u8> = couples.into_iter().chain(digits).collect();
        union.into_iter().take(self.picks).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn series() -> DailySeries {
        DailySeries::empty(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn assert_well_formed(picks: &[u8]) {
        assert!(picks.len() <= DRAW_SIZE);
        assert!(picks.windows(2).all(|w| w[0] < w[1]), "{:?}", picks);
        assert!(picks.iter().all(|n| (1..=99).contains(n)), "{:?}", picks);
    }

    #[test]
    fn test_random_policy_picks_five_distinct_sorted() {
        let mut policy = RandomPolicy::new(None);
        for _ in 0..200 {
            let picks = policy.predict(&series());
            assert_eq!(picks.len(), 5);
            assert_well_formed(&picks);
        }
    }

    #[test]
    fn test_random_policy_is_reproducible_with_seed() {
        let a = RandomPolicy::new(Some(42)).predict(&series());
        let b = RandomPolicy::new(Some(42)).predict(&series());
        assert_eq!(a, b);
    }

    #[test]
    fn test_frequency_matrice_only() {
        let s = series().with(Source::Matrice, "123,456");
        let picks = FrequencyPolicy::default().predict(&s);
        assert_eq!(picks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_frequency_empty_series_predicts_nothing() {
        let picks = FrequencyPolicy::default().predict(&series());
        assert!(picks.is_empty());
    }

    #[test]
    fn test_frequency_drops_zero_digits() {
        let s = series().with(Source::Code, "000");
        assert!(FrequencyPolicy::default().predict(&s).is_empty());
    }

    #[test]
    fn test_frequency_output_always_well_formed() {
        let inputs = [
            "987,654,321",
            "99999",
            "1,22,333",
            "junk",
            "505,050",
            "0123456789",
        ];
        for text in inputs {
            let s = series()
                .with(Source::Matrice, text)
                .with(Source::Event, "864");
            assert_well_formed(&FrequencyPolicy::default().predict(&s));
        }
    }

    #[test]
    fn test_frequency_truncation_favours_low_numbers() {
        // 9 dominates the counts, yet sorting before truncation keeps 1..5
        let s = series()
            .with(Source::Matrice, "999,999,999")
            .with(Source::Clavier, "123,456");
        let picks = FrequencyPolicy::default().predict(&s);
        assert_eq!(picks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_frequency_respects_sources() {
        let settings = PredictorSettings {
            sources: vec![Source::Matrice, Source::Clavier, Source::Cerveau],
            ..PredictorSettings::default()
        };
        let s = series().with(Source::Code, "123");
        assert!(FrequencyPolicy::from_settings(&settings)
            .predict(&s)
            .is_empty());
    }

    #[test]
    fn test_frequency_table_counts_both_modes() {
        let s = series().with(Source::Matrice, "121");
        let table = frequency_table(&s, &Source::ALL);
        assert_eq!(table[&1], ValueCounts { unite: 2, couple: 0 });
        assert_eq!(table[&12], ValueCounts { unite: 0, couple: 1 });
        assert_eq!(table[&21], ValueCounts { unite: 0, couple: 1 });
    }

    #[test]
    fn test_top_k_breaks_ties_by_value() {
        let picked = top_k(vec![(5, 2), (3, 2), (8, 4), (1, 1)].into_iter(), 3);
        assert_eq!(picked, vec![8, 3, 5]);
    }

    #[test]
    fn test_policy_kind_builds_named_policy() {
        let settings = PredictorSettings::default();
        assert_eq!(PolicyKind::Random.build(&settings).name(), "random");
        assert_eq!(PolicyKind::Frequency.build(&settings).name(), "frequency");
    }
}
