//! Digit and pair extraction from free-text source fields
//!
//! A source field is either a list of 3-digit groups (`"123,456"`) or an
//! arbitrary numeric string (`"90817"`). Tokens that are not purely made of
//! ASCII digits contribute nothing; malformed input never raises an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// How a digit token is turned into numbers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Each digit is a value: "123" → 1, 2, 3
    #[default]
    Unite,
    /// Each adjacent pair is a value: "123" → 12, 23
    Couple,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Unite => write!(f, "unite"),
            ExtractionMode::Couple => write!(f, "couple"),
        }
    }
}

/// Inclusive bounds for extracted values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: u8,
    pub max: u8,
}

impl ValueRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// 1..=99, the numbers a draw can actually produce
    pub const fn drawable() -> Self {
        Self::new(crate::types::MIN_NUMBER, crate::types::MAX_NUMBER)
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0, 99)
    }
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,;\s]+").expect("separator pattern is valid"))
}

/// Tokens made only of ASCII digits
fn digit_tokens(text: &str) -> impl Iterator<Item = &str> {
    separator()
        .split(text.trim())
        .filter(|tok| !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit()))
}

/// Extract values from `text` according to `mode`, keeping those in `range`
pub fn extract(text: &str, mode: ExtractionMode, range: ValueRange) -> Vec<u8> {
    let mut values = Vec::new();
    for token in digit_tokens(text) {
        let digits: Vec<u8> = token.bytes().map(|b| b - b'0').collect();
        match mode {
            ExtractionMode::Unite => values.extend(digits),
            ExtractionMode::Couple => {
                values.extend(digits.windows(2).map(|pair| pair[0] * 10 + pair[1]))
            }
        }
    }
    values.retain(|v| range.contains(*v));
    values
}
