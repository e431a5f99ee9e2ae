//! YAML configuration
//!
//! ```yaml
//! workbook: Donnees_Tirage.xlsx
//! policy: frequency
//! seed: 7
//! sources: [matrice, clavier, cerveau]
//! top_couples: 10
//! top_digits: 20
//! picks: 5
//! ```
//!
//! Every key is optional. Command-line flags and environment variables take
//! precedence over the file.

use crate::core::{PolicyKind, PredictorSettings};
use crate::error::{TirageError, TirageResult};
use crate::types::{Source, DRAW_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workbook used when nothing else is configured
pub const DEFAULT_WORKBOOK: &str = "Donnees_Tirage.xlsx";
/// Config file picked up from the working directory
pub const DEFAULT_CONFIG: &str = "tirage.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub workbook: PathBuf,
    pub policy: PolicyKind,
    pub seed: Option<u64>,
    pub sources: Vec<Source>,
    pub top_couples: usize,
    pub top_digits: usize,
    pub picks: usize,
}

impl Default for Config {
    fn default() -> Self {
        let predictor = PredictorSettings::default();
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            policy: PolicyKind::default(),
            seed: predictor.seed,
            sources: predictor.sources,
            top_couples: predictor.top_couples,
            top_digits: predictor.top_digits,
            picks: predictor.picks,
        }
    }
}

impl Config {
    /// Parse and validate a config file
    pub fn load(path: &Path) -> TirageResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Explicit path if given, else `tirage.yaml` when present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> TirageResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> TirageResult<()> {
        if self.picks == 0 || self.picks > DRAW_SIZE {
            return Err(TirageError::Validation(format!(
                "picks must be between 1 and {}, got {}",
                DRAW_SIZE, self.picks
            )));
        }
        if self.sources.is_empty() {
            return Err(TirageError::Validation(
                "at least one source is required".to_string(),
            ));
        }
        if self.top_couples == 0 && self.top_digits == 0 {
            return Err(TirageError::Validation(
                "top_couples and top_digits cannot both be 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn predictor_settings(&self) -> PredictorSettings {
        PredictorSettings {
            seed: self.seed,
            sources: self.sources.clone(),
            top_couples: self.top_couples,
            top_digits: self.top_digits,
            picks: self.picks,
        }
    }
}
