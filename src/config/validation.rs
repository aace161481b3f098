use super::traits::ConfigSection;
use crate::engines::validation::SplitConfig;
use crate::error::{Result, SensevolveError};
use serde::{Deserialize, Serialize};

/// Cross-validation used as the search fitness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub num_folds: usize,
    /// Share of each label group used for training in every fold
    pub ratio: f64,
    pub seed: Option<u64>,
    /// F-beta weighting of recall against precision
    pub beta: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            num_folds: 5,
            ratio: 0.8,
            seed: Some(1),
            beta: 1.0,
        }
    }
}

impl ValidationConfig {
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig {
            num_folds: self.num_folds,
            ratio: self.ratio,
            seed: self.seed,
        }
    }
}

impl ConfigSection for ValidationConfig {
    fn section_name() -> &'static str {
        "validation"
    }

    fn validate(&self) -> Result<()> {
        if self.num_folds == 0 {
            return Err(SensevolveError::Configuration(
                "num_folds must be at least 1".to_string(),
            ));
        }
        if self.ratio <= 0.0 || self.ratio >= 1.0 {
            return Err(SensevolveError::Configuration(
                "ratio must be strictly between 0 and 1".to_string(),
            ));
        }
        if self.beta <= 0.0 {
            return Err(SensevolveError::Configuration("beta must be positive".to_string()));
        }
        Ok(())
    }
}
