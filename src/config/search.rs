use super::traits::ConfigSection;
use crate::error::{Result, SensevolveError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Budget of the random-restart baseline
    pub iterations: usize,
    /// JSON file with a custom search space; the built-in catalogue otherwise
    pub space_file: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 20,
            space_file: None,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(SensevolveError::Configuration(
                "search iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
