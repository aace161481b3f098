use super::traits::ConfigSection;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Solver settings applied before any searched hyperparameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub hyperparameters: BTreeMap<String, String>,
}

impl ClassifierConfig {
    pub fn assignments(&self) -> Vec<(String, String)> {
        self.hyperparameters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl ConfigSection for ClassifierConfig {
    fn section_name() -> &'static str {
        "classifier"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
