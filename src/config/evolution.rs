use super::traits::ConfigSection;
use crate::error::{Result, SensevolveError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_epochs: usize,
    /// Epochs without improvement before stopping; 0 disables early stopping
    pub patience: usize,
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    pub num_elites: usize,
    /// Fitness worker threads; 0 lets rayon decide
    pub threads: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            max_epochs: 10,
            patience: 3,
            crossover_probability: 0.8,
            mutation_probability: 0.1,
            num_elites: 2,
            threads: 0,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(SensevolveError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.max_epochs == 0 {
            return Err(SensevolveError::Configuration(
                "max_epochs must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(SensevolveError::Configuration(
                "Mutation probability must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(SensevolveError::Configuration(
                "Crossover probability must be between 0 and 1".to_string(),
            ));
        }
        if self.num_elites >= self.population_size {
            return Err(SensevolveError::Configuration(format!(
                "num_elites ({}) must be smaller than population_size ({})",
                self.num_elites, self.population_size
            )));
        }
        Ok(())
    }
}
