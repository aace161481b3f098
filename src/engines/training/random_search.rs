use super::{
    format_seed, parse_seed, report_validation, retrain, set_validation_hyperparameter, unknown_hyperparameter,
    untrained, validation_hyperparameters, CrossValidationFitness,
};
use crate::config::{AppConfig, ConfigSection, SearchConfig, ValidationConfig};
use crate::data::Focus;
use crate::engines::generation::{Candidate, FitnessFunction, Genotype, PipelineGenotype};
use crate::error::Result;
use crate::functions::SearchSpace;
use crate::ml::models::{parse_value, Classifier, Hyperparameter, PipelineClassifier, SparseModel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

/// Baseline search: independent random pipelines, best one retrained
pub struct RandomSearchTrainer<M: SparseModel> {
    search: SearchConfig,
    validation: ValidationConfig,
    seed: Option<u64>,
    base_hyperparameters: Vec<(String, String)>,
    space: Arc<SearchSpace>,
    best: Option<(Candidate, f64)>,
    classifier: Option<PipelineClassifier<M>>,
}

impl<M: SparseModel> RandomSearchTrainer<M> {
    /// Draws use `evolution.seed` so both trainers are reproducible from one setting
    pub fn new(config: &AppConfig, space: SearchSpace) -> Result<Self> {
        config.validate()?;
        space.validate()?;
        Ok(Self {
            search: config.search.clone(),
            validation: config.validation.clone(),
            seed: config.evolution.seed,
            base_hyperparameters: config.classifier.assignments(),
            space: Arc::new(space),
            best: None,
            classifier: None,
        })
    }

    pub fn best_candidate(&self) -> Option<&Candidate> {
        self.best.as_ref().map(|(c, _)| c)
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, f)| *f)
    }

    pub fn classifier(&self) -> Option<&PipelineClassifier<M>> {
        self.classifier.as_ref()
    }

    fn trained(&self) -> Result<&PipelineClassifier<M>> {
        self.classifier.as_ref().ok_or_else(untrained)
    }
}

impl<M: SparseModel> Classifier for RandomSearchTrainer<M> {
    fn classify(&self, instance: &Focus) -> Result<String> {
        self.trained()?.classify(instance)
    }

    fn score(&self, instance: &Focus) -> Result<BTreeMap<String, f64>> {
        self.trained()?.score(instance)
    }

    fn train(&mut self, train: &[Focus], valid: &[Focus]) -> Result<()> {
        self.search.validate()?;
        self.validation.validate()?;

        let mut fitness = CrossValidationFitness::<M>::new(self.validation.clone(), self.base_hyperparameters.clone());
        fitness.initialize(train)?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut best: Option<(Candidate, f64)> = None;
        for iteration in 0..self.search.iterations {
            let mut genotype = PipelineGenotype::new(self.space.clone());
            genotype.randomize(&mut rng);
            let candidate = genotype.phenotype()?;
            let score = fitness.evaluate(&candidate)?;

            if best.as_ref().map_or(true, |(_, top)| score > *top) {
                log::info!("Iteration {}: new best {:.4} {}", iteration + 1, score, candidate);
                best = Some((candidate, score));
            }
        }

        if let Some((candidate, score)) = best {
            let classifier = retrain(&fitness, &candidate, train)?;
            report_validation(&classifier, valid, self.validation.beta)?;
            self.best = Some((candidate, score));
            self.classifier = Some(classifier);
        }
        Ok(())
    }

    fn hyperparameters(&self) -> Vec<Hyperparameter> {
        let mut hyperparameters = vec![
            Hyperparameter::new("Iterations", "iterations", "Random pipelines to cross-validate", self.search.iterations),
            Hyperparameter::new("Seed", "seed", "Seed for pipeline sampling, or none", format_seed(self.seed)),
        ];
        hyperparameters.extend(validation_hyperparameters(&self.validation));
        hyperparameters
    }

    fn set_hyperparameter(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "iterations" => self.search.iterations = parse_value(key, value)?,
            "seed" => self.seed = parse_seed(key, value)?,
            _ => {
                if !set_validation_hyperparameter(&mut self.validation, key, value)? {
                    return Err(unknown_hyperparameter(key, value));
                }
            }
        }
        Ok(())
    }

    fn save(&self, sink: &mut dyn Write) -> Result<()> {
        self.trained()?.save(sink)
    }
}
