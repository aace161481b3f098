use super::{
    format_seed, parse_seed, report_validation, retrain, set_validation_hyperparameter, unknown_hyperparameter,
    untrained, validation_hyperparameters, CrossValidationFitness,
};
use crate::config::{AppConfig, ConfigSection, EvolutionConfig, ValidationConfig};
use crate::data::Focus;
use crate::engines::generation::{
    Candidate, GenerationStats, GeneticAlgorithm, Genotype, LogProgressCallback, PipelineGenotype,
};
use crate::error::Result;
use crate::functions::SearchSpace;
use crate::ml::models::{parse_value, Classifier, Hyperparameter, PipelineClassifier, SparseModel};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

/// Searches pipeline architectures with the genetic algorithm, then retrains the winner
///
/// Its own hyperparameters are the search settings; the solver's come from the
/// search space and the classifier configuration.
pub struct EvolutionaryTrainer<M: SparseModel> {
    evolution: EvolutionConfig,
    validation: ValidationConfig,
    base_hyperparameters: Vec<(String, String)>,
    space: Arc<SearchSpace>,
    best: Option<(Candidate, f64)>,
    history: Vec<GenerationStats>,
    classifier: Option<PipelineClassifier<M>>,
}

impl<M: SparseModel> EvolutionaryTrainer<M> {
    pub fn new(config: &AppConfig, space: SearchSpace) -> Result<Self> {
        config.validate()?;
        space.validate()?;
        Ok(Self {
            evolution: config.evolution.clone(),
            validation: config.validation.clone(),
            base_hyperparameters: config.classifier.assignments(),
            space: Arc::new(space),
            best: None,
            history: Vec::new(),
            classifier: None,
        })
    }

    pub fn best_candidate(&self) -> Option<&Candidate> {
        self.best.as_ref().map(|(c, _)| c)
    }

    /// Cross-validated fitness of the best candidate
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, f)| *f)
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    pub fn classifier(&self) -> Option<&PipelineClassifier<M>> {
        self.classifier.as_ref()
    }

    fn trained(&self) -> Result<&PipelineClassifier<M>> {
        self.classifier.as_ref().ok_or_else(untrained)
    }
}

impl<M: SparseModel> Classifier for EvolutionaryTrainer<M> {
    fn classify(&self, instance: &Focus) -> Result<String> {
        self.trained()?.classify(instance)
    }

    fn score(&self, instance: &Focus) -> Result<BTreeMap<String, f64>> {
        self.trained()?.score(instance)
    }

    fn train(&mut self, train: &[Focus], valid: &[Focus]) -> Result<()> {
        self.evolution.validate()?;
        self.validation.validate()?;

        let mut fitness = CrossValidationFitness::<M>::new(self.validation.clone(), self.base_hyperparameters.clone());
        fitness.initialize(train)?;

        log::info!(
            "Evolving pipelines: population {}, up to {} epochs, {} training instances",
            self.evolution.population_size,
            self.evolution.max_epochs,
            train.len()
        );
        let mut ga = GeneticAlgorithm::new(
            self.evolution.clone(),
            PipelineGenotype::new(self.space.clone()),
            fitness,
        )?;
        let best = ga.run(&mut LogProgressCallback)?;
        self.history = ga.history().to_vec();

        let candidate = best.phenotype()?;
        log::info!("Best candidate ({:.4}): {}", best.fitness(), candidate);

        let classifier = retrain(ga.fitness_function(), &candidate, train)?;
        report_validation(&classifier, valid, self.validation.beta)?;

        self.best = Some((candidate, best.fitness()));
        self.classifier = Some(classifier);
        Ok(())
    }

    fn hyperparameters(&self) -> Vec<Hyperparameter> {
        let e = &self.evolution;
        let mut hyperparameters = vec![
            Hyperparameter::new("Population", "population_size", "Individuals per generation", e.population_size),
            Hyperparameter::new("Max epochs", "max_epochs", "Upper bound on generations", e.max_epochs),
            Hyperparameter::new("Patience", "patience", "Epochs without improvement before stopping; 0 disables", e.patience),
            Hyperparameter::new("Crossover", "crossover_probability", "Probability a selected pair is recombined", e.crossover_probability),
            Hyperparameter::new("Mutation", "mutation_probability", "Base per-gene mutation probability", e.mutation_probability),
            Hyperparameter::new("Elites", "num_elites", "Best individuals carried into every generation", e.num_elites),
            Hyperparameter::new("Threads", "threads", "Fitness worker threads; 0 for the default", e.threads),
            Hyperparameter::new("Seed", "seed", "Seed for the search, or none", format_seed(e.seed)),
        ];
        hyperparameters.extend(validation_hyperparameters(&self.validation));
        hyperparameters
    }

    fn set_hyperparameter(&mut self, key: &str, value: &str) -> Result<()> {
        let e = &mut self.evolution;
        match key {
            "population_size" => e.population_size = parse_value(key, value)?,
            "max_epochs" => e.max_epochs = parse_value(key, value)?,
            "patience" => e.patience = parse_value(key, value)?,
            "crossover_probability" => e.crossover_probability = parse_value(key, value)?,
            "mutation_probability" => e.mutation_probability = parse_value(key, value)?,
            "num_elites" => e.num_elites = parse_value(key, value)?,
            "threads" => e.threads = parse_value(key, value)?,
            "seed" => e.seed = parse_seed(key, value)?,
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
