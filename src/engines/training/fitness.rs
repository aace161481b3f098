use crate::config::ValidationConfig;
use crate::data::Focus;
use crate::engines::generation::{Candidate, FitnessFunction};
use crate::engines::validation::{cross_validate, AggregatedResult, DataSplitter, Fold, StratifiedSplitter};
use crate::error::{Result, SensevolveError};
use crate::ml::models::{PipelineClassifier, SparseModel};
use std::marker::PhantomData;

/// Cross-validated micro F-score of a candidate pipeline
///
/// Folds are drawn once in `initialize`, so every candidate is scored on the same
/// splits and the score of a given candidate never changes during a run.
pub struct CrossValidationFitness<M> {
    validation: ValidationConfig,
    base_hyperparameters: Vec<(String, String)>,
    folds: Option<Vec<Fold<Focus>>>,
    _model: PhantomData<fn() -> M>,
}

impl<M: SparseModel> CrossValidationFitness<M> {
    /// `base_hyperparameters` apply to every solver before the candidate's own
    pub fn new(validation: ValidationConfig, base_hyperparameters: Vec<(String, String)>) -> Self {
        Self {
            validation,
            base_hyperparameters,
            folds: None,
            _model: PhantomData,
        }
    }

    pub fn initialize(&mut self, train: &[Focus]) -> Result<()> {
        let splitter = StratifiedSplitter::new(self.validation.split_config(), |f: &Focus| {
            f.label().unwrap_or_default()
        });
        let folds = splitter.split(train);
        if folds.iter().all(|f| f.train.is_empty() || f.test.is_empty()) {
            return Err(SensevolveError::IllegalState(format!(
                "{} training instances are too few to form any cross-validation fold",
                train.len()
            )));
        }
        log::debug!(
            "Built {} folds from {} instances",
            folds.len(),
            train.len()
        );
        self.folds = Some(folds);
        Ok(())
    }

    pub fn folds(&self) -> Option<&[Fold<Focus>]> {
        self.folds.as_deref()
    }

    /// Fresh, untrained classifier for the candidate
    pub fn classifier(&self, candidate: &Candidate) -> Result<PipelineClassifier<M>> {
        let assignments: Vec<(String, String)> = self
            .base_hyperparameters
            .iter()
            .chain(&candidate.hyperparameters)
            .cloned()
            .collect();
        PipelineClassifier::with_hyperparameters(candidate.pipeline.clone(), &assignments)
    }

    pub fn cross_validate(&self, candidate: &Candidate) -> Result<AggregatedResult> {
        let folds = self.folds.as_deref().ok_or_else(|| {
            SensevolveError::IllegalState("fitness evaluated before initialization with training data".to_string())
        })?;
        cross_validate(|| self.classifier(candidate), folds, self.validation.beta)
    }
}

impl<M: SparseModel> FitnessFunction<Candidate> for CrossValidationFitness<M> {
    /// A pipeline that cannot be built scores zero instead of aborting the search
    fn evaluate(&self, candidate: &Candidate) -> Result<f64> {
        match self.cross_validate(candidate) {
            Ok(result) => {
                log::debug!("{} -> {:.4}", candidate, result.report.f_score);
                Ok(result.report.f_score)
            }
            Err(SensevolveError::InvalidPipeline(message)) => {
                log::warn!("Discarding candidate {}: {}", candidate, message);
                Ok(0.0)
            }
            Err(e) => Err(e),
        }
    }
}
