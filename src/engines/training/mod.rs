pub mod evolutionary;
pub mod fitness;
pub mod random_search;

pub use evolutionary::EvolutionaryTrainer;
pub use fitness::CrossValidationFitness;
pub use random_search::RandomSearchTrainer;

use crate::config::ValidationConfig;
use crate::data::Focus;
use crate::engines::generation::Candidate;
use crate::engines::metrics::ClassificationReport;
use crate::error::{Result, SensevolveError};
use crate::ml::models::{parse_value, Classifier, Hyperparameter, PipelineClassifier, SparseModel};

/// Train the winning candidate on the whole training set
fn retrain<M: SparseModel>(
    fitness: &CrossValidationFitness<M>,
    candidate: &Candidate,
    train: &[Focus],
) -> Result<PipelineClassifier<M>> {
    let mut classifier = fitness.classifier(candidate)?;
    classifier.train(train, &[])?;
    Ok(classifier)
}

fn report_validation<C: Classifier>(classifier: &C, valid: &[Focus], beta: f64) -> Result<()> {
    if valid.is_empty() {
        return Ok(());
    }
    let mut pairs = Vec::with_capacity(valid.len());
    for instance in valid {
        pairs.push((classifier.classify(instance)?, instance.label().unwrap_or_default()));
    }
    let report = ClassificationReport::from_pairs(&pairs, beta);
    log::info!(
        "Validation on {} instances: P={:.4} R={:.4} F={:.4} (macro F={:.4})",
        report.total,
        report.precision,
        report.recall,
        report.f_score,
        report.macro_f_score
    );
    Ok(())
}

fn format_seed(seed: Option<u64>) -> String {
    seed.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
}

fn parse_seed(key: &str, value: &str) -> Result<Option<u64>> {
    if value.trim().eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_value(key, value).map(Some)
    }
}

fn validation_hyperparameters(config: &ValidationConfig) -> Vec<Hyperparameter> {
    vec![
        Hyperparameter::new("Folds", "num_folds", "Cross-validation folds per candidate", config.num_folds),
        Hyperparameter::new("Train ratio", "ratio", "Share of each label used for training in a fold", config.ratio),
        Hyperparameter::new("Fold seed", "fold_seed", "Seed for fold sampling, or none", format_seed(config.seed)),
        Hyperparameter::new("Beta", "beta", "F-beta weighting used as fitness", config.beta),
    ]
}

/// Returns `Ok(false)` when the key is not a validation setting
fn set_validation_hyperparameter(config: &mut ValidationConfig, key: &str, value: &str) -> Result<bool> {
    match key {
        "num_folds" => config.num_folds = parse_value(key, value)?,
        "ratio" => config.ratio = parse_value(key, value)?,
        "fold_seed" => config.seed = parse_seed(key, value)?,
        "beta" => config.beta = parse_value(key, value)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn unknown_hyperparameter(key: &str, value: &str) -> SensevolveError {
    SensevolveError::Hyperparameter {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn untrained() -> SensevolveError {
    SensevolveError::IllegalState("trainer used before training".to_string())
}
