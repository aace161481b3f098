use super::folds::Fold;
use crate::data::Focus;
use crate::engines::metrics::ClassificationReport;
use crate::error::Result;
use crate::ml::models::Classifier;
use serde::{Deserialize, Serialize};

/// Predictions for one fold's test split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub fold_num: usize,
    /// `(prediction, gold)`
    pub pairs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub folds: Vec<ValidationResult>,
    pub report: ClassificationReport,
}

impl AggregatedResult {
    /// Union of all folds' pairs, in fold order
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.folds.iter().flat_map(|f| f.pairs.iter().cloned()).collect()
    }
}

/// Trains a fresh classifier per fold and scores it on that fold's test split
///
/// Folds run sequentially. A fold with an empty train or test split is skipped.
pub fn cross_validate<C, F>(
    make_classifier: F,
    folds: &[Fold<Focus>],
    beta: f64,
) -> Result<AggregatedResult>
where
    C: Classifier,
    F: Fn() -> Result<C>,
{
    let mut results = Vec::with_capacity(folds.len());

    for fold in folds {
        if fold.train.is_empty() || fold.test.is_empty() {
            log::warn!(
                "Skipping fold {} (train={}, test={})",
                fold.fold_num,
                fold.train.len(),
                fold.test.len()
            );
            continue;
        }

        let mut classifier = make_classifier()?;
        classifier.train(&fold.train, &[])?;

        let mut pairs = Vec::with_capacity(fold.test.len());
        for instance in &fold.test {
            let predicted = classifier.classify(instance)?;
            pairs.push((predicted, instance.label().unwrap_or_default()));
        }
        results.push(ValidationResult {
            fold_num: fold.fold_num,
            pairs,
        });
    }

    let all: Vec<(String, String)> = results.iter().flat_map(|f| f.pairs.iter().cloned()).collect();
    let report = ClassificationReport::from_pairs(&all, beta);
    Ok(AggregatedResult {
        folds: results,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Instance, Sequence};
    use crate::functions::{ContextSpec, ExtractorSpec, FeatureSpec, PipelineConfig};
    use crate::ml::models::{AveragedPerceptron, PipelineClassifier};
    use crate::types::FeatureKey;
    use std::sync::Arc;

    fn focus(left: &str, label: &str) -> Focus {
        let tokens = [left, "bank"]
            .iter()
            .map(|w| Instance::default().with(FeatureKey::Text, *w))
            .collect();
        Focus::new(Arc::new(Sequence::from_instances(0, tokens)), 1)
            .unwrap()
            .with_label(label)
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new(vec![
            FeatureSpec::Bias,
            FeatureSpec::Single {
                context: ContextSpec::Offsets {
                    key: "W".to_string(),
                    offsets: vec![-1],
                    concatenate: false,
                },
                extractors: vec![ExtractorSpec::Identity],
            },
        ])
    }

    #[test]
    fn test_separable_folds_score_perfectly() {
        let data = vec![
            focus("river", "shore"),
            focus("savings", "finance"),
            focus("river", "shore"),
            focus("savings", "finance"),
        ];
        let fold = Fold {
            train: data.clone(),
            test: data,
            fold_num: 0,
        };

        let result = cross_validate(
            || Ok(PipelineClassifier::new(config(), AveragedPerceptron::default())),
            &[fold],
            1.0,
        )
        .unwrap();

        assert_eq!(result.pairs().len(), 4);
        assert_eq!(result.report.f_score, 1.0);
    }

    #[test]
    fn test_empty_folds_are_skipped() {
        let fold = Fold {
            train: vec![focus("river", "shore")],
            test: Vec::new(),
            fold_num: 0,
        };
        let result = cross_validate(
            || Ok(PipelineClassifier::new(config(), AveragedPerceptron::default())),
            &[fold],
            1.0,
        )
        .unwrap();
        assert!(result.folds.is_empty());
        assert_eq!(result.report.total, 0);
    }
}
