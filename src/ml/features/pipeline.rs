use super::sparse::{SparseInstance, SparseVector};
use super::vocabulary::{Vocabulary, VocabularyBuilder, DEFAULT_INDEX};
use crate::data::Focus;
use crate::error::{Result, SensevolveError};
use crate::functions::{AggregateFunction, FeatureFunction, PipelineConfig};

/// Reserved feature term at `DEFAULT_INDEX`; every unseen inference feature lands here
pub const UNKNOWN_FEATURE: &str = "<unk>";

/// Feature functions plus the feature and label vocabularies learned from training data
///
/// `train` is the only place vocabularies grow. After it returns they are frozen, and
/// `process` maps unseen features to the reserved unknown entry.
#[derive(Debug)]
pub struct FeaturePipeline {
    config: PipelineConfig,
    function: AggregateFunction,
    features: Vocabulary,
    labels: Vocabulary,
    trained: bool,
}

impl FeaturePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let function = config.build()?;
        Ok(Self {
            config,
            function,
            features: Vocabulary::default(),
            labels: Vocabulary::default(),
            trained: false,
        })
    }

    /// Restore a trained pipeline from persisted parts
    pub fn from_parts(config: PipelineConfig, features: Vocabulary, labels: Vocabulary) -> Result<Self> {
        let mut pipeline = Self::new(config)?;
        pipeline.features = features;
        pipeline.labels = labels;
        pipeline.trained = true;
        Ok(pipeline)
    }

    /// Replace the configuration and forget any learned vocabularies
    pub fn initialize(&mut self, config: PipelineConfig) -> Result<()> {
        *self = Self::new(config)?;
        Ok(())
    }

    pub fn train(&mut self, instances: &[Focus]) -> Result<Vec<SparseInstance>> {
        let mut features = VocabularyBuilder::new();
        let mut labels = VocabularyBuilder::new();
        features.index_of(UNKNOWN_FEATURE);

        let mut vectors = Vec::with_capacity(instances.len());
        for instance in instances {
            let label = instance.label().ok_or_else(|| {
                SensevolveError::IllegalState(format!(
                    "training instance at token {} has no label",
                    instance.index()
                ))
            })?;
            let pairs = self
                .function
                .apply(instance)
                .iter()
                .map(|f| (features.index_of(&f.term()), 1.0))
                .collect();
            vectors.push(SparseInstance {
                vector: SparseVector::from_pairs(pairs),
                target: labels.index_of(&label),
            });
        }

        self.features = features.build();
        self.labels = labels.build();
        self.trained = true;
        log::debug!(
            "Pipeline trained on {} instances: {} features, {} labels",
            instances.len(),
            self.features.len(),
            self.labels.len()
        );
        Ok(vectors)
    }

    /// Vectorize with the frozen vocabularies; unlabeled instances get target 0
    pub fn process(&self, instance: &Focus) -> Result<SparseInstance> {
        if !self.trained {
            return Err(SensevolveError::IllegalState(
                "feature pipeline used before training".to_string(),
            ));
        }
        let pairs = self
            .function
            .apply(instance)
            .iter()
            .map(|f| (self.features.index(&f.term()), 1.0))
            .collect();
        let target = instance
            .label()
            .map(|label| self.labels.index(&label))
            .unwrap_or(DEFAULT_INDEX);
        Ok(SparseInstance {
            vector: SparseVector::from_pairs(pairs),
            target,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn feature_vocabulary(&self) -> &Vocabulary {
        &self.features
    }

    pub fn label_vocabulary(&self) -> &Vocabulary {
        &self.labels
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Instance, Sequence};
    use crate::functions::{ContextSpec, ExtractorSpec, FeatureSpec};
    use crate::types::FeatureKey;
    use std::sync::Arc;

    fn focus(words: &[&str], index: usize, label: &str) -> Focus {
        let tokens = words
            .iter()
            .map(|w| Instance::default().with(FeatureKey::Text, *w))
            .collect();
        Focus::new(Arc::new(Sequence::from_instances(0, tokens)), index)
            .unwrap()
            .with_label(label)
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new(vec![
            FeatureSpec::Bias,
            FeatureSpec::Single {
                context: ContextSpec::Offsets {
                    key: "W".to_string(),
                    offsets: vec![-1, 1],
                    concatenate: false,
                },
                extractors: vec![ExtractorSpec::Identity],
            },
        ])
    }

    #[test]
    fn test_process_before_train_fails() {
        let pipeline = FeaturePipeline::new(config()).unwrap();
        let result = pipeline.process(&focus(&["a", "b", "c"], 1, "x"));
        assert!(matches!(result, Err(SensevolveError::IllegalState(_))));
    }

    #[test]
    fn test_inference_does_not_grow_vocabularies() {
        let mut pipeline = FeaturePipeline::new(config()).unwrap();
        let train = vec![
            focus(&["river", "bank", "flooded"], 1, "bank%river"),
            focus(&["the", "bank", "lent"], 1, "bank%finance"),
        ];
        let vectors = pipeline.train(&train).unwrap();
        assert_eq!(vectors[0].target, 0);
        assert_eq!(vectors[1].target, 1);

        let features_before = pipeline.feature_vocabulary().len();
        let unseen = pipeline
            .process(&focus(&["muddy", "bank", "eroded"], 1, "bank%unknown"))
            .unwrap();

        assert_eq!(pipeline.feature_vocabulary().len(), features_before);
        assert_eq!(pipeline.label_vocabulary().len(), 2);
        // bias is known; both neighbours collapse onto the unknown slot
        assert_eq!(unseen.vector.indices(), &[DEFAULT_INDEX, 1]);
        assert_eq!(unseen.vector.values(), &[2.0, 1.0]);
    }

    #[test]
    fn test_unlabeled_training_instance_is_rejected() {
        let mut pipeline = FeaturePipeline::new(config()).unwrap();
        let tokens = vec![Instance::default().with(FeatureKey::Text, "bank")];
        let unlabeled = Focus::new(Arc::new(Sequence::from_instances(0, tokens)), 0).unwrap();
        assert!(pipeline.train(&[unlabeled]).is_err());
    }
}
