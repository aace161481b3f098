use super::classifier::{Classifier, Hyperparameter, SparseModel};
use super::persistence::ModelFile;
use crate::data::Focus;
use crate::error::{Result, SensevolveError};
use crate::functions::PipelineConfig;
use crate::ml::features::FeaturePipeline;
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Feature pipeline paired with a numeric solver
#[derive(Debug)]
pub struct PipelineClassifier<M: SparseModel> {
    config: PipelineConfig,
    pipeline: Option<FeaturePipeline>,
    model: M,
}

impl<M: SparseModel> PipelineClassifier<M> {
    pub fn new(config: PipelineConfig, model: M) -> Self {
        Self {
            config,
            pipeline: None,
            model,
        }
    }

    /// Fresh solver with the given `(key, value)` assignments applied
    pub fn with_hyperparameters(config: PipelineConfig, assignments: &[(String, String)]) -> Result<Self> {
        let mut model = M::default();
        for (key, value) in assignments {
            model.set_hyperparameter(key, value)?;
        }
        Ok(Self::new(config, model))
    }

    pub fn load(source: &mut dyn Read) -> Result<Self> {
        let file = ModelFile::<M>::read(source)?;
        let pipeline = FeaturePipeline::from_parts(file.pipeline.clone(), file.features, file.labels)?;
        Ok(Self {
            config: file.pipeline,
            pipeline: Some(pipeline),
            model: file.model,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn is_trained(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Labels seen during training, in index order
    pub fn labels(&self) -> Vec<String> {
        self.pipeline
            .as_ref()
            .map(|p| p.label_vocabulary().terms().to_vec())
            .unwrap_or_default()
    }

    fn trained_pipeline(&self) -> Result<&FeaturePipeline> {
        self.pipeline
            .as_ref()
            .ok_or_else(|| SensevolveError::IllegalState("classifier used before training".to_string()))
    }
}

impl<M: SparseModel> Classifier for PipelineClassifier<M> {
    fn classify(&self, instance: &Focus) -> Result<String> {
        let scores = self.score(instance)?;
        scores
            .into_iter()
            .fold(None, |best: Option<(String, f64)>, (label, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((label, score)),
            })
            .map(|(label, _)| label)
            .ok_or_else(|| SensevolveError::IllegalState("classifier produced no scores".to_string()))
    }

    fn score(&self, instance: &Focus) -> Result<BTreeMap<String, f64>> {
        let pipeline = self.trained_pipeline()?;
        let vectorized = pipeline.process(instance)?;
        let labels = pipeline.label_vocabulary();
        Ok(self
            .model
            .scores(&vectorized.vector)
            .into_iter()
            .enumerate()
            .filter_map(|(i, score)| labels.term(i).map(|label| (label.to_string(), score)))
            .collect())
    }

    fn train(&mut self, train: &[Focus], valid: &[Focus]) -> Result<()> {
        let mut pipeline = FeaturePipeline::new(self.config.clone())?;
        let data = pipeline.train(train)?;
        self.model.fit(
            &data,
            pipeline.feature_vocabulary().len(),
            pipeline.label_vocabulary().len(),
        )?;
        self.pipeline = Some(pipeline);

        if !valid.is_empty() {
            let mut correct = 0;
            for instance in valid {
                if instance.label() == Some(self.classify(instance)?) {
                    correct += 1;
                }
            }
            log::debug!(
                "Validation accuracy {:.4} on {} instances",
                correct as f64 / valid.len() as f64,
                valid.len()
            );
        }
        Ok(())
    }

    fn hyperparameters(&self) -> Vec<Hyperparameter> {
        self.model.hyperparameters()
    }

    fn set_hyperparameter(&mut self, key: &str, value: &str) -> Result<()> {
        self.model.set_hyperparameter(key, value)
    }

    fn save(&self, sink: &mut dyn Write) -> Result<()> {
        let pipeline = self.trained_pipeline()?;
        ModelFile::new(
            self.config.clone(),
            pipeline.feature_vocabulary().clone(),
            pipeline.label_vocabulary().clone(),
            self.model.clone(),
        )
        .write(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Instance, Sequence};
    use crate::functions::{ContextSpec, ExtractorSpec, FeatureSpec};
    use crate::ml::models::AveragedPerceptron;
    use crate::types::FeatureKey;
    use std::io::Cursor;
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

    fn classifier() -> PipelineClassifier<AveragedPerceptron> {
        let config = PipelineConfig::new(vec![
            FeatureSpec::Bias,
            FeatureSpec::Single {
                context: ContextSpec::Offsets {
                    key: "W".to_string(),
                    offsets: vec![-1],
                    concatenate: false,
                },
                extractors: vec![ExtractorSpec::Identity],
            },
        ]);
        PipelineClassifier::new(config, AveragedPerceptron::default())
    }

    fn corpus() -> Vec<Focus> {
        vec![
            focus("river", "shore"),
            focus("savings", "finance"),
            focus("river", "shore"),
            focus("savings", "finance"),
        ]
    }

    #[test]
    fn test_classify_before_training_fails() {
        let classifier = classifier();
        assert!(matches!(
            classifier.classify(&focus("river", "shore")),
            Err(SensevolveError::IllegalState(_))
        ));
    }

    #[test]
    fn test_train_classify_save_load() {
        let mut classifier = classifier();
        classifier.train(&corpus(), &[]).unwrap();

        assert_eq!(classifier.classify(&focus("river", "?")).unwrap(), "shore");
        assert_eq!(classifier.classify(&focus("savings", "?")).unwrap(), "finance");
        assert_eq!(classifier.score(&focus("canoe", "?")).unwrap().len(), 2);

        let mut buffer = Vec::new();
        classifier.save(&mut buffer).unwrap();
        let loaded = PipelineClassifier::<AveragedPerceptron>::load(&mut Cursor::new(buffer)).unwrap();

        assert_eq!(loaded.labels(), classifier.labels());
        assert_eq!(loaded.classify(&focus("savings", "?")).unwrap(), "finance");
    }
}
