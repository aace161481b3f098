use crate::types::{FeatureBag, FeatureKey, FeatureValue};

/// Any annotated entity: a token, a sentence, a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instance {
    pub index: usize,
    pub features: FeatureBag,
}

impl Instance {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            features: FeatureBag::new(),
        }
    }

    /// Builder-style insertion, handy for constructing tokens inline
    pub fn with(mut self, key: FeatureKey, value: impl Into<FeatureValue>) -> Self {
        self.features.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &FeatureKey) -> Option<&FeatureValue> {
        self.features.get(key)
    }

    pub fn insert(&mut self, key: FeatureKey, value: impl Into<FeatureValue>) {
        self.features.insert(key, value.into());
    }

    /// Textual representation: the `Text` annotation, else the index
    pub fn text(&self) -> String {
        self.get(&FeatureKey::Text)
            .and_then(FeatureValue::as_text)
            .unwrap_or_else(|| self.index.to_string())
    }
}
