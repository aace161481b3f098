use super::instance::Instance;
use super::sequence::Sequence;
use crate::types::{FeatureBag, FeatureKey, FeatureValue};
use std::sync::Arc;

/// "Classify this token within this sequence"
///
/// Several focus instances may share one sentence, so the sequence is reference
/// counted rather than copied. Annotations such as the gold label live on the focus
/// itself.
#[derive(Debug, Clone)]
pub struct Focus {
    sequence: Arc<Sequence>,
    index: usize,
    pub features: FeatureBag,
}

impl Focus {
    /// Returns `None` when `index` is outside the sequence
    pub fn new(sequence: Arc<Sequence>, index: usize) -> Option<Self> {
        if index >= sequence.size() {
            return None;
        }
        Some(Self {
            sequence,
            index,
            features: FeatureBag::new(),
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.features
            .insert(FeatureKey::Label, FeatureValue::Text(label.into()));
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn shared_sequence(&self) -> &Arc<Sequence> {
        &self.sequence
    }

    /// The focus token itself
    pub fn focus(&self) -> &Instance {
        // index was bounds-checked in `new` and the sequence cannot shrink behind the Arc
        self.sequence
            .get(self.index)
            .unwrap_or(&self.sequence.instance)
    }

    pub fn size(&self) -> usize {
        self.sequence.size()
    }

    pub fn get(&self, i: usize) -> Option<&Instance> {
        self.sequence.get(i)
    }

    /// Gold label, if annotated
    pub fn label(&self) -> Option<String> {
        self.features
            .get(&FeatureKey::Label)
            .and_then(FeatureValue::as_text)
    }
}
