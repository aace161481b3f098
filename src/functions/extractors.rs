use super::traits::FeatureExtractor;
use crate::data::Instance;
use crate::types::{FeatureKey, FeatureValue};

pub const CONCAT_DELIMITER: &str = "|";

/// First present value among an ordered list of keys, with an optional fallback
#[derive(Debug)]
pub struct LookupExtractor {
    id: String,
    keys: Vec<FeatureKey>,
    fallback: Option<Box<dyn FeatureExtractor>>,
}

impl LookupExtractor {
    pub fn new(id: impl Into<String>, keys: Vec<FeatureKey>) -> Self {
        Self {
            id: id.into(),
            keys,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn FeatureExtractor>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn lookup<'a>(&self, instance: &'a Instance) -> Option<&'a FeatureValue> {
        self.keys.iter().find_map(|key| instance.get(key))
    }
}

impl FeatureExtractor for LookupExtractor {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, instance: &Instance) -> Option<String> {
        match self.lookup(instance) {
            Some(value) => value.as_text(),
            None => self.fallback.as_ref().and_then(|f| f.extract(instance)),
        }
    }

    fn extract_all(&self, instance: &Instance) -> Vec<String> {
        match self.lookup(instance) {
            Some(value) => value.as_list(),
            None => self
                .fallback
                .as_ref()
                .map(|f| f.extract_all(instance))
                .unwrap_or_default(),
        }
    }
}

/// Joins component outputs with `|`; absent if any component is absent
#[derive(Debug)]
pub struct ConcatExtractor {
    id: String,
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl ConcatExtractor {
    pub fn new(extractors: Vec<Box<dyn FeatureExtractor>>) -> Self {
        let id = extractors
            .iter()
            .map(|e| e.id())
            .collect::<Vec<_>>()
            .join(".");
        Self { id, extractors }
    }
}

impl FeatureExtractor for ConcatExtractor {
    fn id(&self) -> &str {
        &self.id
    }

    fn extract(&self, instance: &Instance) -> Option<String> {
        let parts = self
            .extractors
            .iter()
            .map(|e| e.extract(instance))
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join(CONCAT_DELIMITER))
    }
}

/// The instance's own text
#[derive(Debug, Clone, Default)]
pub struct IdentityExtractor;

impl FeatureExtractor for IdentityExtractor {
    fn id(&self) -> &str {
        "identity"
    }

    fn extract(&self, instance: &Instance) -> Option<String> {
        Some(instance.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Instance {
        Instance::new(4)
            .with(FeatureKey::Text, "Banks")
            .with(FeatureKey::Pos, "NN")
            .with(FeatureKey::Dep, "nsubj")
    }

    #[test]
    fn test_concat_joins_with_pipe() {
        let extractor = ConcatExtractor::new(vec![
            Box::new(LookupExtractor::new("pos", vec![FeatureKey::Pos])),
            Box::new(LookupExtractor::new("dep", vec![FeatureKey::Dep])),
        ]);
        assert_eq!(extractor.id(), "pos.dep");
        assert_eq!(extractor.extract(&token()).as_deref(), Some("NN|nsubj"));
    }

    #[test]
    fn test_concat_absent_when_component_missing() {
        let extractor = ConcatExtractor::new(vec![
            Box::new(LookupExtractor::new("pos", vec![FeatureKey::Pos])),
            Box::new(LookupExtractor::new("lemma", vec![FeatureKey::Lemma])),
        ]);
        assert_eq!(extractor.extract(&token()), None);
    }

    #[test]
    fn test_lookup_order_and_fallback() {
        let lemma_or_text = LookupExtractor::new("lemma", vec![FeatureKey::Lemma, FeatureKey::Text]);
        assert_eq!(lemma_or_text.extract(&token()).as_deref(), Some("Banks"));

        let sense = LookupExtractor::new("sense", vec![FeatureKey::Sense])
            .with_fallback(Box::new(IdentityExtractor));
        assert_eq!(sense.extract(&token()).as_deref(), Some("Banks"));

        let missing = LookupExtractor::new("sense", vec![FeatureKey::Sense]);
        assert_eq!(missing.extract(&token()), None);
        assert!(missing.extract_all(&token()).is_empty());
    }

    #[test]
    fn test_lookup_lists() {
        let instance = Instance::new(0).with(
            FeatureKey::Custom("hypernyms".to_string()),
            vec!["institution".to_string(), "organization".to_string()],
        );
        let extractor = LookupExtractor::new("hyp", vec![FeatureKey::Custom("hypernyms".to_string())]);
        assert_eq!(extractor.extract(&instance).as_deref(), Some("institution"));
        assert_eq!(extractor.extract_all(&instance).len(), 2);
    }
}
