use super::traits::{ContextFactory, FeatureExtractor, FeatureFunction};
use crate::data::Focus;
use crate::types::StringFeature;

pub const VALUE_DELIMITER: &str = "__";
pub const ID_DELIMITER: &str = "::";
pub const BIAS_ID: &str = "bias";

/// Constant intercept feature
#[derive(Debug, Clone, Default)]
pub struct BiasFunction;

impl FeatureFunction for BiasFunction {
    fn apply(&self, _focus: &Focus) -> Vec<StringFeature> {
        vec![StringFeature::new(BIAS_ID, "1")]
    }
}

/// One feature per (context, extractor), token values joined by `__`
#[derive(Debug)]
pub struct SingleValuedFunction {
    context: Box<dyn ContextFactory>,
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl SingleValuedFunction {
    pub fn new(context: Box<dyn ContextFactory>, extractors: Vec<Box<dyn FeatureExtractor>>) -> Self {
        Self { context, extractors }
    }
}

impl FeatureFunction for SingleValuedFunction {
    fn apply(&self, focus: &Focus) -> Vec<StringFeature> {
        let mut features = Vec::new();
        for context in self.context.apply_focus(focus) {
            for extractor in &self.extractors {
                let values: Vec<String> = context
                    .instances(focus.sequence())
                    .filter_map(|token| extractor.extract(token))
                    .collect();
                if values.is_empty() {
                    continue;
                }
                features.push(StringFeature::new(
                    format!("{}{}{}", context.identifier, ID_DELIMITER, extractor.id()),
                    values.join(VALUE_DELIMITER),
                ));
            }
        }
        features
    }
}

/// One feature per extracted list element, all sharing the (context, extractor) id
///
/// Meant for single-token contexts. Over a wider context the values of every token
/// are emitted under the same id.
#[derive(Debug)]
pub struct MultiValuedFunction {
    context: Box<dyn ContextFactory>,
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl MultiValuedFunction {
    pub fn new(context: Box<dyn ContextFactory>, extractors: Vec<Box<dyn FeatureExtractor>>) -> Self {
        Self { context, extractors }
    }
}

impl FeatureFunction for MultiValuedFunction {
    fn apply(&self, focus: &Focus) -> Vec<StringFeature> {
        let mut features = Vec::new();
        for context in self.context.apply_focus(focus) {
            for extractor in &self.extractors {
                let id = format!("{}{}{}", context.identifier, ID_DELIMITER, extractor.id());
                for token in context.instances(focus.sequence()) {
                    features.extend(
                        extractor
                            .extract_all(token)
                            .into_iter()
                            .map(|value| StringFeature::new(id.clone(), value)),
                    );
                }
            }
        }
        features
    }
}

/// Top-level emitter: runs every sub-function in order and flattens the results
#[derive(Debug, Default)]
pub struct AggregateFunction {
    functions: Vec<Box<dyn FeatureFunction>>,
}

impl AggregateFunction {
    pub fn new(functions: Vec<Box<dyn FeatureFunction>>) -> Self {
        Self { functions }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FeatureFunction for AggregateFunction {
    fn apply(&self, focus: &Focus) -> Vec<StringFeature> {
        self.functions.iter().flat_map(|f| f.apply(focus)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Instance, Sequence};
    use crate::functions::context::OffsetContextFactory;
    use crate::functions::extractors::{IdentityExtractor, LookupExtractor};
    use crate::types::FeatureKey;
    use std::sync::Arc;

    fn focus() -> Focus {
        let tokens = [("the", "DT"), ("river", "NN"), ("bank", "NN"), ("flooded", "VBD")]
            .iter()
            .map(|(w, p)| {
                Instance::default()
                    .with(FeatureKey::Text, *w)
                    .with(FeatureKey::Pos, *p)
            })
            .collect();
        Focus::new(Arc::new(Sequence::from_instances(0, tokens)), 2).unwrap()
    }

    #[test]
    fn test_single_valued_joins_context_tokens() {
        let function = SingleValuedFunction::new(
            Box::new(OffsetContextFactory::new("W", vec![-1, 0], true)),
            vec![
                Box::new(IdentityExtractor),
                Box::new(LookupExtractor::new("pos", vec![FeatureKey::Pos])),
            ],
        );
        let features = function.apply(&focus());
        assert_eq!(
            features,
            vec![
                StringFeature::new("W[-1,0]::identity", "river__bank"),
                StringFeature::new("W[-1,0]::pos", "NN__NN"),
            ]
        );
    }

    #[test]
    fn test_missing_values_are_omitted() {
        let function = SingleValuedFunction::new(
            Box::new(OffsetContextFactory::new("W", vec![1], false)),
            vec![Box::new(LookupExtractor::new("lemma", vec![FeatureKey::Lemma]))],
        );
        assert!(function.apply(&focus()).is_empty());
    }

    fn hypernym_focus() -> Focus {
        let hypernyms = |items: &[&str]| -> Vec<String> { items.iter().map(|h| h.to_string()).collect() };
        let tokens = vec![
            Instance::default()
                .with(FeatureKey::Text, "river")
                .with(FeatureKey::Custom("hypernyms".to_string()), hypernyms(&["stream", "body_of_water"])),
            Instance::default()
                .with(FeatureKey::Text, "bank")
                .with(FeatureKey::Custom("hypernyms".to_string()), hypernyms(&["slope", "incline", "geological_formation"])),
        ];
        Focus::new(Arc::new(Sequence::from_instances(0, tokens)), 1).unwrap()
    }

    fn hypernyms() -> Box<dyn FeatureExtractor> {
        Box::new(LookupExtractor::new("hyp", vec![FeatureKey::Custom("hypernyms".to_string())]))
    }

    #[test]
    fn test_multi_valued_emits_one_feature_per_element() {
        let function = MultiValuedFunction::new(
            Box::new(OffsetContextFactory::new("W", vec![0], false)),
            vec![hypernyms()],
        );
        let features = function.apply(&hypernym_focus());

        assert_eq!(
            features,
            vec![
                StringFeature::new("W[0]::hyp", "slope"),
                StringFeature::new("W[0]::hyp", "incline"),
                StringFeature::new("W[0]::hyp", "geological_formation"),
            ]
        );
    }

    #[test]
    fn test_multi_valued_over_two_tokens_shares_one_id() {
        let function = MultiValuedFunction::new(
            Box::new(OffsetContextFactory::new("W", vec![-1, 0], true)),
            vec![hypernyms()],
        );
        let features = function.apply(&hypernym_focus());

        assert_eq!(features.len(), 5);
        assert!(features.iter().all(|f| f.id == "W[-1,0]::hyp"));
        assert_eq!(features[0].value, "stream");
        assert_eq!(features[4].value, "geological_formation");
    }

    #[test]
    fn test_aggregate_flattens_in_order() {
        let aggregate = AggregateFunction::new(vec![
            Box::new(BiasFunction),
            Box::new(SingleValuedFunction::new(
                Box::new(OffsetContextFactory::new("W", vec![0], false)),
                vec![Box::new(IdentityExtractor)],
            )),
        ]);
        let features = aggregate.apply(&focus());
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, BIAS_ID);
        assert_eq!(features[1], StringFeature::new("W[0]::identity", "bank"));
    }
}
