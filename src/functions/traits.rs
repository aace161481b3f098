use crate::data::{Focus, Instance, Sequence};
use crate::types::StringFeature;
use std::fmt::Debug;

/// Named, ordered sub-list of token positions drawn from one sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NlpContext {
    pub identifier: String,
    pub tokens: Vec<usize>,
}

impl NlpContext {
    pub fn new(identifier: impl Into<String>, tokens: Vec<usize>) -> Self {
        Self {
            identifier: identifier.into(),
            tokens,
        }
    }

    /// Resolve positions against the sequence they were extracted from
    pub fn instances<'a>(&'a self, sequence: &'a Sequence) -> impl Iterator<Item = &'a Instance> + 'a {
        self.tokens.iter().filter_map(move |&i| sequence.get(i))
    }
}

/// Strategy turning a focus position into zero or more contexts
pub trait ContextFactory: Send + Sync + Debug {
    /// Identifier prefix; distinct configurations must produce distinct identifiers
    fn key(&self) -> &str;

    /// Contexts for the token at `focus`, in a deterministic order
    fn apply(&self, sequence: &Sequence, focus: usize) -> Vec<NlpContext>;

    fn apply_focus(&self, focus: &Focus) -> Vec<NlpContext> {
        self.apply(focus.sequence(), focus.index())
    }
}

/// Reads a categorical value from a single token
pub trait FeatureExtractor: Send + Sync + Debug {
    fn id(&self) -> &str;

    /// Single value, `None` when the token lacks it
    fn extract(&self, instance: &Instance) -> Option<String>;

    /// All values; single-valued extractors yield at most one
    fn extract_all(&self, instance: &Instance) -> Vec<String> {
        self.extract(instance).into_iter().collect()
    }
}

/// Produces categorical features for a focus instance
pub trait FeatureFunction: Send + Sync + Debug {
    fn apply(&self, focus: &Focus) -> Vec<StringFeature>;
}
