pub mod pipeline;
pub mod sparse;
pub mod vocabulary;

pub use pipeline::{FeaturePipeline, UNKNOWN_FEATURE};
pub use sparse::{SparseInstance, SparseVector};
pub use vocabulary::{Vocabulary, VocabularyBuilder, DEFAULT_INDEX};
