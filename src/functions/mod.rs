pub mod context;
pub mod extractors;
pub mod features;
pub mod registry;
pub mod spec;
pub mod traits;

pub use context::{
    ChildrenContextFactory, NestedContextFactory, OffsetContextFactory, RootPathContextFactory,
};
pub use extractors::{ConcatExtractor, IdentityExtractor, LookupExtractor};
pub use features::{AggregateFunction, BiasFunction, MultiValuedFunction, SingleValuedFunction};
pub use registry::{FeatureCandidate, HyperparameterCandidate, SearchSpace};
pub use spec::{ContextSpec, ExtractorSpec, FeatureSpec, PipelineConfig};
pub use traits::{ContextFactory, FeatureExtractor, FeatureFunction, NlpContext};
