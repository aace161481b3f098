//! Serializable description of a feature pipeline.
//!
//! Every runnable feature function is built from one of these tagged records, which is
//! also what a saved model stores. Decoding is an exhaustive `match`, so an unknown
//! `type` tag is a deserialization error rather than a silently skipped entry.

use super::context::{
    ChildrenContextFactory, NestedContextFactory, OffsetContextFactory, RootPathContextFactory,
};
use super::extractors::{ConcatExtractor, IdentityExtractor, LookupExtractor};
use super::features::{AggregateFunction, BiasFunction, MultiValuedFunction, SingleValuedFunction};
use super::traits::{ContextFactory, FeatureExtractor, FeatureFunction};
use crate::error::{Result, SensevolveError};
use crate::types::FeatureKey;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextSpec {
    Offsets {
        key: String,
        offsets: Vec<i32>,
        #[serde(default)]
        concatenate: bool,
    },
    Children {
        key: String,
        #[serde(default)]
        include: BTreeSet<String>,
        #[serde(default)]
        exclude: BTreeSet<String>,
    },
    RootPath {
        key: String,
        #[serde(default = "unbounded")]
        max_length: i32,
    },
    Nested {
        outer: Box<ContextSpec>,
        inner: Box<ContextSpec>,
    },
}

fn unbounded() -> i32 {
    -1
}

impl ContextSpec {
    /// Identifier prefix of the contexts this spec produces
    pub fn key(&self) -> String {
        match self {
            ContextSpec::Offsets { key, .. }
            | ContextSpec::Children { key, .. }
            | ContextSpec::RootPath { key, .. } => key.clone(),
            ContextSpec::Nested { outer, inner } => format!("{}>{}", outer.key(), inner.key()),
        }
    }

    /// Whether a single context of this shape can hold more than one token
    pub fn spans_tokens(&self) -> bool {
        match self {
            ContextSpec::Offsets { offsets, concatenate, .. } => *concatenate && offsets.len() > 1,
            ContextSpec::Children { .. } => false,
            ContextSpec::RootPath { max_length, .. } => *max_length != 1,
            ContextSpec::Nested { inner, .. } => inner.spans_tokens(),
        }
    }

    pub fn build(&self) -> Result<Box<dyn ContextFactory>> {
        Ok(match self {
            ContextSpec::Offsets { key, offsets, concatenate } => {
                if offsets.is_empty() {
                    return Err(SensevolveError::InvalidPipeline(format!(
                        "offset context '{}' has no offsets",
                        key
                    )));
                }
                Box::new(OffsetContextFactory::new(key.clone(), offsets.clone(), *concatenate))
            }
            ContextSpec::Children { key, include, exclude } => Box::new(ChildrenContextFactory::new(
                key.clone(),
                include.clone(),
                exclude.clone(),
            )),
            ContextSpec::RootPath { key, max_length } => {
                if *max_length == 0 || *max_length < -1 {
                    return Err(SensevolveError::InvalidPipeline(format!(
                        "root path '{}' needs max_length -1 or >= 1, got {}",
                        key, max_length
                    )));
                }
                Box::new(RootPathContextFactory::new(key.clone(), *max_length))
            }
            ContextSpec::Nested { outer, inner } => {
                Box::new(NestedContextFactory::new(outer.build()?, inner.build()?))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractorSpec {
    Lookup {
        /// Defaults to the first key's name
        #[serde(default)]
        id: Option<String>,
        keys: Vec<FeatureKey>,
        #[serde(default)]
        fallback: Option<Box<ExtractorSpec>>,
    },
    Concat {
        extractors: Vec<ExtractorSpec>,
    },
    Identity,
}

impl ExtractorSpec {
    pub fn lookup(key: FeatureKey) -> Self {
        ExtractorSpec::Lookup {
            id: None,
            keys: vec![key],
            fallback: None,
        }
    }

    pub fn build(&self) -> Result<Box<dyn FeatureExtractor>> {
        Ok(match self {
            ExtractorSpec::Lookup { id, keys, fallback } => {
                let first = keys.first().ok_or_else(|| {
                    SensevolveError::InvalidPipeline("lookup extractor without keys".to_string())
                })?;
                let id = id.clone().unwrap_or_else(|| first.to_string());
                let mut extractor = LookupExtractor::new(id, keys.clone());
                if let Some(fallback) = fallback {
                    extractor = extractor.with_fallback(fallback.build()?);
                }
                Box::new(extractor)
            }
            ExtractorSpec::Concat { extractors } => {
                if extractors.is_empty() {
                    return Err(SensevolveError::InvalidPipeline(
                        "concatenating extractor without components".to_string(),
                    ));
                }
                let components = extractors
                    .iter()
                    .map(ExtractorSpec::build)
                    .collect::<Result<Vec<_>>>()?;
                Box::new(ConcatExtractor::new(components))
            }
            ExtractorSpec::Identity => Box::new(IdentityExtractor),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureSpec {
    Bias,
    Single {
        context: ContextSpec,
        extractors: Vec<ExtractorSpec>,
    },
    Multi {
        context: ContextSpec,
        extractors: Vec<ExtractorSpec>,
    },
}

impl FeatureSpec {
    fn context(&self) -> Option<&ContextSpec> {
        match self {
            FeatureSpec::Bias => None,
            FeatureSpec::Single { context, .. } | FeatureSpec::Multi { context, .. } => Some(context),
        }
    }

    pub fn build(&self) -> Result<Box<dyn FeatureFunction>> {
        let build_extractors = |specs: &[ExtractorSpec]| -> Result<Vec<Box<dyn FeatureExtractor>>> {
            if specs.is_empty() {
                return Err(SensevolveError::InvalidPipeline(
                    "feature function without extractors".to_string(),
                ));
            }
            specs.iter().map(ExtractorSpec::build).collect()
        };

        Ok(match self {
            FeatureSpec::Bias => Box::new(BiasFunction),
            FeatureSpec::Single { context, extractors } => Box::new(SingleValuedFunction::new(
                context.build()?,
                build_extractors(extractors)?,
            )),
            FeatureSpec::Multi { context, extractors } => {
                if context.spans_tokens() {
                    log::warn!(
                        "Multi-valued feature over context '{}' can span several tokens; their values share one id",
                        context.key()
                    );
                }
                Box::new(MultiValuedFunction::new(context.build()?, build_extractors(extractors)?))
            }
        })
    }
}

/// Ordered list of feature functions making up one pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub features: Vec<FeatureSpec>,
}

impl PipelineConfig {
    pub fn new(features: Vec<FeatureSpec>) -> Self {
        Self { features }
    }

    /// Build the aggregate emitter. Two different contexts sharing an identifier
    /// prefix would produce colliding feature ids and are rejected.
    pub fn build(&self) -> Result<AggregateFunction> {
        let mut seen: HashMap<String, &ContextSpec> = HashMap::new();
        for context in self.features.iter().filter_map(FeatureSpec::context) {
            match seen.entry(context.key()) {
                Entry::Occupied(entry) if *entry.get() != context => {
                    return Err(SensevolveError::InvalidPipeline(format!(
                        "context key '{}' is used by two different configurations",
                        entry.key()
                    )));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(entry) => {
                    entry.insert(context);
                }
            }
        }

        let functions = self
            .features
            .iter()
            .map(FeatureSpec::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(AggregateFunction::new(functions))
    }
}
