use super::spec::{ContextSpec, ExtractorSpec, FeatureSpec};
use crate::error::{Result, SensevolveError};
use crate::types::FeatureKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A feature function the search may switch on, with its alternative parameterizations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCandidate {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub options: Vec<FeatureSpec>,
}

/// A classifier setting the search may tune, as string values to assign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterCandidate {
    pub key: String,
    pub values: Vec<String>,
}

/// Everything the architecture search is allowed to choose from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub features: Vec<FeatureCandidate>,
    #[serde(default)]
    pub hyperparameters: Vec<HyperparameterCandidate>,
}

impl SearchSpace {
    pub fn new(features: Vec<FeatureCandidate>, hyperparameters: Vec<HyperparameterCandidate>) -> Self {
        Self {
            features,
            hyperparameters,
        }
    }

    pub fn get_feature(&self, name: &str) -> Option<&FeatureCandidate> {
        self.features.iter().find(|c| c.name == name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(SensevolveError::Configuration(
                "search space has no feature candidates".to_string(),
            ));
        }
        let mut names = BTreeSet::new();
        for candidate in &self.features {
            if !names.insert(candidate.name.as_str()) {
                return Err(SensevolveError::Configuration(format!(
                    "duplicate feature candidate '{}'",
                    candidate.name
                )));
            }
            if candidate.options.is_empty() {
                return Err(SensevolveError::Configuration(format!(
                    "feature candidate '{}' has no options",
                    candidate.name
                )));
            }
            for option in &candidate.options {
                option.build()?;
            }
        }
        for hyperparameter in &self.hyperparameters {
            if hyperparameter.values.is_empty() {
                return Err(SensevolveError::Configuration(format!(
                    "hyperparameter '{}' has no values",
                    hyperparameter.key
                )));
            }
        }
        Ok(())
    }
}

fn window(key: &str, offsets: &[&[i32]], concatenate: bool, extractor: ExtractorSpec) -> Vec<FeatureSpec> {
    offsets
        .iter()
        .map(|o| FeatureSpec::Single {
            context: ContextSpec::Offsets {
                key: key.to_string(),
                offsets: o.to_vec(),
                concatenate,
            },
            extractors: vec![extractor.clone()],
        })
        .collect()
}

fn candidate(name: &str, options: Vec<FeatureSpec>) -> FeatureCandidate {
    FeatureCandidate {
        name: name.to_string(),
        required: false,
        options,
    }
}

fn relations(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SearchSpace {
    /// Word-sense disambiguation catalogue over text, lemma, POS and dependency annotations
    fn default() -> Self {
        let lemma_or_text = ExtractorSpec::Lookup {
            id: Some("lemma".to_string()),
            keys: vec![FeatureKey::Lemma, FeatureKey::Text],
            fallback: None,
        };
        let pos = ExtractorSpec::lookup(FeatureKey::Pos);
        let dep_lemma = ExtractorSpec::Concat {
            extractors: vec![ExtractorSpec::lookup(FeatureKey::Dep), lemma_or_text.clone()],
        };

        let features = vec![
            FeatureCandidate {
                name: "focus_lemma".to_string(),
                required: true,
                options: window("FOCUS", &[&[0]], false, lemma_or_text.clone()),
            },
            candidate(
                "lemma_window",
                window("LW", &[&[-1, 1], &[-2, -1, 1, 2], &[-3, -2, -1, 1, 2, 3]], false, lemma_or_text.clone()),
            ),
            candidate(
                "lemma_bigrams",
                window("LB", &[&[-1, 0], &[0, 1], &[-1, 0, 1]], true, lemma_or_text.clone()),
            ),
            candidate(
                "pos_window",
                window("PW", &[&[-1, 1], &[-2, -1, 1, 2]], false, pos.clone()),
            ),
            candidate(
                "pos_ngram",
                window("PN", &[&[-1, 0, 1], &[-2, -1, 0, 1, 2]], true, pos.clone()),
            ),
            candidate(
                "children",
                vec![
                    FeatureSpec::Single {
                        context: ContextSpec::Children {
                            key: "DEP".to_string(),
                            include: BTreeSet::new(),
                            exclude: relations(&["punct", "det"]),
                        },
                        extractors: vec![dep_lemma.clone()],
                    },
                    FeatureSpec::Single {
                        context: ContextSpec::Children {
                            key: "ARG".to_string(),
                            include: relations(&["nsubj", "dobj", "obj", "nmod", "amod", "compound"]),
                            exclude: BTreeSet::new(),
                        },
                        extractors: vec![dep_lemma.clone()],
                    },
                ],
            ),
            candidate(
                "root_path",
                [2, 3, -1]
                    .iter()
                    .map(|&max_length| FeatureSpec::Single {
                        context: ContextSpec::RootPath {
                            key: format!("PATH{}", max_length),
                            max_length,
                        },
                        extractors: vec![ExtractorSpec::lookup(FeatureKey::Dep)],
                    })
                    .collect(),
            ),
            candidate(
                "neighbour_children",
                [&[1][..], &[-1, 1][..]]
                    .iter()
                    .map(|offsets| FeatureSpec::Single {
                        context: ContextSpec::Nested {
                            outer: Box::new(ContextSpec::Offsets {
                                key: "N".to_string(),
                                offsets: offsets.to_vec(),
                                concatenate: false,
                            }),
                            inner: Box::new(ContextSpec::Children {
                                key: "C".to_string(),
                                include: BTreeSet::new(),
                                exclude: relations(&["punct"]),
                            }),
                        },
                        extractors: vec![dep_lemma.clone()],
                    })
                    .collect(),
            ),
        ];

        let hyperparameters = vec![
            HyperparameterCandidate {
                key: "epochs".to_string(),
                values: ["3", "5", "10"].iter().map(|s| s.to_string()).collect(),
            },
            HyperparameterCandidate {
                key: "averaged".to_string(),
                values: vec!["true".to_string(), "false".to_string()],
            },
        ];

        Self::new(features, hyperparameters)
    }
}
