use crate::data::Focus;
use crate::error::{Result, SensevolveError};
use crate::ml::features::{SparseInstance, SparseVector};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;

/// Named, string-valued setting that outer tooling can enumerate and assign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameter {
    pub name: String,
    pub key: String,
    pub description: String,
    pub default_value: String,
}

impl Hyperparameter {
    pub fn new(name: &str, key: &str, description: &str, default_value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            description: description.to_string(),
            default_value: default_value.to_string(),
        }
    }
}

/// Parse a hyperparameter value, reporting the offending key on failure
pub fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| SensevolveError::Hyperparameter {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Token-level classifier
///
/// `classify` returns exactly one label; `score` is non-empty once trained. Loading is
/// an associated constructor on each concrete type since it produces `Self`.
pub trait Classifier: Send {
    fn classify(&self, instance: &Focus) -> Result<String>;

    fn score(&self, instance: &Focus) -> Result<BTreeMap<String, f64>>;

    fn train(&mut self, train: &[Focus], valid: &[Focus]) -> Result<()>;

    fn hyperparameters(&self) -> Vec<Hyperparameter>;

    fn set_hyperparameter(&mut self, key: &str, value: &str) -> Result<()>;

    fn save(&self, sink: &mut dyn Write) -> Result<()>;
}

/// Numeric solver over vectorized instances
pub trait SparseModel: Clone + Default + Send + Sync + Serialize + DeserializeOwned {
    fn hyperparameters(&self) -> Vec<Hyperparameter>;

    fn set_hyperparameter(&mut self, key: &str, value: &str) -> Result<()>;

    /// Fit from scratch; any previous weights are discarded
    fn fit(&mut self, data: &[SparseInstance], num_features: usize, num_labels: usize) -> Result<()>;

    /// One score per label index; empty before `fit`
    fn scores(&self, vector: &SparseVector) -> Vec<f64>;
}
