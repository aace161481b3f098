use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Well-known annotation keys carried by tokens and focus instances
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Text,
    Lemma,
    Pos,
    Dep,
    Sense,
    Label,
    Custom(String),
}

impl FeatureKey {
    pub fn name(&self) -> &str {
        match self {
            FeatureKey::Text => "text",
            FeatureKey::Lemma => "lemma",
            FeatureKey::Pos => "pos",
            FeatureKey::Dep => "dep",
            FeatureKey::Sense => "sense",
            FeatureKey::Label => "label",
            FeatureKey::Custom(name) => name,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for FeatureKey {
    fn from(name: &str) -> Self {
        match name {
            "text" => FeatureKey::Text,
            "lemma" => FeatureKey::Lemma,
            "pos" => FeatureKey::Pos,
            "dep" => FeatureKey::Dep,
            "sense" => FeatureKey::Sense,
            "label" => FeatureKey::Label,
            other => FeatureKey::Custom(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Text(String),
    List(Vec<String>),
    Number(f64),
}

impl FeatureValue {
    /// Single textual rendering; lists render their first element
    pub fn as_text(&self) -> Option<String> {
        match self {
            FeatureValue::Text(s) => Some(s.clone()),
            FeatureValue::List(items) => items.first().cloned(),
            FeatureValue::Number(n) => Some(n.to_string()),
        }
    }

    pub fn as_list(&self) -> Vec<String> {
        match self {
            FeatureValue::List(items) => items.clone(),
            other => other.as_text().into_iter().collect(),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<Vec<String>> for FeatureValue {
    fn from(values: Vec<String>) -> Self {
        FeatureValue::List(values)
    }
}

pub type FeatureBag = BTreeMap<FeatureKey, FeatureValue>;

/// One categorical feature occurrence emitted for one instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringFeature {
    pub id: String,
    pub value: String,
}

impl StringFeature {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Vocabulary term for this occurrence
    pub fn term(&self) -> String {
        format!("{}={}", self.id, self.value)
    }
}
