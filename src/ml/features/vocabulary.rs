use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index returned by a frozen vocabulary for terms it has never seen
pub const DEFAULT_INDEX: usize = 0;

/// Growable term -> index mapping used while training
#[derive(Debug, Clone, Default)]
pub struct VocabularyBuilder {
    indices: HashMap<String, usize>,
    terms: Vec<String>,
    counts: Vec<u64>,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `term`, assigning the next free one on first sight
    pub fn index_of(&mut self, term: &str) -> usize {
        let index = match self.indices.get(term) {
            Some(&index) => index,
            None => {
                let index = self.terms.len();
                self.indices.insert(term.to_string(), index);
                self.terms.push(term.to_string());
                self.counts.push(0);
                index
            }
        };
        self.counts[index] += 1;
        index
    }

    pub fn count(&self, term: &str) -> u64 {
        self.indices
            .get(term)
            .map(|&i| self.counts[i])
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Snapshot into an immutable vocabulary
    pub fn build(&self) -> Vocabulary {
        Vocabulary {
            indices: self.indices.clone(),
            terms: self.terms.clone(),
        }
    }
}

/// Frozen term <-> index mapping. Persisted as the ordered term list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    indices: HashMap<String, usize>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Index of `term`, or `DEFAULT_INDEX` when unseen
    pub fn index(&self, term: &str) -> usize {
        self.get(term).unwrap_or(DEFAULT_INDEX)
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.indices.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        let mut builder = VocabularyBuilder::new();
        for term in &terms {
            builder.index_of(term);
        }
        builder.build()
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense_and_stable() {
        let mut builder = VocabularyBuilder::new();
        let words = ["bank", "river", "bank", "money", "river", "bank"];
        let indices: Vec<usize> = words.iter().map(|w| builder.index_of(w)).collect();

        assert_eq!(indices, vec![0, 1, 0, 2, 1, 0]);
        assert_eq!(builder.len(), 3);
        assert_eq!(builder.count("bank"), 3);
        assert_eq!(builder.count("shore"), 0);

        let vocabulary = builder.build();
        let mut seen: Vec<usize> = vocabulary.terms().iter().map(|t| vocabulary.index(t)).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..3).collect::<Vec<_>>());
    }

    #[test]
    fn test_frozen_vocabulary_does_not_grow() {
        let mut builder = VocabularyBuilder::new();
        builder.index_of("<unk>");
        builder.index_of("bank");
        let vocabulary = builder.build();

        assert_eq!(vocabulary.index("bank"), 1);
        assert_eq!(vocabulary.index("shore"), DEFAULT_INDEX);
        assert_eq!(vocabulary.get("shore"), None);
        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn test_serializes_as_term_list() {
        let vocabulary = Vocabulary::from(vec!["a".to_string(), "b".to_string()]);
        let json = serde_json::to_string(&vocabulary).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let decoded: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.index("b"), 1);
        assert_eq!(decoded, vocabulary);
    }
}
