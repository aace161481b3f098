use super::instance::Instance;
use super::sequence::Sequence;
use crate::error::Result;
use crate::types::FeatureKey;

/// Raw text segmentation and tokenization
pub trait Tokenizer {
    fn segment(&self, text: &str) -> Vec<String>;
    fn tokenize(&self, sentence: &str) -> Vec<Instance>;
}

/// Turns tokens into a dependency tree; implemented by external parsers
pub trait DependencyParser {
    fn parse(&self, tokens: Vec<Instance>) -> Result<Sequence>;
}

/// Splits sentences after `.`, `!` and `?`, tokens on whitespace
#[derive(Debug, Clone, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            current.push(ch);
            if matches!(ch, '.' | '!' | '?') {
                let sentence = current.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                current.clear();
            }
        }
        let rest = current.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }

    fn tokenize(&self, sentence: &str) -> Vec<Instance> {
        sentence
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| Instance::new(i).with(FeatureKey::Text, word))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_and_tokenize() {
        let tokenizer = WhitespaceTokenizer;
        let sentences = tokenizer.segment("He sat by the bank. Was it open? yes");
        assert_eq!(sentences, vec!["He sat by the bank.", "Was it open?", "yes"]);

        let tokens = tokenizer.tokenize(&sentences[0]);
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[3].text(), "the");
        assert_eq!(tokens[4].index, 4);
    }
}
