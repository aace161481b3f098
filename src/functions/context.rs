use super::traits::{ContextFactory, NlpContext};
use crate::data::Sequence;
use crate::types::{FeatureKey, FeatureValue};
use std::collections::BTreeSet;

/// Tokens at fixed offsets from the focus
#[derive(Debug, Clone)]
pub struct OffsetContextFactory {
    key: String,
    offsets: Vec<i32>,
    concatenate: bool,
}

impl OffsetContextFactory {
    pub fn new(key: impl Into<String>, offsets: Vec<i32>, concatenate: bool) -> Self {
        Self {
            key: key.into(),
            offsets,
            concatenate,
        }
    }

    fn resolve(&self, sequence: &Sequence, focus: usize, offset: i32) -> Option<usize> {
        let position = focus as i64 + offset as i64;
        if position >= 0 && (position as usize) < sequence.size() {
            Some(position as usize)
        } else {
            None
        }
    }
}

impl ContextFactory for OffsetContextFactory {
    fn key(&self) -> &str {
        &self.key
    }

    fn apply(&self, sequence: &Sequence, focus: usize) -> Vec<NlpContext> {
        if self.concatenate {
            let offsets: Vec<String> = self.offsets.iter().map(|o| o.to_string()).collect();
            let tokens = self
                .offsets
                .iter()
                .filter_map(|&o| self.resolve(sequence, focus, o))
                .collect();
            return vec![NlpContext::new(
                format!("{}[{}]", self.key, offsets.join(",")),
                tokens,
            )];
        }

        self.offsets
            .iter()
            .filter_map(|&o| {
                self.resolve(sequence, focus, o)
                    .map(|position| NlpContext::new(format!("{}[{}]", self.key, o), vec![position]))
            })
            .collect()
    }
}

/// Syntactic children of the focus, filtered by dependency relation
#[derive(Debug, Clone)]
pub struct ChildrenContextFactory {
    key: String,
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl ChildrenContextFactory {
    pub fn new(key: impl Into<String>, include: BTreeSet<String>, exclude: BTreeSet<String>) -> Self {
        Self {
            key: key.into(),
            include,
            exclude,
        }
    }

    fn admits(&self, relation: Option<&str>) -> bool {
        match relation {
            Some(rel) if self.exclude.contains(rel) => false,
            Some(rel) => self.include.is_empty() || self.include.contains(rel),
            None => self.include.is_empty(),
        }
    }
}

impl ContextFactory for ChildrenContextFactory {
    fn key(&self) -> &str {
        &self.key
    }

    fn apply(&self, sequence: &Sequence, focus: usize) -> Vec<NlpContext> {
        sequence
            .children(focus)
            .iter()
            .copied()
            .filter(|&child| {
                let relation = sequence
                    .get(child)
                    .and_then(|t| t.get(&FeatureKey::Dep))
                    .and_then(FeatureValue::as_text);
                self.admits(relation.as_deref())
            })
            .enumerate()
            .map(|(ordinal, child)| NlpContext::new(format!("{}[{}]", self.key, ordinal), vec![child]))
            .collect()
    }
}

/// Head chain from the focus up to the root
#[derive(Debug, Clone)]
pub struct RootPathContextFactory {
    key: String,
    max_length: i32,
}

impl RootPathContextFactory {
    /// `max_length` of -1 walks all the way to the root
    pub fn new(key: impl Into<String>, max_length: i32) -> Self {
        Self {
            key: key.into(),
            max_length,
        }
    }
}

impl ContextFactory for RootPathContextFactory {
    fn key(&self) -> &str {
        &self.key
    }

    fn apply(&self, sequence: &Sequence, focus: usize) -> Vec<NlpContext> {
        if focus >= sequence.size() {
            return Vec::new();
        }
        let bound = if self.max_length < 0 {
            sequence.size()
        } else {
            (self.max_length as usize).min(sequence.size())
        };

        let mut path = vec![focus];
        let mut current = focus;
        while path.len() < bound {
            match sequence.head(current) {
                Some(head) => {
                    path.push(head);
                    current = head;
                }
                None => break,
            }
        }
        vec![NlpContext::new(self.key.clone(), path)]
    }
}

/// Applies `inner` to every token of every context produced by `outer`
///
/// When an outer context spans several tokens, each token's position within it is
/// written into the identifier as `OUTER#k>INNER` so contexts reached through
/// different outer tokens never share an identifier.
#[derive(Debug)]
pub struct NestedContextFactory {
    key: String,
    outer: Box<dyn ContextFactory>,
    inner: Box<dyn ContextFactory>,
}

impl NestedContextFactory {
    pub fn new(outer: Box<dyn ContextFactory>, inner: Box<dyn ContextFactory>) -> Self {
        let key = format!("{}>{}", outer.key(), inner.key());
        Self { key, outer, inner }
    }
}

impl ContextFactory for NestedContextFactory {
    fn key(&self) -> &str {
        &self.key
    }

    fn apply(&self, sequence: &Sequence, focus: usize) -> Vec<NlpContext> {
        let mut contexts = Vec::new();
        for outer in self.outer.apply(sequence, focus) {
            let spans = outer.tokens.len() > 1;
            for (ordinal, &position) in outer.tokens.iter().enumerate() {
                let prefix = if spans {
                    format!("{}#{}", outer.identifier, ordinal)
                } else {
                    outer.identifier.clone()
                };
                for inner in self.inner.apply(sequence, position) {
                    contexts.push(NlpContext::new(format!("{}>{}", prefix, inner.identifier), inner.tokens));
                }
            }
        }
        contexts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Instance;

    fn chain(len: usize) -> Sequence {
        let mut seq = Sequence::from_instances(
            0,
            (0..len)
                .map(|i| Instance::default().with(FeatureKey::Text, format!("w{}", i)))
                .collect(),
        );
        for i in 0..len.saturating_sub(1) {
            seq.set_head(i, i + 1).unwrap();
        }
        seq
    }

    #[test]
    fn test_offsets_outside_sequence_are_skipped() {
        let seq = chain(3);
        let factory = OffsetContextFactory::new("W", vec![-2, -1, 1, 5], false);
        let contexts = factory.apply(&seq, 0);
        assert_eq!(contexts, vec![NlpContext::new("W[1]", vec![1])]);
    }

    #[test]
    fn test_root_path_bounded() {
        let seq = chain(5);
        let factory = RootPathContextFactory::new("PATH", 2);
        let contexts = factory.apply(&seq, 0);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].tokens, vec![0, 1]);
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let mut seq = chain(1);
        let verb = seq.push(Instance::default().with(FeatureKey::Text, "ran"));
        let subj = seq.push(
            Instance::default()
                .with(FeatureKey::Text, "dog")
                .with(FeatureKey::Dep, "nsubj"),
        );
        seq.set_head(subj, verb).unwrap();

        let include: BTreeSet<String> = ["nsubj".to_string()].into_iter().collect();
        let factory = ChildrenContextFactory::new("DEP", include.clone(), include);
        assert!(factory.apply(&seq, verb).is_empty());
    }

    #[test]
    fn test_nested_children_of_right_neighbour() {
        // 0 <- 1 -> 2 : token 1 heads both neighbours
        let mut seq = Sequence::from_instances(
            0,
            ["a", "b", "c"]
                .iter()
                .map(|w| Instance::default().with(FeatureKey::Text, *w))
                .collect(),
        );
        seq.set_head(0, 1).unwrap();
        seq.set_head(2, 1).unwrap();

        let factory = NestedContextFactory::new(
            Box::new(OffsetContextFactory::new("W", vec![1], false)),
            Box::new(ChildrenContextFactory::new("DEP", BTreeSet::new(), BTreeSet::new())),
        );
        let contexts = factory.apply(&seq, 0);

        assert_eq!(factory.key(), "W>DEP");
        assert_eq!(
            contexts,
            vec![
                NlpContext::new("W[1]>DEP[0]", vec![0]),
                NlpContext::new("W[1]>DEP[1]", vec![2]),
            ]
        );
    }

    fn distinct(contexts: &[NlpContext]) -> usize {
        contexts.iter().map(|c| c.identifier.as_str()).collect::<BTreeSet<_>>().len()
    }

    #[test]
    fn test_nested_over_concatenated_offsets_keeps_identifiers_distinct() {
        // 0 <- 1 -> 2 <- 3 -> 4 : tokens 1 and 3 each head their neighbours
        let mut seq = Sequence::from_instances(
            0,
            ["a", "b", "c", "d", "e"]
                .iter()
                .map(|w| Instance::default().with(FeatureKey::Text, *w))
                .collect(),
        );
        seq.set_head(0, 1).unwrap();
        seq.set_head(2, 1).unwrap();
        seq.set_head(4, 3).unwrap();
        seq.set_head(1, 3).unwrap();

        let factory = NestedContextFactory::new(
            Box::new(OffsetContextFactory::new("W", vec![-1, 1], true)),
            Box::new(ChildrenContextFactory::new("C", BTreeSet::new(), BTreeSet::new())),
        );
        let contexts = factory.apply(&seq, 2);

        assert_eq!(
            contexts,
            vec![
                NlpContext::new("W[-1,1]#0>C[0]", vec![0]),
                NlpContext::new("W[-1,1]#0>C[1]", vec![2]),
                NlpContext::new("W[-1,1]#1>C[0]", vec![4]),
                NlpContext::new("W[-1,1]#1>C[1]", vec![1]),
            ]
        );
        assert_eq!(distinct(&contexts), contexts.len());
    }

    #[test]
    fn test_nested_over_root_path_keeps_identifiers_distinct() {
        // w0 -> w1 -> w2, plus a leaf under each of w0 and w1
        let mut seq = chain(3);
        let a = seq.push(Instance::default().with(FeatureKey::Text, "a"));
        let b = seq.push(Instance::default().with(FeatureKey::Text, "b"));
        seq.set_head(a, 0).unwrap();
        seq.set_head(b, 1).unwrap();

        let factory = NestedContextFactory::new(
            Box::new(RootPathContextFactory::new("P", 2)),
            Box::new(ChildrenContextFactory::new("C", BTreeSet::new(), BTreeSet::new())),
        );
        let contexts = factory.apply(&seq, 0);

        assert_eq!(
            contexts,
            vec![
                NlpContext::new("P#0>C[0]", vec![a]),
                NlpContext::new("P#1>C[0]", vec![0]),
                NlpContext::new("P#1>C[1]", vec![b]),
            ]
        );
        assert_eq!(distinct(&contexts), contexts.len());
    }
}
