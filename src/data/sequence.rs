use super::instance::Instance;
use crate::error::{Result, SensevolveError};

/// Token slot in a sequence, optionally linked into a dependency tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    pub instance: Instance,
    head: Option<usize>,
    children: Vec<usize>,
}

impl Token {
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

/// Ordered list of tokens. When heads are assigned it doubles as a dependency tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    pub instance: Instance,
    tokens: Vec<Token>,
}

impl Sequence {
    pub fn new(index: usize) -> Self {
        Self {
            instance: Instance::new(index),
            tokens: Vec::new(),
        }
    }

    /// Build a flat sequence; token indices are rewritten to their positions
    pub fn from_instances(index: usize, instances: Vec<Instance>) -> Self {
        let mut sequence = Self::new(index);
        for instance in instances {
            sequence.push(instance);
        }
        sequence
    }

    pub fn push(&mut self, mut instance: Instance) -> usize {
        let position = self.tokens.len();
        instance.index = position;
        self.tokens.push(Token {
            instance,
            head: None,
            children: Vec::new(),
        });
        position
    }

    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Instance> {
        self.tokens.get(i).map(|t| &t.instance)
    }

    pub fn token(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Instance> {
        self.tokens.iter().map(|t| &t.instance)
    }

    pub fn head(&self, i: usize) -> Option<usize> {
        self.tokens.get(i).and_then(|t| t.head)
    }

    pub fn children(&self, i: usize) -> &[usize] {
        self.tokens.get(i).map(|t| t.children.as_slice()).unwrap_or(&[])
    }

    /// Attach `child` under `head`, keeping both sides of the link in sync
    pub fn set_head(&mut self, child: usize, head: usize) -> Result<()> {
        let size = self.size();
        if child >= size || head >= size {
            return Err(SensevolveError::Tree(format!(
                "link {} -> {} outside sequence of size {}",
                child, head, size
            )));
        }
        if child == head {
            return Err(SensevolveError::Tree(format!("token {} cannot head itself", child)));
        }

        if let Some(previous) = self.tokens[child].head.take() {
            self.tokens[previous].children.retain(|&c| c != child);
        }
        self.tokens[child].head = Some(head);
        self.tokens[head].children.push(child);
        Ok(())
    }

    /// The single token without a head
    pub fn root(&self) -> Option<usize> {
        let mut roots = self.tokens.iter().enumerate().filter(|(_, t)| t.head.is_none());
        match (roots.next(), roots.next()) {
            (Some((i, _)), None) => Some(i),
            _ => None,
        }
    }

    /// Every head chain must end at the unique root
    pub fn check_tree(&self) -> Result<()> {
        let root = self.root().ok_or_else(|| {
            SensevolveError::Tree("expected exactly one token without a head".to_string())
        })?;

        for start in 0..self.size() {
            let mut current = start;
            let mut steps = 0;
            while let Some(head) = self.head(current) {
                current = head;
                steps += 1;
                if steps > self.size() {
                    return Err(SensevolveError::Tree(format!(
                        "head chain starting at {} does not terminate",
                        start
                    )));
                }
            }
            if current != root {
                return Err(SensevolveError::Tree(format!(
                    "token {} is not connected to root {}",
                    start, root
                )));
            }
        }
        Ok(())
    }
}
