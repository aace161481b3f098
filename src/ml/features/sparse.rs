use serde::{Deserialize, Serialize};

/// Feature vector with strictly ascending indices and a cached L2 norm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
    norm: f64,
}

impl SparseVector {
    /// Sorts by index and sums values that share an index
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(index, _)| index);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match indices.last() {
                Some(&last) if last == index => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(index);
                    values.push(value);
                }
            }
        }

        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        Self { indices, values, norm }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense weight row; indices past its end contribute nothing
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| weights.get(i).map(|w| w * v))
            .sum()
    }
}

/// One vectorized example and its label index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseInstance {
    pub vector: SparseVector,
    pub target: usize,
}
