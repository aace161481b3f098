use super::classifier::{parse_value, Hyperparameter, SparseModel};
use crate::error::{Result, SensevolveError};
use crate::ml::features::{SparseInstance, SparseVector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Multiclass perceptron with optional weight averaging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedPerceptron {
    pub epochs: usize,
    pub averaged: bool,
    pub seed: u64,
    /// `weights[label][feature]`
    #[serde(default)]
    weights: Vec<Vec<f64>>,
}

impl Default for AveragedPerceptron {
    fn default() -> Self {
        Self {
            epochs: 5,
            averaged: true,
            seed: 1,
            weights: Vec::new(),
        }
    }
}

fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }
    best
}

impl AveragedPerceptron {
    pub fn num_labels(&self) -> usize {
        self.weights.len()
    }
}

impl SparseModel for AveragedPerceptron {
    fn hyperparameters(&self) -> Vec<Hyperparameter> {
        let defaults = Self::default();
        vec![
            Hyperparameter::new("Epochs", "epochs", "Passes over the training data", defaults.epochs),
            Hyperparameter::new(
                "Averaged",
                "averaged",
                "Average weights over all updates",
                defaults.averaged,
            ),
            Hyperparameter::new("Seed", "seed", "Seed for per-epoch shuffling", defaults.seed),
        ]
    }

    fn set_hyperparameter(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "epochs" => self.epochs = parse_value(key, value)?,
            "averaged" => self.averaged = parse_value(key, value)?,
            "seed" => self.seed = parse_value(key, value)?,
            _ => {
                return Err(SensevolveError::Hyperparameter {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
        }
        Ok(())
    }

    fn fit(&mut self, data: &[SparseInstance], num_features: usize, num_labels: usize) -> Result<()> {
        if data.is_empty() || num_labels == 0 {
            return Err(SensevolveError::IllegalState(
                "cannot fit a perceptron without training data".to_string(),
            ));
        }

        let mut weights = vec![vec![0.0; num_features]; num_labels];
        // running sum of step-weighted updates, for averaging
        let mut totals = vec![vec![0.0; num_features]; num_labels];
        let mut step = 1.0;
        let mut order: Vec<usize> = (0..data.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);

        for _ in 0..self.epochs.max(1) {
            order.shuffle(&mut rng);
            for &i in &order {
                let instance = &data[i];
                let gold = instance.target;
                if gold >= num_labels {
                    return Err(SensevolveError::IllegalState(format!(
                        "label index {} outside {} labels",
                        gold, num_labels
                    )));
                }
                let scores: Vec<f64> = weights.iter().map(|row| instance.vector.dot(row)).collect();
                let predicted = argmax(&scores);
                if predicted != gold {
                    for (j, value) in instance.vector.iter().filter(|&(j, _)| j < num_features) {
                        weights[gold][j] += value;
                        weights[predicted][j] -= value;
                        totals[gold][j] += step * value;
                        totals[predicted][j] -= step * value;
                    }
                }
                step += 1.0;
            }
        }

        if self.averaged {
            for (row, total) in weights.iter_mut().zip(&totals) {
                for (w, t) in row.iter_mut().zip(total) {
                    *w -= t / step;
                }
            }
        }
        self.weights = weights;
        Ok(())
    }

    fn scores(&self, vector: &SparseVector) -> Vec<f64> {
        self.weights.iter().map(|row| vector.dot(row)).collect()
    }
}
