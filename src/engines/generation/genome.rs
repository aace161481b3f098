//! Genotype representation for the architecture search
//!
//! A genotype is a handful of chromosomes of small integer-choice genes. Each gene
//! stands for one decision in the search space ("is this feature function on, and
//! with which of its parameterizations"). Copying a genotype is a value copy of
//! these records; the search space itself is shared behind an `Arc`.

use crate::error::{Result, SensevolveError};
use crate::functions::{FeatureSpec, PipelineConfig, SearchSpace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub active: bool,
    pub value: usize,
    /// Number of values the gene can take
    pub cardinality: usize,
    /// Optional genes can be switched off
    pub optional: bool,
}

impl Gene {
    pub fn new(cardinality: usize, optional: bool) -> Self {
        Self {
            active: true,
            value: 0,
            cardinality,
            optional,
        }
    }

    /// Re-roll activation (if optional), then the value if active
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.active = !self.optional || rng.gen_bool(0.5);
        if self.active && self.cardinality > 0 {
            self.value = rng.gen_range(0..self.cardinality);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    pub name: String,
    pub genes: Vec<Gene>,
}

/// What the genetic algorithm needs from an individual
pub trait Genotype: Clone + Send + Sync {
    type Phenotype;

    fn phenotype(&self) -> Result<Self::Phenotype>;

    fn gene_count(&self) -> usize;

    fn gene(&self, i: usize) -> Option<&Gene>;

    fn gene_mut(&mut self, i: usize) -> Option<&mut Gene>;

    fn fitness(&self) -> f64;

    /// Record an evaluated fitness
    fn set_fitness(&mut self, fitness: f64);

    fn is_evaluated(&self) -> bool;

    /// Mark for re-evaluation; the current fitness stays as a provisional value
    fn invalidate(&mut self);

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.gene_count() {
            if let Some(gene) = self.gene_mut(i) {
                gene.randomize(rng);
            }
        }
        self.invalidate();
    }
}

/// A decoded genotype: the feature pipeline plus solver settings to try
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Active feature candidates as `name[option]`
    pub features: Vec<String>,
    pub pipeline: PipelineConfig,
    pub hyperparameters: Vec<(String, String)>,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "features=[{}]", self.features.join(", "))?;
        for (key, value) in &self.hyperparameters {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

pub const FEATURE_CHROMOSOME: &str = "features";
pub const HYPERPARAMETER_CHROMOSOME: &str = "hyperparameters";

#[derive(Debug, Clone)]
pub struct PipelineGenotype {
    chromosomes: Vec<Chromosome>,
    fitness: f64,
    evaluated: bool,
    space: Arc<SearchSpace>,
}

impl PipelineGenotype {
    /// Prototype with every gene at its first value, optional features included
    pub fn new(space: Arc<SearchSpace>) -> Self {
        let features = Chromosome {
            name: FEATURE_CHROMOSOME.to_string(),
            genes: space
                .features
                .iter()
                .map(|c| Gene::new(c.options.len(), !c.required))
                .collect(),
        };
        let hyperparameters = Chromosome {
            name: HYPERPARAMETER_CHROMOSOME.to_string(),
            genes: space
                .hyperparameters
                .iter()
                .map(|h| Gene::new(h.values.len(), false))
                .collect(),
        };
        Self {
            chromosomes: vec![features, hyperparameters],
            fitness: 0.0,
            evaluated: false,
            space,
        }
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    fn locate(&self, mut i: usize) -> Option<(usize, usize)> {
        for (c, chromosome) in self.chromosomes.iter().enumerate() {
            if i < chromosome.genes.len() {
                return Some((c, i));
            }
            i -= chromosome.genes.len();
        }
        None
    }
}

fn out_of_range(kind: &str, name: &str, value: usize) -> SensevolveError {
    SensevolveError::InvalidPipeline(format!("{} '{}' has no option {}", kind, name, value))
}

impl Genotype for PipelineGenotype {
    type Phenotype = Candidate;

    /// Bias first, then every active feature gene in catalogue order
    fn phenotype(&self) -> Result<Candidate> {
        let mut features = Vec::new();
        let mut specs = vec![FeatureSpec::Bias];

        if let Some(chromosome) = self.chromosomes.first() {
            for (gene, candidate) in chromosome.genes.iter().zip(&self.space.features) {
                if !gene.active {
                    continue;
                }
                let spec = candidate
                    .options
                    .get(gene.value)
                    .ok_or_else(|| out_of_range("feature", &candidate.name, gene.value))?;
                features.push(format!("{}[{}]", candidate.name, gene.value));
                specs.push(spec.clone());
            }
        }

        let mut hyperparameters = Vec::new();
        if let Some(chromosome) = self.chromosomes.get(1) {
            for (gene, candidate) in chromosome.genes.iter().zip(&self.space.hyperparameters) {
                let value = candidate
                    .values
                    .get(gene.value)
                    .ok_or_else(|| out_of_range("hyperparameter", &candidate.key, gene.value))?;
                hyperparameters.push((candidate.key.clone(), value.clone()));
            }
        }

        Ok(Candidate {
            features,
            pipeline: PipelineConfig::new(specs),
            hyperparameters,
        })
    }

    fn gene_count(&self) -> usize {
        self.chromosomes.iter().map(|c| c.genes.len()).sum()
    }

    fn gene(&self, i: usize) -> Option<&Gene> {
        let (c, g) = self.locate(i)?;
        self.chromosomes[c].genes.get(g)
    }

    fn gene_mut(&mut self, i: usize) -> Option<&mut Gene> {
        let (c, g) = self.locate(i)?;
        self.chromosomes[c].genes.get_mut(g)
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
        self.evaluated = true;
    }

    fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    fn invalidate(&mut self) {
        self.evaluated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_prototype_shape() {
        let space = Arc::new(SearchSpace::default());
        let genotype = PipelineGenotype::new(space.clone());
        assert_eq!(
            genotype.gene_count(),
            space.features.len() + space.hyperparameters.len()
        );
        assert!(!genotype.is_evaluated());
        assert!(genotype.gene(genotype.gene_count()).is_none());
    }

    #[test]
    fn test_required_features_stay_active() {
        let space = Arc::new(SearchSpace::default());
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut genotype = PipelineGenotype::new(space.clone());
            genotype.randomize(&mut rng);
            let candidate = genotype.phenotype().unwrap();
            assert!(candidate.features.iter().any(|f| f.starts_with("focus_lemma")));
            assert_eq!(candidate.pipeline.features[0], FeatureSpec::Bias);
            assert_eq!(candidate.hyperparameters.len(), space.hyperparameters.len());
            assert!(candidate.pipeline.build().is_ok());
        }
    }

    #[test]
    fn test_out_of_range_gene_is_rejected() {
        let mut genotype = PipelineGenotype::new(Arc::new(SearchSpace::default()));
        if let Some(gene) = genotype.gene_mut(0) {
            gene.value = 99;
        }
        assert!(matches!(
            genotype.phenotype(),
            Err(SensevolveError::InvalidPipeline(_))
        ));
    }

    #[test]
    fn test_fitness_bookkeeping() {
        let mut genotype = PipelineGenotype::new(Arc::new(SearchSpace::default()));
        genotype.set_fitness(0.5);
        assert!(genotype.is_evaluated());
        genotype.invalidate();
        assert!(!genotype.is_evaluated());
        assert_eq!(genotype.fitness(), 0.5);
    }
}
