use crate::config::EvolutionConfig;
use crate::engines::generation::{
    genome::Genotype,
    hall_of_fame::HallOfFame,
    operators::{crossover, mutate, mutation_probability, rank_selection},
};
use crate::error::{Result, SensevolveError};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

/// Scores a decoded individual; higher is better
///
/// Called concurrently from the worker pool, one individual per call.
pub trait FitnessFunction<T>: Sync {
    fn evaluate(&self, phenotype: &T) -> Result<f64>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub epoch: usize,
    /// Best fitness seen in any generation so far
    pub best: f64,
    pub generation_best: f64,
    pub average: f64,
    /// Individuals that needed a fitness evaluation this generation
    pub evaluated: usize,
    pub epochs_no_change: usize,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, epoch: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats);
}

pub struct GeneticAlgorithm<G: Genotype, F> {
    config: EvolutionConfig,
    prototype: G,
    fitness: F,
    hall_of_fame: HallOfFame<G>,
    history: Vec<GenerationStats>,
    pool: ThreadPool,
    rng: StdRng,
}

fn average_fitness<G: Genotype>(population: &[G]) -> f64 {
    if population.is_empty() {
        0.0
    } else {
        population.iter().map(Genotype::fitness).sum::<f64>() / population.len() as f64
    }
}

impl<G, F> GeneticAlgorithm<G, F>
where
    G: Genotype,
    F: FitnessFunction<G::Phenotype>,
{
    pub fn new(config: EvolutionConfig, prototype: G, fitness: F) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|e| SensevolveError::Configuration(format!("Failed to build worker pool: {}", e)))?;

        Ok(Self {
            hall_of_fame: HallOfFame::new(config.num_elites),
            config,
            prototype,
            fitness,
            history: Vec::new(),
            pool,
            rng,
        })
    }

    /// Run generations until `max_epochs` or until `patience` epochs pass without improvement
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C) -> Result<G> {
        self.hall_of_fame = HallOfFame::new(self.config.num_elites);
        self.history.clear();

        let mut population = self.initialize_population();
        let mut epoch = 0;
        let mut epochs_no_change = 0;

        loop {
            callback.on_generation_start(epoch);

            let evaluated = self.evaluate_population(&mut population)?;
            population.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));

            let generation_best = population.last().map(Genotype::fitness).unwrap_or(f64::NEG_INFINITY);
            if self.hall_of_fame.is_empty() || generation_best > self.hall_of_fame.best_fitness() {
                self.hall_of_fame.update(&population);
                epochs_no_change = 0;
            } else {
                epochs_no_change += 1;
            }

            let stats = GenerationStats {
                epoch,
                best: self.hall_of_fame.best_fitness(),
                generation_best,
                average: average_fitness(&population),
                evaluated,
                epochs_no_change,
            };
            callback.on_generation_complete(&stats);
            self.history.push(stats);

            epoch += 1;
            if self.is_terminal(epoch, epochs_no_change) {
                break;
            }

            population = self.create_next_generation(&population);
        }

        self.hall_of_fame
            .best()
            .cloned()
            .ok_or_else(|| SensevolveError::IllegalState("search ended without an individual".to_string()))
    }

    pub fn hall_of_fame(&self) -> &HallOfFame<G> {
        &self.hall_of_fame
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    pub fn fitness_function(&self) -> &F {
        &self.fitness
    }

    fn is_terminal(&self, epoch: usize, epochs_no_change: usize) -> bool {
        epoch >= self.config.max_epochs
            || (self.config.patience > 0 && epochs_no_change >= self.config.patience)
    }

    fn initialize_population(&mut self) -> Vec<G> {
        (0..self.config.population_size)
            .map(|_| {
                let mut genotype = self.prototype.clone();
                genotype.randomize(&mut self.rng);
                genotype
            })
            .collect()
    }

    /// Evaluates every individual not yet scored; returns how many were
    fn evaluate_population(&self, population: &mut [G]) -> Result<usize> {
        let fitness = &self.fitness;
        let pending = population.iter().filter(|g| !g.is_evaluated()).count();

        self.pool.install(|| {
            population
                .par_iter_mut()
                .filter(|g| !g.is_evaluated())
                .try_for_each(|genotype| -> Result<()> {
                    let phenotype = genotype.phenotype()?;
                    let score = fitness.evaluate(&phenotype)?;
                    genotype.set_fitness(score);
                    Ok(())
                })
        })?;

        Ok(pending)
    }

    /// `sorted` is ordered by ascending fitness
    fn create_next_generation(&mut self, sorted: &[G]) -> Vec<G> {
        let size = self.config.population_size;
        let average = average_fitness(sorted);
        let max = sorted.last().map(Genotype::fitness).unwrap_or(average);

        // Elitism: carry the best-seen generation's top individuals unchanged
        let mut next_generation: Vec<G> = self
            .hall_of_fame
            .elites()
            .iter()
            .take(self.config.num_elites)
            .cloned()
            .collect();

        while next_generation.len() < size {
            let parent1 = &sorted[rank_selection(sorted.len(), &mut self.rng)];
            let parent2 = &sorted[rank_selection(sorted.len(), &mut self.rng)];

            let (mut child1, mut child2) = if self.rng.gen::<f64>() < self.config.crossover_probability {
                let (mut a, mut b) = crossover(parent1, parent2, &mut self.rng);
                for child in [&mut a, &mut b] {
                    child.set_fitness(average);
                    child.invalidate();
                }
                (a, b)
            } else {
                (parent1.clone(), parent2.clone())
            };

            for child in [&mut child1, &mut child2] {
                let probability = mutation_probability(
                    self.config.mutation_probability,
                    child.fitness(),
                    average,
                    max,
                );
                if mutate(child, probability, &mut self.rng) {
                    child.invalidate();
                }
            }

            next_generation.push(child1);
            if next_generation.len() < size {
                next_generation.push(child2);
            }
        }

        next_generation
    }
}
