pub mod evolution_engine;
pub mod genome;
pub mod hall_of_fame;
pub mod operators;
pub mod progress;

pub use evolution_engine::{FitnessFunction, GenerationStats, GeneticAlgorithm, ProgressCallback};
pub use genome::{Candidate, Chromosome, Gene, Genotype, PipelineGenotype};
pub use hall_of_fame::HallOfFame;
pub use progress::{HistoryProgressCallback, LogProgressCallback};
