pub mod classifier;
pub mod evolution;
pub mod manager;
pub mod search;
pub mod traits;
pub mod validation;

pub use classifier::ClassifierConfig;
pub use evolution::EvolutionConfig;
pub use manager::AppConfig;
pub use search::SearchConfig;
pub use traits::ConfigSection;
pub use validation::ValidationConfig;
