pub mod cross_validation;
pub mod folds;

pub use cross_validation::{cross_validate, AggregatedResult, ValidationResult};
pub use folds::{create_folds, DataSplitter, Fold, SplitConfig, StratifiedSplitter};
