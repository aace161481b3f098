pub mod generation;
pub mod metrics;
pub mod training;
pub mod validation;
