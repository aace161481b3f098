pub mod classifier;
pub mod perceptron;
pub mod persistence;
pub mod pipeline_classifier;

pub use classifier::{parse_value, Classifier, Hyperparameter, SparseModel};
pub use perceptron::AveragedPerceptron;
pub use persistence::{ModelFile, FORMAT_VERSION};
pub use pipeline_classifier::PipelineClassifier;
