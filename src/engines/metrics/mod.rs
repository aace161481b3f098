pub mod classification;

pub use classification::{ClassificationReport, LabelScores};
