use thiserror::Error;

#[derive(Error, Debug)]
pub enum SensevolveError {
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Malformed dependency tree: {0}")]
    Tree(String),

    #[error("Corpus error at line {line}: {message}")]
    Corpus { line: usize, message: String },

    #[error("Invalid value '{value}' for hyperparameter '{key}'")]
    Hyperparameter { key: String, value: String },

    #[error("Unsupported model format version {found} (supported up to {supported})")]
    UnsupportedModelVersion { found: u32, supported: u32 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, SensevolveError>;
