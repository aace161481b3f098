use super::{
    classifier::ClassifierConfig, evolution::EvolutionConfig, search::SearchConfig,
    traits::ConfigSection, validation::ValidationConfig,
};
use crate::error::{Result, SensevolveError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "SENSEVOLVE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub validation: ValidationConfig,
    pub search: SearchConfig,
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        self.validation.validate()?;
        self.search.validate()?;
        self.classifier.validate()?;
        Ok(())
    }

    /// TOML file overlaid with `SENSEVOLVE__<SECTION>__<KEY>` environment variables
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Toml,
            ))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| SensevolveError::Configuration(format!("Failed to serialize: {}", e)))?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
