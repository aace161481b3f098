//! Versioned, self-describing model file.
//!
//! Compatibility rules: readers refuse files whose `format_version` is newer than
//! `FORMAT_VERSION`; unknown fields are ignored; any field introduced after version 1
//! must carry a serde default so older files keep loading.

use crate::error::{Result, SensevolveError};
use crate::functions::PipelineConfig;
use crate::ml::features::Vocabulary;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile<M> {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub pipeline: PipelineConfig,
    pub features: Vocabulary,
    pub labels: Vocabulary,
    pub model: M,
}

impl<M: Serialize + DeserializeOwned> ModelFile<M> {
    pub fn new(pipeline: PipelineConfig, features: Vocabulary, labels: Vocabulary, model: M) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            pipeline,
            features,
            labels,
            model,
        }
    }

    pub fn write(&self, sink: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *sink, self)?;
        sink.flush()?;
        Ok(())
    }

    pub fn read(source: &mut dyn Read) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_reader(source)?;
        let found = document
            .get("format_version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| {
                SensevolveError::Configuration("model file has no format_version".to_string())
            })?;
        if found > FORMAT_VERSION as u64 {
            return Err(SensevolveError::UnsupportedModelVersion {
                found: found.min(u32::MAX as u64) as u32,
                supported: FORMAT_VERSION,
            });
        }
        Ok(serde_json::from_value(document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FeatureSpec;
    use std::io::Cursor;

    fn sample() -> ModelFile<Vec<f64>> {
        ModelFile::new(
            PipelineConfig::new(vec![FeatureSpec::Bias]),
            Vocabulary::from(vec!["<unk>".to_string(), "bias=1".to_string()]),
            Vocabulary::from(vec!["a".to_string()]),
            vec![0.5, -0.5],
        )
    }

    #[test]
    fn test_round_trip() {
        let mut buffer = Vec::new();
        sample().write(&mut buffer).unwrap();
        let loaded = ModelFile::<Vec<f64>>::read(&mut Cursor::new(buffer)).unwrap();

        assert_eq!(loaded.format_version, FORMAT_VERSION);
        assert_eq!(loaded.features.index("bias=1"), 1);
        assert_eq!(loaded.model, vec![0.5, -0.5]);
    }

    #[test]
    fn test_newer_version_is_refused() {
        let mut document = serde_json::to_value(sample()).unwrap();
        document["format_version"] = serde_json::json!(FORMAT_VERSION + 1);
        let bytes = serde_json::to_vec(&document).unwrap();

        let err = ModelFile::<Vec<f64>>::read(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, SensevolveError::UnsupportedModelVersion { .. }));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut document = serde_json::to_value(sample()).unwrap();
        document["trained_by"] = serde_json::json!("someone");
        let bytes = serde_json::to_vec(&document).unwrap();
        assert!(ModelFile::<Vec<f64>>::read(&mut Cursor::new(bytes)).is_ok());
    }
}
