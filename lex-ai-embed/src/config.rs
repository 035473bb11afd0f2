//! Configuration for embedding models

use serde::{Deserialize, Serialize};

/// Default embedding model. A small sentence-transformer that ships as a
/// FastEmbed built-in, so there are no model files to manage by hand.
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Configuration for embedding models.
///
/// The config is serializable; the provider hashes the serialized form to key
/// its global model cache, so two providers with identical configs share one
/// loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Name of the embedding model to use
    pub model_name: String,
    /// Maximum batch size for embedding generation
    pub batch_size: usize,
    /// Whether to L2-normalize embeddings
    pub normalize: bool,
}

impl EmbedConfig {
    /// Create a configuration for a named model with default settings.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            batch_size: 32,
            normalize: true,
        }
    }

    /// Set the batch size for embedding generation (builder style)
    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    /// Set whether to normalize embeddings (builder style)
    pub fn with_normalize(self, normalize: bool) -> Self {
        Self { normalize, ..self }
    }

    /// Get the configured model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmbedConfig::default();

        assert_eq!(config.model_name, DEFAULT_MODEL_NAME);
        assert_eq!(config.batch_size, 32);
        assert!(config.normalize);
    }

    #[test]
    fn test_builder_methods() {
        let config = EmbedConfig::new("custom-model")
            .with_batch_size(64)
            .with_normalize(false);

        assert_eq!(config.model_name(), "custom-model");
        assert_eq!(config.batch_size, 64);
        assert!(!config.normalize);
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = EmbedConfig::default().with_batch_size(8);
        let json = serde_json::to_string(&config).unwrap();
        let back: EmbedConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.model_name, config.model_name);
        assert_eq!(back.batch_size, config.batch_size);
        assert_eq!(back.normalize, config.normalize);
    }
}
