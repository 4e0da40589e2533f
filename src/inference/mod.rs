pub mod bedrock_client;
pub mod gemini_client;

use crate::{
    config::{Config, InferenceProvider},
    error::Result,
    models::DecodedImage,
};
use async_trait::async_trait;
use std::sync::Arc;

pub use bedrock_client::BedrockVisionClient;
pub use gemini_client::GeminiClient;

/// A multimodal model that answers a text prompt about one image.
///
/// Implementations make exactly one upstream call per `generate`, with no
/// retries; failures come back as `VisionError::InferenceError`.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Short label used in logs, e.g. `gemini/gemini-2.0-flash`.
    fn name(&self) -> &str;

    async fn generate(&self, image: &DecodedImage, prompt: &str) -> Result<String>;
}

pub struct InferenceManager;

impl InferenceManager {
    /// Builds the backend selected in `config`.
    pub async fn from_config(config: &Config) -> Result<Arc<dyn InferenceService>> {
        let service: Arc<dyn InferenceService> = match config.provider {
            InferenceProvider::Gemini => Arc::new(GeminiClient::new(config.gemini.clone())?),
            InferenceProvider::Bedrock => {
                Arc::new(BedrockVisionClient::from_config(config.bedrock.clone()).await?)
            }
        };

        log::info!("Inference backend ready: {}", service.name());
        Ok(service)
    }
}
