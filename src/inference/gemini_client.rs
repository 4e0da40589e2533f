use crate::{
    config::GeminiConfig,
    error::{Result, VisionError},
    inference::InferenceService,
    models::{
        gemini::{ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse, Part},
        DecodedImage,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    label: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.ok_or_else(|| {
            VisionError::ConfigError(
                "Gemini API key is required (set GEMINI_API_KEY or GOOGLE_API_KEY)".into(),
            )
        })?;

        Ok(Self::with_client(Client::new(), api_key, config.model, config.base_url))
    }

    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let model = model.into();
        Self {
            client,
            api_key: api_key.into(),
            label: format!("gemini/{}", model),
            model,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub fn build_request(image: &DecodedImage, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::inline_data(
                        image.mime_type.clone(),
                        general_purpose::STANDARD.encode(&image.bytes),
                    ),
                    Part::text(prompt),
                ],
            }],
        }
    }

    fn api_error(status: reqwest::StatusCode, body: &str) -> VisionError {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) if !parsed.error.message.is_empty() => {
                log::error!(
                    "Gemini API error: code={:?} status={:?}",
                    parsed.error.code,
                    parsed.error.status
                );
                VisionError::InferenceError(parsed.error.message)
            }
            _ => VisionError::InferenceError(format!(
                "Gemini API returned {}: {}",
                status, body
            )),
        }
    }
}

#[async_trait]
impl InferenceService for GeminiClient {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(&self, image: &DecodedImage, prompt: &str) -> Result<String> {
        let request = Self::build_request(image, prompt);

        log::info!("Invoking model: {}", self.model);
        log::debug!(
            "Gemini request: {} image bytes, {} prompt chars",
            image.bytes.len(),
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| VisionError::InferenceError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VisionError::InferenceError(format!("Gemini response failed: {}", e)))?;

        if !status.is_success() {
            return Err(Self::api_error(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            VisionError::InferenceError(format!("Malformed Gemini response: {}", e))
        })?;

        if let Some(reason) = parsed.block_reason() {
            return Err(VisionError::InferenceError(format!(
                "Prompt was blocked by Gemini: {}",
                reason
            )));
        }

        parsed.text().ok_or_else(|| {
            let finish_reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("no candidates");
            VisionError::InferenceError(format!(
                "Gemini returned no text (finish reason: {})",
                finish_reason
            ))
        })
    }
}
