use crate::{
    config::{BedrockConfig, DEFAULT_BEDROCK_REGION},
    error::{Result, VisionError},
    inference::InferenceService,
    models::{
        anthropic::{
            ContentBlock, ImageSource, Message, MessagesRequest, MessagesResponse,
            BEDROCK_ANTHROPIC_VERSION,
        },
        DecodedImage,
    },
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use base64::{engine::general_purpose, Engine as _};

/// Claude vision models served through Bedrock `InvokeModel`.
#[derive(Clone)]
pub struct BedrockVisionClient {
    client: Client,
    model_id: String,
    max_tokens: u32,
    label: String,
}

impl BedrockVisionClient {
    pub async fn from_config(bedrock_config: BedrockConfig) -> Result<Self> {
        Self::check_model(&bedrock_config.model_id)?;

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            aws_config::defaults(BehaviorVersion::latest())
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "rgen-vision",
                ))
                .region(aws_sdk_bedrockruntime::config::Region::new(
                    bedrock_config
                        .region
                        .clone()
                        .unwrap_or_else(|| DEFAULT_BEDROCK_REGION.to_string()),
                ))
                .load()
                .await
        } else if let Some(region) = &bedrock_config.region {
            aws_config::defaults(BehaviorVersion::latest())
                .region(aws_sdk_bedrockruntime::config::Region::new(region.clone()))
                .load()
                .await
        } else {
            aws_config::load_defaults(BehaviorVersion::latest()).await
        };

        Ok(Self::new(
            Client::new(&aws_config),
            bedrock_config.model_id,
            bedrock_config.max_tokens,
        ))
    }

    pub fn new(client: Client, model_id: impl Into<String>, max_tokens: u32) -> Self {
        let model_id = model_id.into();
        Self {
            client,
            label: format!("bedrock/{}", model_id),
            model_id,
            max_tokens,
        }
    }

    /// Only the Anthropic messages format carries images; this also accepts
    /// cross-region inference profiles such as `us.anthropic.claude-...`.
    pub fn check_model(model_id: &str) -> Result<()> {
        if model_id.contains("anthropic.claude") {
            Ok(())
        } else {
            Err(VisionError::ConfigError(format!(
                "Unsupported Bedrock vision model: {}",
                model_id
            )))
        }
    }

    pub fn build_payload(image: &DecodedImage, prompt: &str, max_tokens: u32) -> MessagesRequest {
        MessagesRequest {
            anthropic_version: BEDROCK_ANTHROPIC_VERSION.to_string(),
            max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: image.mime_type.clone(),
                            data: general_purpose::STANDARD.encode(&image.bytes),
                        },
                    },
                    ContentBlock::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
        }
    }

    pub fn parse_response(body: &[u8]) -> Result<String> {
        let response: MessagesResponse = serde_json::from_slice(body).map_err(|e| {
            VisionError::InferenceError(format!("Malformed Bedrock response: {}", e))
        })?;

        let text = response.text();
        if text.is_empty() {
            return Err(VisionError::InferenceError(format!(
                "Bedrock returned no text (stop reason: {})",
                response.stop_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl InferenceService for BedrockVisionClient {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(&self, image: &DecodedImage, prompt: &str) -> Result<String> {
        let payload = Self::build_payload(image, prompt, self.max_tokens);
        let request_json = serde_json::to_vec(&payload)
            .map_err(|e| VisionError::InternalError(e.to_string()))?;

        log::info!("Invoking model: {}", self.model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json))
            .send()
            .await
            .map_err(|e| {
                log::error!("AWS SDK error details: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    VisionError::InferenceError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    VisionError::InferenceError(format!("AWS SDK error: {}", e))
                }
            })?;

        Self::parse_response(response.body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let image = DecodedImage {
            bytes: vec![0xff, 0xd8, 0xff],
            mime_type: "image/jpeg".to_string(),
            width: 1,
            height: 1,
        };
        let payload = BedrockVisionClient::build_payload(&image, "what is this?", 512);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": 512,
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "image",
                            "source": { "type": "base64", "media_type": "image/jpeg", "data": "/9j/" }
                        },
                        { "type": "text", "text": "what is this?" }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_parse_response() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": "42" }],
            "stop_reason": "end_turn"
        });
        let text = BedrockVisionClient::parse_response(body.to_string().as_bytes()).unwrap();
        assert_eq!(text, "42");
    }

    #[test]
    fn test_parse_empty_response() {
        let body = json!({ "content": [], "stop_reason": "max_tokens" });
        let err = BedrockVisionClient::parse_response(body.to_string().as_bytes()).unwrap_err();
        assert!(err.to_string().contains("max_tokens"));

        assert!(BedrockVisionClient::parse_response(b"not json").is_err());
    }

    #[test]
    fn test_model_check() {
        assert!(BedrockVisionClient::check_model("anthropic.claude-3-haiku-20240307-v1:0").is_ok());
        assert!(BedrockVisionClient::check_model("us.anthropic.claude-3-5-sonnet-20240620-v1:0").is_ok());
        assert!(BedrockVisionClient::check_model("amazon.titan-text-express-v1").is_err());
    }
}
