use serde::{Deserialize, Serialize};

/// Body of `POST /process-image`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageQueryRequest {
    /// Data-URL image, `"<mime-header>,<base64 payload>"`.
    #[serde(rename = "imageData", default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ImageQueryRequest {
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: Some(image_data.into()),
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// The image payload, or `None` when absent or empty.
    pub fn image_data(&self) -> Option<&str> {
        self.image_data.as_deref().filter(|data| !data.is_empty())
    }

    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageQueryResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An image recovered from a data URL, ready to be sent to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}
