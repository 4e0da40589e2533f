//! Answer questions about an image with a hosted multimodal model.
//!
//! The crate exposes a single endpoint, `POST /process-image`, taking a
//! data-URL image and an optional prompt. The image is decoded, the prompt is
//! prefixed with a fixed set of instructions, and both are sent to the
//! configured backend (Gemini or Bedrock) in one call.

pub mod config;
pub mod data_url;
pub mod error;
pub mod inference;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod server;

pub use config::{BedrockConfig, Config, GeminiConfig, InferenceProvider, ServerConfig};
pub use error::{Result, VisionError};
pub use inference::{BedrockVisionClient, GeminiClient, InferenceManager, InferenceService};
pub use models::{DecodedImage, ErrorResponse, ImageQueryRequest, ImageQueryResponse};
pub use server::ImageQueryHandler;
