use std::env;
use std::fmt;

use crate::error::{Result, VisionError};
use crate::logger::{LogLevel, LoggerConfig};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";
pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";
pub const DEFAULT_BEDROCK_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceProvider {
    Gemini,
    Bedrock,
}

impl InferenceProvider {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(InferenceProvider::Gemini),
            "bedrock" | "aws" => Ok(InferenceProvider::Bedrock),
            other => Err(VisionError::ConfigError(format!(
                "Unknown inference provider: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceProvider::Gemini => "gemini",
            InferenceProvider::Bedrock => "bedrock",
        }
    }
}

impl fmt::Display for InferenceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: InferenceProvider,
    pub gemini: GeminiConfig,
    pub bedrock: BedrockConfig,
    pub logger: LoggerConfig,
}

// Credentials never reach the logs, even at debug level.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for BedrockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockConfig")
            .field("region", &self.region)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("model_id", &self.model_id)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        ServerConfig {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            max_body_bytes: var("MAX_BODY_BYTES")
                .and_then(|limit| limit.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        GeminiConfig {
            api_key: var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")),
            model: var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
        }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: DEFAULT_BEDROCK_MODEL.to_string(),
            max_tokens: DEFAULT_BEDROCK_MAX_TOKENS,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        BedrockConfig {
            region: var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")),
            access_key: var("AWS_ACCESS_KEY_ID"),
            secret_key: var("AWS_SECRET_ACCESS_KEY"),
            model_id: var("BEDROCK_MODEL_ID").unwrap_or(defaults.model_id),
            max_tokens: var("BEDROCK_MAX_TOKENS")
                .and_then(|tokens| tokens.parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            provider: InferenceProvider::Gemini,
            gemini: GeminiConfig::default(),
            bedrock: BedrockConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| {
            env::var(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match var("INFERENCE_PROVIDER") {
            Some(value) => InferenceProvider::parse(&value)?,
            None => InferenceProvider::Gemini,
        };

        let mut logger = match var("LOG_FORMAT").map(|f| f.to_ascii_lowercase()) {
            Some(format) if format == "json" => LoggerConfig::production(),
            Some(format) if format == "pretty" || format == "text" => LoggerConfig::default(),
            None => LoggerConfig::default(),
            Some(other) => {
                return Err(VisionError::ConfigError(format!(
                    "Unknown log format: {}",
                    other
                )))
            }
        };
        if let Some(level) = var("LOG_LEVEL") {
            logger = logger.with_level(LogLevel::parse(&level)?);
        }
        if let Some(path) = var("LOG_FILE") {
            logger = logger.with_file_output(&path);
        }

        Ok(Config {
            server: ServerConfig::from_vars(&var),
            provider,
            gemini: GeminiConfig::from_vars(&var),
            bedrock: BedrockConfig::from_vars(&var),
            logger,
        })
    }

    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self.provider = InferenceProvider::Gemini;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self.provider = InferenceProvider::Bedrock;
        self
    }

    pub fn with_logger(mut self, logger: LoggerConfig) -> Self {
        self.logger = logger;
        self
    }

    pub fn model_name(&self) -> &str {
        match self.provider {
            InferenceProvider::Gemini => &self.gemini.model,
            InferenceProvider::Bedrock => &self.bedrock.model_id,
        }
    }
}
