use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Every failure the service can report.
///
/// Only two HTTP statuses ever leave the server: `BadRequest` is a 400, every
/// other kind is a 500. The `Display` form is the bare message so that it can
/// be handed to the caller verbatim in the `error` field.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    DecodeError(String),
    #[error("{0}")]
    InferenceError(String),
    #[error("{0}")]
    ConfigError(String),
    #[error("{0}")]
    InternalError(String),
}

impl VisionError {
    pub fn kind(&self) -> &'static str {
        match self {
            VisionError::BadRequest(_) => "bad_request",
            VisionError::DecodeError(_) => "decode_error",
            VisionError::InferenceError(_) => "inference_error",
            VisionError::ConfigError(_) => "config_error",
            VisionError::InternalError(_) => "internal_error",
        }
    }
}

impl ResponseError for VisionError {
    fn status_code(&self) -> StatusCode {
        match self {
            VisionError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;
