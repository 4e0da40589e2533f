use std::sync::Arc;

use crate::{
    data_url::decode_data_url,
    error::{Result, VisionError},
    inference::InferenceService,
    logger,
    models::{ImageQueryRequest, ImageQueryResponse},
    prompt::compose_prompt,
};

pub const MISSING_IMAGE_MESSAGE: &str = "No imageData provided";

/// Turns one image query into one model call.
///
/// Holds nothing but the injected inference backend, so a single instance is
/// shared by every worker.
#[derive(Clone)]
pub struct ImageQueryHandler {
    service: Arc<dyn InferenceService>,
}

impl ImageQueryHandler {
    pub fn new(service: Arc<dyn InferenceService>) -> Self {
        Self { service }
    }

    pub async fn handle(&self, request: ImageQueryRequest) -> Result<ImageQueryResponse> {
        let image_data = request
            .image_data()
            .ok_or_else(|| VisionError::BadRequest(MISSING_IMAGE_MESSAGE.into()))?;

        let prompt = compose_prompt(request.prompt());
        let image = decode_data_url(image_data)?;

        let mut timer = logger::timer(self.service.name());
        let text = self.service.generate(&image, &prompt).await?;
        let elapsed = timer.stop();

        log::info!(
            "Answered {} query in {}ms ({} chars)",
            image.mime_type,
            elapsed.as_millis(),
            text.chars().count()
        );

        Ok(ImageQueryResponse { response: text })
    }
}
