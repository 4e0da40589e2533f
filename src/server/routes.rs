use actix_web::{post, web, Responder};

use super::handler::ImageQueryHandler;
use crate::{
    error::{Result, VisionError},
    models::ImageQueryRequest,
};

#[post("/process-image")]
pub async fn process_image(
    handler: web::Data<ImageQueryHandler>,
    payload: web::Json<ImageQueryRequest>,
) -> Result<impl Responder> {
    match handler.handle(payload.into_inner()).await {
        Ok(response) => Ok(web::Json(response)),
        Err(err @ VisionError::BadRequest(_)) => {
            log::warn!("Rejected request: {}", err);
            Err(err)
        }
        Err(err) => {
            log::error!("Error processing image ({}): {}", err.kind(), err);
            Err(err)
        }
    }
}
