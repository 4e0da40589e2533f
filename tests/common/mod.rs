#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{ImageBuffer, ImageOutputFormat, Rgba};
use rgen_vision::{DecodedImage, InferenceService, Result, VisionError};
use std::io::Cursor;
use std::sync::Mutex;

/// A 4x4 image in the given container format, wrapped in a data URL.
pub fn encoded_data_url(format: ImageOutputFormat) -> String {
    let img = ImageBuffer::from_pixel(4, 4, Rgba([255u8, 255, 255, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

/// A small PNG wrapped in a data URL.
pub fn png_data_url() -> String {
    encoded_data_url(ImageOutputFormat::Png)
}

/// Records every call and replies with a canned result.
pub struct ScriptedService {
    reply: std::result::Result<String, String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedService {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(mime_type, prompt)` of each call, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, image: &DecodedImage, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((image.mime_type.clone(), prompt.to_string()));
        self.reply
            .clone()
            .map_err(VisionError::InferenceError)
    }
}
