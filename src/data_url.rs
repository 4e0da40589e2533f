use base64::{engine::general_purpose, Engine as _};
use image::{io::Reader as ImageReader, GenericImageView, ImageFormat, ImageOutputFormat};
use std::io::Cursor;

use crate::{
    error::{Result, VisionError},
    models::DecodedImage,
};

/// Returns the base64 payload of a data URL, i.e. everything after the first
/// comma. The header part is not interpreted.
pub fn split_data_url(data_url: &str) -> Result<&str> {
    data_url
        .split_once(',')
        .map(|(_header, payload)| payload)
        .ok_or_else(|| {
            VisionError::DecodeError("Invalid image data URL: missing ',' separator".into())
        })
}

pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    // line-wrapped payloads are common; whitespace is never part of the alphabet
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| VisionError::DecodeError(format!("Invalid base64 image payload: {}", e)))
}

/// Formats every backend accepts as-is; anything else is re-encoded as PNG.
pub const UPSTREAM_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// Decodes a data-URL image into bytes a model backend will accept.
///
/// The format is sniffed from the bytes themselves and the whole image is
/// decoded, so truncated or corrupt payloads are rejected here.
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage> {
    let bytes = decode_base64(split_data_url(data_url)?)?;

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| VisionError::DecodeError(format!("Unrecognized image data: {}", e)))?;

    let format = reader.format().ok_or_else(|| {
        VisionError::DecodeError("Unrecognized image data: unknown image format".into())
    })?;

    let image = reader
        .decode()
        .map_err(|e| VisionError::DecodeError(format!("Unrecognized image data: {}", e)))?;
    let (width, height) = image.dimensions();

    let (bytes, format) = if UPSTREAM_FORMATS.contains(&format) {
        (bytes, format)
    } else {
        log::debug!("Re-encoding {:?} image as PNG", format);
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .map_err(|e| {
                VisionError::DecodeError(format!("Failed to re-encode image: {}", e))
            })?;
        (png, ImageFormat::Png)
    };

    let mime_type = format.to_mime_type().to_string();
    log::debug!(
        "Decoded {} image ({}x{}, {} bytes)",
        mime_type,
        width,
        height,
        bytes.len()
    );

    Ok(DecodedImage {
        bytes,
        mime_type,
        width,
        height,
    })
}
