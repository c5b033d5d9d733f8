//! Image decoding.
//! Fetched frame bytes (WebP, PNG, JPEG, anything `image` supports) become RGBA FrameBuffers.

use scrollreel_core::{FrameBuffer, ReelError};

/// Decode an image from raw bytes (e.g. a fetched response body).
pub fn load_image_from_bytes(data: &[u8]) -> Result<FrameBuffer, ReelError> {
    let img = image::load_from_memory(data)
        .map_err(|e| ReelError::Other(format!("failed to decode image: {}", e)))?;
    Ok(into_frame_buffer(img))
}

fn into_frame_buffer(img: image::DynamicImage) -> FrameBuffer {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    }
}
