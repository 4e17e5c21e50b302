use glimpse_core::OcrError;
use glimpse_types::IntrinsicRect;
use image::{ExtendedColorType, ImageEncoder, RgbaImage, codecs::png::PngEncoder, imageops};

use crate::source::LoadedImage;

/// Standalone PNG of a cropped region
#[derive(Debug, Clone)]
pub struct RegionBlob {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Crop `rect` out of `image` into its own PNG.
///
/// Decoding and encoding run on the blocking pool.
pub async fn rasterize(image: &LoadedImage, rect: IntrinsicRect) -> Result<RegionBlob, OcrError> {
    let bytes = image.shared_bytes();

    tokio::task::spawn_blocking(move || crop_to_png(&bytes, rect))
        .await
        .map_err(|e| OcrError::ImageLoad(format!("rasterizer task failed: {e}")))?
}

/// Synchronous core of [`rasterize`]
pub fn crop_to_png(bytes: &[u8], rect: IntrinsicRect) -> Result<RegionBlob, OcrError> {
    let source = image::load_from_memory(bytes).map_err(|e| OcrError::ImageLoad(e.to_string()))?;

    // Surface is exactly the requested size, never zero
    let width = rect.width.max(1);
    let height = rect.height.max(1);
    let mut surface = RgbaImage::new(width, height);

    let region = imageops::crop_imm(&source, rect.left, rect.top, width, height).to_image();
    imageops::replace(&mut surface, &region, 0, 0);

    tracing::debug!(
        "rasterized {}x{} region at ({}, {})",
        width,
        height,
        rect.left,
        rect.top
    );

    Ok(RegionBlob {
        png: encode_png(&surface)?,
        width,
        height,
    })
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, OcrError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| OcrError::ImageLoad(format!("Failed to encode PNG: {e}")))?;
    Ok(buffer)
}
