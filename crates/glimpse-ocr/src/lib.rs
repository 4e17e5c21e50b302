mod rasterize;
mod source;
mod tesseract;

pub use rasterize::{RegionBlob, crop_to_png, rasterize};
pub use source::LoadedImage;
pub use tesseract::TesseractEngine;
