pub mod ocr;
pub mod preprocessing;

use image::DynamicImage;

use crate::models::TextDetection;

/// Seam to the external text-detection engine. One call per frame; the
/// output order is the engine's reading order and is preserved all the
/// way through the filter chain.
pub trait TextDetector: Send + Sync {
    fn detect_text(&self, image: &DynamicImage) -> anyhow::Result<Vec<TextDetection>>;
}
