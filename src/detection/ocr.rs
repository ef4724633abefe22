use std::path::Path;

use anyhow::Result;
use image::DynamicImage;
use log::debug;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams, TextItem};
use rten::Model;

use crate::detection::TextDetector;
use crate::models::TextDetection;

/// Text detection backed by the ocrs engine, with models loaded from the
/// standard cache location.
pub struct OcrsDetector {
    engine: OcrEngine,
}

impl OcrsDetector {
    /// Initialize the engine with models from the standard cache location.
    pub fn new() -> Result<OcrsDetector> {
        let home_dir = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;

        let cache_dir = Path::new(&home_dir).join(".cache/ocrs");
        let detection_model_path = cache_dir.join("text-detection.rten");
        let recognition_model_path = cache_dir.join("text-recognition.rten");

        if !detection_model_path.exists() || !recognition_model_path.exists() {
            anyhow::bail!(
                "OCR models not found. Please run: ocrs-cli --help (or download models manually)\n\
                 Expected locations:\n  - {}\n  - {}",
                detection_model_path.display(),
                recognition_model_path.display()
            );
        }

        let detection_model = Model::load_file(&detection_model_path)?;
        let recognition_model = Model::load_file(&recognition_model_path)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })?;

        Ok(OcrsDetector { engine })
    }
}

impl TextDetector for OcrsDetector {
    fn detect_text(&self, image: &DynamicImage) -> Result<Vec<TextDetection>> {
        let rgb = image.to_rgb8();
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())?;
        let input = self.engine.prepare_input(source)?;

        let word_rects = self.engine.detect_words(&input)?;
        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        let lines = self.engine.recognize_text(&input, &line_rects)?;

        let mut detections = Vec::new();
        for line in lines.into_iter().flatten() {
            let text = line.to_string();
            if text.trim().is_empty() {
                continue;
            }
            let corners = line.rotated_rect().corners();
            let quad = [
                (corners[0].x, corners[0].y),
                (corners[1].x, corners[1].y),
                (corners[2].x, corners[2].y),
                (corners[3].x, corners[3].y),
            ];
            // recognize_text does not report a per-line confidence; keep a
            // fixed placeholder until the detailed API is wired up.
            detections.push(TextDetection::from_corners(quad, text.trim(), 0.9));
        }
        debug!("detector returned {} text line(s)", detections.len());
        Ok(detections)
    }
}
