use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageBuffer, Rgb};
use textmask::{Rect, TextDetection, TextDetector};

/// Creates a white test image of the given size at `path`.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([255u8, 255u8, 255u8]));
    img.save_with_format(path, image::ImageFormat::Png)
        .expect("Failed to save test image");
}

/// Creates a source directory holding one `sample.png` and an empty output
/// directory inside `root`. Returns the image path and the output directory.
pub fn sample_image_dirs(root: &Path, width: u32, height: u32) -> (PathBuf, PathBuf) {
    let src = root.join("images");
    let out = root.join("masks");
    std::fs::create_dir_all(&src).expect("Failed to create source directory");
    std::fs::create_dir_all(&out).expect("Failed to create output directory");
    let image_path = src.join("sample.png");
    write_test_image(&image_path, width, height);
    (image_path, out)
}

/// Detector stub returning a fixed set of boxes and counting invocations.
pub struct StubDetector {
    detections: Vec<TextDetection>,
    calls: AtomicUsize,
}

impl StubDetector {
    pub fn new(rects: &[(u32, u32, u32, u32)]) -> StubDetector {
        let detections = rects
            .iter()
            .enumerate()
            .map(|(i, &(x1, y1, x2, y2))| TextDetection {
                rect: Rect::new(x1, y1, x2, y2),
                text: format!("line {i}"),
                confidence: 0.9,
            })
            .collect();
        StubDetector {
            detections,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextDetector for StubDetector {
    fn detect_text(&self, _image: &image::DynamicImage) -> anyhow::Result<Vec<TextDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detections.clone())
    }
}
