use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageReader};
use imageproc::contrast::{ThresholdType, threshold};
use log::debug;

use crate::config::FrameOptions;

/// Binarization cutoff for the black/white variant.
const BINARY_THRESHOLD: u8 = 128;

/// Load the frame the detector will see: the color image, or a grayscale
/// (optionally binarized) variant with a read-through disk cache keyed by
/// the source file name.
pub fn load_frame(path: &Path, options: &FrameOptions) -> Result<DynamicImage> {
    if options.use_color {
        return decode(path);
    }

    let cached = options
        .cache_dir
        .as_deref()
        .zip(path.file_name())
        .map(|(dir, name)| dir.join(name));

    if let Some(cached) = &cached {
        if cached.exists() {
            debug!("using cached frame {}", cached.display());
            return decode(cached);
        }
    }

    let mut gray = decode(path)?.to_luma8();
    if options.use_binary {
        gray = threshold(&gray, BINARY_THRESHOLD, ThresholdType::Binary);
    }

    if let Some(cached) = &cached {
        if let Some(dir) = cached.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating cache directory {}", dir.display()))?;
        }
        gray.save(cached)
            .with_context(|| format!("writing cached frame {}", cached.display()))?;
    }

    Ok(DynamicImage::ImageLuma8(gray))
}

fn decode(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .decode()
        .with_context(|| format!("decoding {}", path.display()))
}
