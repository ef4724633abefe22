use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use log::{debug, error, info};

use crate::config::MaskConfig;
use crate::detection::preprocessing;
use crate::detection::TextDetector;
use crate::geometry::Rect;
use crate::mask::canvas::MaskCanvas;
use crate::mask::filter;
use crate::mask::select::{self, Containment};
use crate::models::{FrameInfo, TextDetection};

/// What happened to one image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// Mask written, with the accumulated area percentage.
    Masked { pct: f64 },
    /// Output already existed and overwriting is off; the detector was
    /// never invoked.
    SkippedExisting,
    /// The detector found no text.
    NoDetections,
    /// Every detection was filtered out.
    NothingToDraw,
    /// Something was drawn but the accumulated area stayed under the
    /// minimum.
    BelowThreshold { pct: f64 },
}

/// Counts for a whole batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub masked: usize,
    pub skipped: usize,
    pub failed: usize,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Collect the images in `dir`, in name order.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if path.is_file() && ext.as_deref().is_some_and(|e| IMAGE_EXTENSIONS.contains(&e)) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Run the full pipeline for one image: detect, filter, select, composite,
/// and persist if the area gate passes.
pub fn process_image(
    detector: &dyn TextDetector,
    image_path: &Path,
    out_dir: &Path,
    config: &MaskConfig,
) -> Result<ImageOutcome> {
    let file_name = image_path
        .file_name()
        .context("image path has no file name")?;
    let name = file_name.to_string_lossy();

    let mask_path = out_dir.join(file_name);
    if mask_path.exists() && !config.overwrite {
        debug!("mask already exists for {name}, skipping");
        return Ok(ImageOutcome::SkippedExisting);
    }

    let image = preprocessing::load_frame(image_path, &config.frame)?;
    let frame = FrameInfo::new(image.width(), image.height());

    let detections = detector.detect_text(&image)?;
    if detections.is_empty() {
        info!("no text detected in {name}");
        return Ok(ImageOutcome::NoDetections);
    }

    let (xpad, ypad) = config.resolve_pads(&frame);
    let candidates = filter::filter_detections(&detections, &frame, config, xpad, ypad);
    if candidates.is_empty() {
        info!("no candidate boxes left for {name} after filtering");
        return Ok(ImageOutcome::NothingToDraw);
    }

    // In edges mode a box is stretched out to the border it touches before
    // being painted; the account always uses the raw detection area.
    let draw_rects: Vec<Rect> = candidates
        .iter()
        .map(|c| {
            if config.edges {
                c.rect.snapped_to_edges(frame.width, frame.height, xpad, ypad)
            } else {
                c.rect
            }
        })
        .collect();

    let mut canvas = MaskCanvas::new(frame);

    if config.only_largest && !config.contain {
        if let Some(i) = select::largest_candidate(&candidates) {
            let pct = candidates[i].rect.area_ratio(frame.total_area());
            canvas.paint_detection(&draw_rects[i], pct, config.xpad_box, config.ypad_box);
        }
    } else {
        for (candidate, draw_rect) in candidates.iter().zip(&draw_rects) {
            let pct = candidate.rect.area_ratio(frame.total_area());
            canvas.paint_detection(draw_rect, pct, config.xpad_box, config.ypad_box);
        }
    }

    if config.contain && candidates.len() >= 2 {
        match select::containment_search(
            &candidates,
            frame.total_area(),
            config.max_area,
            config.keep_boxes,
            config.max_combinations,
        ) {
            Containment::Union { rect, pct } => {
                debug!("clipping {name} to a union covering {pct:.3}%");
                canvas.clip_outside(&rect);
                if config.draw_contain
                    && (!config.contain_under_min || canvas.masked_pct() < config.min_total_area)
                {
                    canvas.paint_union(&rect);
                }
            }
            Containment::Fallback { keep, erase } => {
                debug!(
                    "no pair union fits under {}% for {name}; keeping the {} box(es) closest to the origin",
                    config.max_area,
                    keep.len()
                );
                for i in erase {
                    canvas.erase_detection(&draw_rects[i], config.xpad_box, config.ypad_box);
                }
            }
        }
    }

    if !canvas.should_persist(config.min_total_area) {
        info!(
            "skipping {name}: masked area {:.3}% is under the {:.3}% minimum",
            canvas.masked_pct(),
            config.min_total_area
        );
        return Ok(ImageOutcome::BelowThreshold {
            pct: canvas.masked_pct(),
        });
    }

    canvas.save(&mask_path)?;
    if config.include_textfile {
        write_sidecar(&mask_path, &detections)?;
    }
    info!("masked {name} ({:.3}% of the frame)", canvas.masked_pct());
    Ok(ImageOutcome::Masked {
        pct: canvas.masked_pct(),
    })
}

/// One recognized-text line per raw detection, next to the mask.
fn write_sidecar(mask_path: &Path, detections: &[TextDetection]) -> Result<()> {
    let txt_path = mask_path.with_extension("txt");
    let mut file = fs::File::create(&txt_path)
        .with_context(|| format!("creating {}", txt_path.display()))?;
    for detection in detections {
        writeln!(file, "{}", detection.text)?;
    }
    Ok(())
}

/// Run the pipeline over `images` with a bounded worker pool. Workers
/// share only the detector and the read-only config; each owns the canvas
/// and candidate set of the image it is processing. A failed image is
/// counted and the batch moves on.
pub fn run_batch(
    detector: Arc<dyn TextDetector>,
    images: &[PathBuf],
    out_dir: &Path,
    config: &MaskConfig,
    jobs: usize,
) -> BatchSummary {
    let jobs = jobs.clamp(1, images.len().max(1));

    // The queue is filled up front and closed, so workers drain it and
    // stop on the disconnect.
    let (tx, rx) = mpsc::channel::<PathBuf>();
    for path in images {
        let _ = tx.send(path.clone());
    }
    drop(tx);
    let rx = Arc::new(Mutex::new(rx));

    let mut summary = BatchSummary::default();
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(jobs);
        for _ in 0..jobs {
            let rx = Arc::clone(&rx);
            let detector = Arc::clone(&detector);
            handles.push(scope.spawn(move || {
                let mut local = BatchSummary::default();
                while let Ok(path) = rx.lock().unwrap().recv() {
                    match process_image(detector.as_ref(), &path, out_dir, config) {
                        Ok(ImageOutcome::Masked { .. }) => local.masked += 1,
                        Ok(_) => local.skipped += 1,
                        Err(err) => {
                            error!("failed to process {}: {err:#}", path.display());
                            local.failed += 1;
                        }
                    }
                }
                local
            }));
        }
        for handle in handles {
            if let Ok(local) = handle.join() {
                summary.masked += local.masked;
                summary.skipped += local.skipped;
                summary.failed += local.failed;
            }
        }
    });
    summary
}
