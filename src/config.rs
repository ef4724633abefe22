use std::path::PathBuf;

use anyhow::bail;
use clap::ValueEnum;
use log::warn;

use crate::models::FrameInfo;

/// Orientation constraint applied to detected boxes. Square boxes pass
/// either constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextDirection {
    Horizontal,
    Vertical,
    Any,
}

/// How frames are handed to the detector.
#[derive(Debug, Clone)]
pub struct FrameOptions {
    /// Detect on the color frame instead of a grayscale variant.
    pub use_color: bool,
    /// Threshold the grayscale variant to pure black/white.
    pub use_binary: bool,
    /// Directory for the read-through grayscale cache, when enabled.
    pub cache_dir: Option<PathBuf>,
}

impl Default for FrameOptions {
    fn default() -> FrameOptions {
        FrameOptions {
            use_color: true,
            use_binary: false,
            cache_dir: None,
        }
    }
}

/// Every recognized masking option with its default. Built once per batch
/// and passed read-only into each pipeline stage.
#[derive(Debug, Clone)]
pub struct MaskConfig {
    pub direction: TextDirection,
    /// Minimum box area as a percentage of the frame.
    pub min_area: f64,
    /// Maximum box area as a percentage of the frame. Also bounds the
    /// pairwise unions in the containment search.
    pub max_area: f64,
    /// Keep only boxes touching the image edges.
    pub edges: bool,
    /// Keep only boxes containing an inset image corner. Ignored when
    /// `edges` is set.
    pub corners: bool,
    /// Horizontal detect padding; `None` resolves to 5% of the frame width.
    pub xpad_detect: Option<u32>,
    /// Vertical detect padding; `None` resolves to 5% of the frame height.
    pub ypad_detect: Option<u32>,
    /// Horizontal padding added to drawn boxes.
    pub xpad_box: u32,
    /// Vertical padding added to drawn boxes.
    pub ypad_box: u32,
    /// Draw only the single largest candidate.
    pub only_largest: bool,
    /// Require each surviving region to be part of a pairwise union under
    /// `max_area`.
    pub contain: bool,
    /// With `contain`: paint the winning union rectangle itself.
    pub draw_contain: bool,
    /// With `draw_contain`: only paint the union while the accumulated
    /// masked area is still under `min_total_area`.
    pub contain_under_min: bool,
    /// Minimum accumulated masked area required to persist a mask.
    pub min_total_area: f64,
    /// Boxes kept by the corner-proximity fallback.
    pub keep_boxes: usize,
    /// Upper bound on enumerated box pairs in the containment search.
    pub max_combinations: usize,
    /// Write a sidecar .txt with one recognized-text line per detection.
    pub include_textfile: bool,
    /// Overwrite existing mask files.
    pub overwrite: bool,
    pub frame: FrameOptions,
}

impl Default for MaskConfig {
    fn default() -> MaskConfig {
        MaskConfig {
            direction: TextDirection::Horizontal,
            min_area: 0.1,
            max_area: 10.0,
            edges: false,
            corners: false,
            xpad_detect: None,
            ypad_detect: None,
            xpad_box: 0,
            ypad_box: 0,
            only_largest: false,
            contain: false,
            draw_contain: false,
            contain_under_min: false,
            min_total_area: 0.1,
            keep_boxes: 1,
            max_combinations: 1 << 15,
            include_textfile: false,
            overwrite: false,
            frame: FrameOptions::default(),
        }
    }
}

impl MaskConfig {
    /// Reject structurally nonsensical values. A `min_area` above
    /// `max_area` is only warned about: every box fails the ratio filter
    /// and the affected images become silent no-ops.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.keep_boxes == 0 {
            bail!("keep-boxes must be at least 1");
        }
        if self.max_combinations == 0 {
            bail!("max-combinations must be at least 1");
        }
        for (name, value) in [
            ("min-area", self.min_area),
            ("max-area", self.max_area),
            ("min-total-area", self.min_total_area),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{name} must be a non-negative number, got {value}");
            }
        }
        if self.min_area > self.max_area {
            warn!(
                "min-area ({}) is above max-area ({}); every detection will be filtered out",
                self.min_area, self.max_area
            );
        }
        if self.only_largest && self.contain {
            warn!("only-largest is ignored when contain is set");
        }
        Ok(())
    }

    /// Detect padding, defaulting to 5% of the frame dimension when unset.
    pub fn resolve_pads(&self, frame: &FrameInfo) -> (u32, u32) {
        let xpad = self
            .xpad_detect
            .unwrap_or((frame.width as f64 * 0.05) as u32);
        let ypad = self
            .ypad_detect
            .unwrap_or((frame.height as f64 * 0.05) as u32);
        (xpad, ypad)
    }
}
