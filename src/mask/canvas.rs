use std::path::Path;

use anyhow::Result;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;

use crate::geometry::Rect;
use crate::models::FrameInfo;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// White raster the selected regions are painted onto, together with the
/// running account of how much of the frame has been masked.
///
/// The account sums each drawn region's own area ratio at draw time:
/// overlapping draws double-count and erasures never subtract. Downstream
/// thresholds are tuned against this inflated metric, so it is kept as-is.
pub struct MaskCanvas {
    image: RgbImage,
    frame: FrameInfo,
    drawn: bool,
    masked_pct: f64,
}

impl MaskCanvas {
    pub fn new(frame: FrameInfo) -> MaskCanvas {
        MaskCanvas {
            image: RgbImage::from_pixel(frame.width, frame.height, WHITE),
            frame,
            drawn: false,
            masked_pct: 0.0,
        }
    }

    /// Paint a candidate box black with the box padding applied and add
    /// `area_pct` (the unpadded detection's ratio) to the running total.
    pub fn paint_detection(&mut self, rect: &Rect, area_pct: f64, xpad: u32, ypad: u32) {
        let padded = rect.padded(xpad, ypad, self.frame.width, self.frame.height);
        self.fill(&padded, BLACK);
        self.drawn = true;
        self.masked_pct += area_pct;
    }

    /// White out a previously painted candidate, padding included. The
    /// running total is left untouched.
    pub fn erase_detection(&mut self, rect: &Rect, xpad: u32, ypad: u32) {
        let padded = rect.padded(xpad, ypad, self.frame.width, self.frame.height);
        self.fill(&padded, WHITE);
    }

    /// White out the four border rectangles outside the containment union.
    pub fn clip_outside(&mut self, union: &Rect) {
        let (w, h) = (self.frame.width, self.frame.height);
        self.fill(&Rect::new(0, 0, w, union.y1), WHITE);
        self.fill(&Rect::new(0, union.y2.min(h), w, h), WHITE);
        self.fill(&Rect::new(0, union.y1, union.x1, union.y2.min(h)), WHITE);
        self.fill(&Rect::new(union.x2.min(w), union.y1, w, union.y2.min(h)), WHITE);
    }

    /// Paint the union rectangle itself. Its area does not contribute to
    /// the running total.
    pub fn paint_union(&mut self, union: &Rect) {
        self.fill(union, BLACK);
        self.drawn = true;
    }

    fn fill(&mut self, rect: &Rect, color: Rgb<u8>) {
        if rect.is_empty() {
            return;
        }
        let pixels = PixelRect::at(rect.x1 as i32, rect.y1 as i32).of_size(rect.width(), rect.height());
        draw_filled_rect_mut(&mut self.image, pixels, color);
    }

    pub fn was_drawn(&self) -> bool {
        self.drawn
    }

    pub fn masked_pct(&self) -> f64 {
        self.masked_pct
    }

    /// The persistence gate: something was drawn and the accumulated area
    /// reaches the minimum. Boundary equality persists.
    pub fn should_persist(&self, min_total_area: f64) -> bool {
        self.drawn && self.masked_pct >= min_total_area
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}
