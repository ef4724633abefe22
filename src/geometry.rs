use std::cmp::{max, min};

/// Axis-aligned rectangle in pixel coordinates. `x1 <= x2` and `y1 <= y2`
/// by construction; `x2`/`y2` are exclusive. Zero-area rectangles are
/// allowed and fail the area filters on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rect {
    /// Create a rectangle from two corner points, normalizing their order.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Rect {
        Rect {
            x1: min(x1, x2),
            y1: min(y1, y2),
            x2: max(x1, x2),
            y2: max(y1, y2),
        }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: min(self.x1, other.x1),
            y1: min(self.y1, other.y1),
            x2: max(self.x2, other.x2),
            y2: max(self.y2, other.y2),
        }
    }

    /// Rectangle area as a percentage of `total_area`.
    pub fn area_ratio(&self, total_area: u64) -> f64 {
        if total_area == 0 {
            return 0.0;
        }
        self.area() as f64 / total_area as f64 * 100.0
    }

    /// Squared distance from the top-left corner to the image origin.
    /// Only used to rank boxes in the corner-proximity fallback.
    pub fn corner_distance_sq(&self) -> u64 {
        self.x1 as u64 * self.x1 as u64 + self.y1 as u64 * self.y1 as u64
    }

    /// True if any side lies within the detect padding of the image border.
    pub fn touches_edges(&self, width: u32, height: u32, xpad: u32, ypad: u32) -> bool {
        self.x1 <= xpad
            || self.y1 <= ypad
            || self.x2 >= width.saturating_sub(xpad)
            || self.y2 >= height.saturating_sub(ypad)
    }

    /// True if the rectangle contains at least one of the four image
    /// corner points, each inset by the detect padding.
    pub fn touches_corners(&self, width: u32, height: u32, xpad: u32, ypad: u32) -> bool {
        let corners = [
            (xpad, ypad),
            (width.saturating_sub(xpad), ypad),
            (xpad, height.saturating_sub(ypad)),
            (width.saturating_sub(xpad), height.saturating_sub(ypad)),
        ];
        corners.iter().any(|&(cx, cy)| self.contains_point(cx, cy))
    }

    fn contains_point(&self, x: u32, y: u32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// Grow by the box padding, clamped to the image bounds.
    pub fn padded(&self, xpad: u32, ypad: u32, width: u32, height: u32) -> Rect {
        Rect {
            x1: self.x1.saturating_sub(xpad),
            y1: self.y1.saturating_sub(ypad),
            x2: (self.x2 + xpad).min(width),
            y2: (self.y2 + ypad).min(height),
        }
    }

    /// Expand every side lying within the detect padding out to the image
    /// border, so border text fills the border it touches.
    pub fn snapped_to_edges(&self, width: u32, height: u32, xpad: u32, ypad: u32) -> Rect {
        let mut snapped = *self;
        if self.x1 <= xpad {
            snapped.x1 = 0;
        }
        if self.y1 <= ypad {
            snapped.y1 = 0;
        }
        if self.x2 >= width.saturating_sub(xpad) {
            snapped.x2 = width;
        }
        if self.y2 >= height.saturating_sub(ypad) {
            snapped.y2 = height;
        }
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_corner_order() {
        assert_eq!(Rect::new(10, 20, 3, 4), Rect::new(3, 4, 10, 20));
    }

    #[test]
    fn union_is_at_least_as_large_as_both_inputs() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(40, 5, 60, 25);
        let u = a.union(&b);
        assert!(u.area() >= a.area());
        assert!(u.area() >= b.area());
        assert_eq!(u, Rect::new(0, 0, 60, 25));
    }

    #[test]
    fn area_ratio_is_percent_of_total() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.area_ratio(10_000), 1.0);
        assert_eq!(r.area_ratio(0), 0.0);
    }

    #[test]
    fn touches_edges_is_monotonic_in_padding() {
        let r = Rect::new(40, 40, 60, 60);
        let mut touched = false;
        for pad in [0, 10, 20, 39, 40, 50] {
            let now = r.touches_edges(100, 100, pad, pad);
            // Once a padding makes the box touch, every larger padding must too.
            assert!(!touched || now);
            touched = now;
        }
        assert!(touched);
        assert!(!r.touches_edges(100, 100, 39, 39));
        assert!(r.touches_edges(100, 100, 40, 40));
    }

    #[test]
    fn touches_corners_grows_with_padding_toward_the_box() {
        let near_origin = Rect::new(0, 0, 30, 30);
        for pad in [0, 10, 20, 30] {
            assert!(near_origin.touches_corners(100, 100, pad, pad));
        }
        let center = Rect::new(50, 50, 60, 60);
        assert!(!center.touches_corners(100, 100, 0, 0));
        assert!(center.touches_corners(100, 100, 50, 50));
    }

    #[test]
    fn padded_clamps_to_image_bounds() {
        let r = Rect::new(2, 2, 98, 98);
        assert_eq!(r.padded(5, 5, 100, 100), Rect::new(0, 0, 100, 100));
        assert_eq!(r.padded(0, 0, 100, 100), r);
    }

    #[test]
    fn snapped_to_edges_extends_only_touching_sides() {
        let r = Rect::new(3, 50, 97, 60);
        assert_eq!(r.snapped_to_edges(100, 100, 5, 5), Rect::new(0, 50, 100, 60));
        // A centered box is left alone.
        let c = Rect::new(40, 40, 60, 60);
        assert_eq!(c.snapped_to_edges(100, 100, 5, 5), c);
    }

    #[test]
    fn corner_distance_orders_by_proximity_to_origin() {
        let near = Rect::new(0, 0, 20, 20);
        let far = Rect::new(80, 80, 100, 100);
        assert!(near.corner_distance_sq() < far.corner_distance_sq());
    }
}
