use std::fmt;

use log::debug;

use crate::config::{MaskConfig, TextDirection};
use crate::models::{FrameInfo, TextDetection};

/// Why a detection was dropped by the filter chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    Orientation,
    AreaRatio { pct: f64 },
    Position,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Orientation => {
                write!(f, "box orientation does not match the text direction")
            }
            RejectReason::AreaRatio { pct } => {
                write!(f, "area ratio {pct:.3}% is outside the configured range")
            }
            RejectReason::Position => {
                write!(f, "box does not touch the requested edges or corners")
            }
        }
    }
}

/// Apply the orientation, area-ratio and position checks in order. The
/// first failed check rejects the detection.
pub fn check_detection(
    detection: &TextDetection,
    frame: &FrameInfo,
    config: &MaskConfig,
    xpad: u32,
    ypad: u32,
) -> Result<(), RejectReason> {
    let rect = &detection.rect;

    // Square boxes carry no orientation and always pass.
    let square = rect.width() == rect.height();
    let horizontal = rect.width() > rect.height();
    match config.direction {
        TextDirection::Horizontal if !horizontal && !square => {
            return Err(RejectReason::Orientation);
        }
        TextDirection::Vertical if horizontal && !square => {
            return Err(RejectReason::Orientation);
        }
        _ => {}
    }

    let pct = rect.area_ratio(frame.total_area());
    if pct < config.min_area || pct > config.max_area {
        return Err(RejectReason::AreaRatio { pct });
    }

    if config.edges {
        if !rect.touches_edges(frame.width, frame.height, xpad, ypad) {
            return Err(RejectReason::Position);
        }
    } else if config.corners && !rect.touches_corners(frame.width, frame.height, xpad, ypad) {
        return Err(RejectReason::Position);
    }

    Ok(())
}

/// Run the chain over the raw detector output, logging every rejection
/// with its reason. Survivors keep their original order.
pub fn filter_detections(
    detections: &[TextDetection],
    frame: &FrameInfo,
    config: &MaskConfig,
    xpad: u32,
    ypad: u32,
) -> Vec<TextDetection> {
    let mut candidates = Vec::new();
    for detection in detections {
        match check_detection(detection, frame, config, xpad, ypad) {
            Ok(()) => candidates.push(detection.clone()),
            Err(reason) => debug!(
                "dropping {:?} at {:?}: {}",
                detection.text, detection.rect, reason
            ),
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn det(x1: u32, y1: u32, x2: u32, y2: u32) -> TextDetection {
        TextDetection {
            rect: Rect::new(x1, y1, x2, y2),
            text: String::from("text"),
            confidence: 0.9,
        }
    }

    fn frame() -> FrameInfo {
        FrameInfo::new(100, 100)
    }

    fn config() -> MaskConfig {
        MaskConfig {
            min_area: 0.1,
            max_area: 50.0,
            ..MaskConfig::default()
        }
    }

    #[test]
    fn square_boxes_pass_either_orientation() {
        let square = det(10, 10, 30, 30);
        for direction in [
            TextDirection::Horizontal,
            TextDirection::Vertical,
            TextDirection::Any,
        ] {
            let config = MaskConfig {
                direction,
                ..config()
            };
            assert_eq!(check_detection(&square, &frame(), &config, 0, 0), Ok(()));
        }
    }

    #[test]
    fn orientation_mismatch_is_rejected_first() {
        let tall = det(0, 0, 10, 40);
        let config = config();
        assert_eq!(
            check_detection(&tall, &frame(), &config, 0, 0),
            Err(RejectReason::Orientation)
        );

        let wide = det(0, 0, 40, 10);
        let vertical = MaskConfig {
            direction: TextDirection::Vertical,
            ..config
        };
        assert_eq!(
            check_detection(&wide, &frame(), &vertical, 0, 0),
            Err(RejectReason::Orientation)
        );
    }

    #[test]
    fn area_bounds_are_inclusive() {
        // 10x10 on 100x100 is exactly 1%.
        let one_percent = det(0, 0, 10, 10);
        let exact_min = MaskConfig {
            min_area: 1.0,
            ..config()
        };
        assert_eq!(check_detection(&one_percent, &frame(), &exact_min, 0, 0), Ok(()));

        let exact_max = MaskConfig {
            max_area: 1.0,
            ..config()
        };
        assert_eq!(check_detection(&one_percent, &frame(), &exact_max, 0, 0), Ok(()));

        let too_small = MaskConfig {
            min_area: 1.5,
            ..config()
        };
        assert!(matches!(
            check_detection(&one_percent, &frame(), &too_small, 0, 0),
            Err(RejectReason::AreaRatio { .. })
        ));
    }

    #[test]
    fn degenerate_range_rejects_everything() {
        let config = MaskConfig {
            min_area: 50.0,
            max_area: 10.0,
            ..config()
        };
        let candidates =
            filter_detections(&[det(0, 0, 10, 10), det(0, 0, 40, 40)], &frame(), &config, 0, 0);
        assert!(candidates.is_empty());
    }

    #[test]
    fn edges_mode_keeps_only_border_boxes() {
        let config = MaskConfig {
            edges: true,
            ..config()
        };
        let border = det(0, 45, 20, 55);
        let center = det(40, 45, 60, 55);
        assert_eq!(check_detection(&border, &frame(), &config, 5, 5), Ok(()));
        assert_eq!(
            check_detection(&center, &frame(), &config, 5, 5),
            Err(RejectReason::Position)
        );
    }

    #[test]
    fn corners_mode_requires_an_inset_corner_point() {
        let config = MaskConfig {
            corners: true,
            ..config()
        };
        let corner = det(0, 0, 20, 20);
        let edge_only = det(40, 0, 60, 10);
        assert_eq!(check_detection(&corner, &frame(), &config, 5, 5), Ok(()));
        assert_eq!(
            check_detection(&edge_only, &frame(), &config, 5, 5),
            Err(RejectReason::Position)
        );
    }

    #[test]
    fn survivors_keep_detector_order() {
        let detections = [det(0, 0, 20, 10), det(0, 0, 10, 40), det(30, 30, 60, 45)];
        let candidates = filter_detections(&detections, &frame(), &config(), 0, 0);
        // The tall middle box is dropped, order of the rest is unchanged.
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].rect, detections[0].rect);
        assert_eq!(candidates[1].rect, detections[2].rect);
    }
}
