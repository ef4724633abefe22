pub mod canvas;
pub mod filter;
pub mod select;

pub use canvas::MaskCanvas;
pub use filter::{RejectReason, check_detection, filter_detections};
pub use select::{Containment, containment_search, largest_candidate};
