pub mod batch;
pub mod config;
pub mod detection;
pub mod geometry;
pub mod mask;
pub mod models;

pub use batch::{BatchSummary, ImageOutcome};
pub use config::{FrameOptions, MaskConfig, TextDirection};
pub use detection::TextDetector;
pub use geometry::Rect;
pub use mask::MaskCanvas;
pub use models::{FrameInfo, TextDetection};
