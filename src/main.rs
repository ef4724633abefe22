use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use log::info;

use textmask::batch;
use textmask::config::{FrameOptions, MaskConfig, TextDirection};
use textmask::detection::TextDetector;
use textmask::detection::ocr::OcrsDetector;

#[derive(Parser)]
#[command(name = "textmask")]
#[command(about = "Generate training masks from text regions detected in images")]
struct Cli {
    /// Path to the source directory of images
    #[arg(long)]
    path: PathBuf,

    /// Output directory for masks
    #[arg(long)]
    out: PathBuf,

    /// Write a sidecar .txt with the recognized text lines
    #[arg(long)]
    include_textfile: bool,

    /// Keep only boxes containing an (inset) image corner
    #[arg(long)]
    corners: bool,

    /// Keep only boxes touching the image edges
    #[arg(long)]
    edges: bool,

    /// Keep only the single largest detected box
    #[arg(long)]
    only_largest: bool,

    /// Overwrite existing mask files
    #[arg(long)]
    overwrite: bool,

    /// Horizontal padding for edge/corner detection (default: 5% of width)
    #[arg(long, value_name = "PX")]
    xpad_detect: Option<u32>,

    /// Vertical padding for edge/corner detection (default: 5% of height)
    #[arg(long, value_name = "PX")]
    ypad_detect: Option<u32>,

    /// Horizontal padding added to drawn boxes
    #[arg(long, value_name = "PX", default_value_t = 0)]
    xpad_box: u32,

    /// Vertical padding added to drawn boxes
    #[arg(long, value_name = "PX", default_value_t = 0)]
    ypad_box: u32,

    /// Minimum box area as a percentage of the frame
    #[arg(long, default_value_t = 0.1)]
    min_area: f64,

    /// Maximum box area as a percentage of the frame
    #[arg(long, default_value_t = 10.0)]
    max_area: f64,

    /// Run detection on a grayscale variant instead of the color frame
    #[arg(long)]
    grayscale: bool,

    /// Cache grayscale variants on disk next to the source directory
    #[arg(long)]
    use_cache: bool,

    /// Threshold the grayscale variant to pure black/white
    #[arg(long)]
    use_binary: bool,

    /// Orientation of text boxes to keep
    #[arg(long, value_enum, default_value_t = TextDirection::Horizontal)]
    text_direction: TextDirection,

    /// Minimum accumulated masked area (percent) required to write a mask
    #[arg(long, default_value_t = 0.1)]
    min_total_area: f64,

    /// Suppress false positives by requiring a pairwise union under --max-area
    #[arg(long)]
    contain: bool,

    /// With --contain: paint the winning union rectangle itself
    #[arg(long)]
    draw_contain: bool,

    /// With --draw-contain: only paint the union while the accumulated
    /// area is under --min-total-area
    #[arg(long)]
    contain_under_min: bool,

    /// Boxes kept by the corner-proximity fallback
    #[arg(long, default_value_t = 1)]
    keep_boxes: usize,

    /// Upper bound on enumerated box pairs in the containment search
    #[arg(long, default_value_t = 32768)]
    max_combinations: usize,

    /// Worker threads (default: one per CPU)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let cache_dir = args.use_cache.then(|| {
        let mut dir = args.path.as_os_str().to_os_string();
        dir.push("_grayscale_cache");
        PathBuf::from(dir)
    });

    let config = MaskConfig {
        direction: args.text_direction,
        min_area: args.min_area,
        max_area: args.max_area,
        edges: args.edges,
        corners: args.corners,
        xpad_detect: args.xpad_detect,
        ypad_detect: args.ypad_detect,
        xpad_box: args.xpad_box,
        ypad_box: args.ypad_box,
        only_largest: args.only_largest,
        contain: args.contain,
        draw_contain: args.draw_contain,
        contain_under_min: args.contain_under_min,
        min_total_area: args.min_total_area,
        keep_boxes: args.keep_boxes,
        max_combinations: args.max_combinations,
        include_textfile: args.include_textfile,
        overwrite: args.overwrite,
        frame: FrameOptions {
            use_color: !args.grayscale,
            use_binary: args.use_binary,
            cache_dir,
        },
    };
    config.validate()?;

    fs::create_dir_all(&args.out)?;

    let images = batch::list_images(&args.path)?;
    info!("processing {} image(s) from {}", images.len(), args.path.display());
    info!("output directory: {}", args.out.display());

    let detector: Arc<dyn TextDetector> = Arc::new(OcrsDetector::new()?);
    let jobs = args.jobs.unwrap_or_else(|| {
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    });

    let summary = batch::run_batch(detector, &images, &args.out, &config, jobs);
    info!(
        "done: {} masked, {} skipped, {} failed",
        summary.masked, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        anyhow::bail!("{} image(s) failed", summary.failed);
    }
    Ok(())
}
