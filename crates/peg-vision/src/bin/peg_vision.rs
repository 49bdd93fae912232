//! peg-vision CLI: detect a peg target in a single image.

use clap::Parser;
use log::LevelFilter;
use peg_vision::core::{Hsv, HsvRange};
use peg_vision::detect::{detect_with, load_rgb};
use peg_vision::overlay::{render_overlay, DisplayMode};
use peg_vision::target::{PegTargetConfig, PegTargetReport};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "peg-vision")]
#[command(about = "Detect a two-strip retro-reflective peg target in an image")]
#[command(version)]
struct Cli {
    /// Input image; overrides `image_path` from the config.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON config (image path, HSV range, filter params, camera).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    hsv: HsvArgs,

    /// Where to write the JSON report; overrides `output_path` from the config.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write a debug rendering to this path.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Pipeline stage drawn into the overlay.
    #[arg(long, value_enum, default_value_t = DisplayMode::TargetsPlus)]
    mode: DisplayMode,

    /// Log level for the stderr logger.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Emit JSON tracing events instead of plain log lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_logs: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Per-channel HSV bound overrides.
#[derive(clap::Args, Debug, Default)]
struct HsvArgs {
    #[arg(long)]
    h_min: Option<u8>,
    #[arg(long)]
    h_max: Option<u8>,
    #[arg(long)]
    s_min: Option<u8>,
    #[arg(long)]
    s_max: Option<u8>,
    #[arg(long)]
    v_min: Option<u8>,
    #[arg(long)]
    v_max: Option<u8>,
}

impl HsvArgs {
    fn apply(&self, base: HsvRange) -> HsvRange {
        HsvRange {
            lower: Hsv::new(
                self.h_min.unwrap_or(base.lower.h),
                self.s_min.unwrap_or(base.lower.s),
                self.v_min.unwrap_or(base.lower.v),
            ),
            upper: Hsv::new(
                self.h_max.unwrap_or(base.upper.h),
                self.s_max.unwrap_or(base.upper.s),
                self.v_max.unwrap_or(base.upper.v),
            ),
        }
    }
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    let level = LevelFilter::from(cli.log_level);
    #[cfg(feature = "tracing")]
    peg_vision::core::init_tracing(level, cli.json_logs)?;
    #[cfg(not(feature = "tracing"))]
    peg_vision::core::init_with_level(level).map_err(|e| e.to_string())?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> CliResult<PegTargetConfig> {
    let mut cfg = match &cli.config {
        Some(path) => PegTargetConfig::load_json(path)?,
        None => {
            let image = cli
                .image
                .as_ref()
                .ok_or("either --image or --config is required")?;
            PegTargetConfig::for_image(image.to_string_lossy())
        }
    };
    if let Some(image) = &cli.image {
        cfg.image_path = image.to_string_lossy().into_owned();
    }
    if let Some(report) = &cli.report {
        cfg.output_path = Some(report.to_string_lossy().into_owned());
    }
    cfg.hsv = cli.hsv.apply(cfg.hsv);
    Ok(cfg)
}

fn timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let cfg = resolve_config(&cli)?;
    let detector = cfg.build_detector()?;
    let mut report = PegTargetReport::new(&cfg, cli.config.as_deref());
    let report_path = cfg.output_path();

    let img = match load_rgb(&cfg.image_path) {
        Ok(img) => img,
        Err(err) => {
            report.set_error(&err);
            report.write_json(&report_path)?;
            return Err(format!("failed to load {}: {err}", cfg.image_path).into());
        }
    };
    log::info!("loaded {} ({}x{})", cfg.image_path, img.width(), img.height());

    let detection = detect_with(&detector, &img, &cfg.hsv);

    if let Some(path) = &cli.overlay {
        render_overlay(&img, &detection, cli.mode).save(path)?;
        log::info!("overlay written to {}", path.display());
    }

    let frame = &detection.frame;
    match frame.best_target().and_then(|t| t.centroid().zip(t.metrics)) {
        Some((c, m)) => println!(
            "target at ({:.1}, {:.1}) size {}x{} | accepted={} rejected={}",
            c.x,
            c.y,
            m.width,
            m.height,
            frame.accepted.len(),
            frame.rejected.len()
        ),
        None => println!(
            "no target | accepted={} rejected={} contours={}",
            frame.accepted.len(),
            frame.rejected.len(),
            detection.contours.len()
        ),
    }

    report.set_frame(
        detection.contours.len(),
        detection.frame,
        &cfg.camera(),
        timestamp_ns(),
    );
    report.write_json(&report_path)?;
    log::info!("report written to {}", report_path.display());
    Ok(())
}
