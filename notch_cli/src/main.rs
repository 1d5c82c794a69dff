//! notch CLI - suppress periodic-noise peaks in FFT magnitude spectrum images.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use notch::prelude::*;

#[derive(Parser)]
#[command(name = "notch")]
#[command(about = "Detect and mask periodic-noise peaks in spectrum images")]
#[command(version)]
struct Cli {
    /// Base log level; RUST_LOG overrides it.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Also write rolling log files to this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect peaks automatically and notch them out.
    Auto(AutoArgs),

    /// Notch out a user-supplied list of points.
    Manual(ManualArgs),
}

#[derive(Debug, Clone, Args)]
struct BatchArgs {
    /// Spectrum images forming the batch (all frames are processed independently).
    #[arg(long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Directory for output images.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct AutoArgs {
    #[command(flatten)]
    batch: BatchArgs,

    /// JSON file with an automatic-mode configuration; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Peak threshold relative to the frame maximum [0.05, 1.0].
    #[arg(long)]
    threshold_rel: Option<f32>,

    /// Minimum distance between peaks in pixels [2, 200].
    #[arg(long)]
    min_distance: Option<usize>,

    /// Notch radius in pixels [1, 100].
    #[arg(long)]
    notch_radius: Option<u32>,

    /// Ignore peaks within this radius of the centre [0, 200].
    #[arg(long)]
    protect_dc: Option<u32>,

    /// Gaussian sigma for soft mask edges [0, 20].
    #[arg(long)]
    feather: Option<f32>,
}

impl AutoArgs {
    fn to_config(&self) -> Result<AutoNotchConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => AutoNotchConfig::default(),
        };
        if let Some(v) = self.threshold_rel {
            config.threshold_rel = v;
        }
        if let Some(v) = self.min_distance {
            config.min_distance = v;
        }
        if let Some(v) = self.notch_radius {
            config.notch_radius = v;
        }
        if let Some(v) = self.protect_dc {
            config.protect_dc = v;
        }
        if let Some(v) = self.feather {
            config.feather = v;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
struct ManualArgs {
    #[command(flatten)]
    batch: BatchArgs,

    /// Points as a JSON array of {"x","y","r"} objects, or @path to read them from a file.
    #[arg(long, default_value = "[]")]
    points: String,

    /// Gaussian sigma for soft mask edges [0, 20].
    #[arg(long, default_value_t = 2.0)]
    feather: f32,

    /// Always suppress a disk of this radius at the centre [0, 200].
    #[arg(long, default_value_t = 0)]
    protect_dc: u32,

    /// Where to export the preview image (defaults to the system temp directory).
    #[arg(long)]
    preview_dir: Option<PathBuf>,
}

fn read_config(path: &Path) -> Result<AutoNotchConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_batch(inputs: &[PathBuf]) -> Result<Vec<Frame>> {
    inputs
        .iter()
        .map(|path| Frame::from_file(path).with_context(|| format!("Loading {}", path.display())))
        .collect()
}

/// `name.png` for a single frame, `name_<index>.png` for batches.
fn output_path(dir: &Path, name: &str, index: usize, count: usize) -> PathBuf {
    if count == 1 {
        dir.join(format!("{name}.png"))
    } else {
        dir.join(format!("{name}_{index}.png"))
    }
}

fn save_frames(dir: &Path, name: &str, frames: &[Frame]) -> Result<()> {
    for (i, frame) in frames.iter().enumerate() {
        let path = output_path(dir, name, i, frames.len());
        frame
            .save_png(&path)
            .with_context(|| format!("Writing {}", path.display()))?;
    }
    Ok(())
}

fn run_auto(args: &AutoArgs) -> Result<()> {
    let config = args.to_config()?;
    let auto = AutoNotch::from_config(config)?;
    let frames = load_batch(&args.batch.inputs)?;

    let output = auto.process(&frames)?;

    let out_dir = &args.batch.out_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Creating {}", out_dir.display()))?;
    save_frames(out_dir, "filtered", &output.filtered)?;
    save_frames(out_dir, "mask", &output.masks)?;
    save_frames(out_dir, "preview", &output.previews)?;

    let peaks_path = out_dir.join("peaks.json");
    std::fs::write(&peaks_path, output.peak_positions_json())
        .with_context(|| format!("Writing {}", peaks_path.display()))?;

    tracing::info!(
        "Wrote {} frames and {} to {}",
        output.filtered.len(),
        peaks_path.display(),
        out_dir.display()
    );
    Ok(())
}

fn run_manual(args: &ManualArgs) -> Result<()> {
    let points_json = match args.points.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read points from {path}"))?,
        None => args.points.clone(),
    };

    let mut manual = ManualNotch::from_config(ManualNotchConfig {
        feather: args.feather,
        protect_dc: args.protect_dc,
    })?;
    if let Some(dir) = &args.preview_dir {
        manual = manual.with_preview_dir(dir);
    }

    let frames = load_batch(&args.batch.inputs)?;
    let output = manual.process_json(&frames, &points_json)?;

    let out_dir = &args.batch.out_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Creating {}", out_dir.display()))?;
    save_frames(out_dir, "filtered", &output.filtered)?;
    save_frames(out_dir, "mask", &output.masks)?;

    println!("{}", serde_json::to_string(&output.preview)?);
    tracing::info!(
        "Preview at {}",
        output.preview.path_in(manual.preview_dir()).display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::log_setup::setup_logging(&cli.log_level, cli.log_dir.as_deref());

    match &cli.command {
        Commands::Auto(args) => run_auto(args),
        Commands::Manual(args) => run_manual(args),
    }
}
