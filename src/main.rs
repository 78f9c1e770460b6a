//! chromafy CLI - colorize grayscale photographs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chromafy::image::{save_gray, save_rgb};
use chromafy::{Config, EnhanceConfig, ModelPaths, Pipeline, Studio};

/// Colorize a grayscale photograph with a pretrained model.
#[derive(Parser, Debug)]
#[command(name = "chromafy")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path (PNG, JPEG or BMP).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the colorized image.
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Also write the sharpened image here.
    #[arg(long, value_name = "PATH")]
    enhanced: Option<PathBuf>,

    /// Also write the edge map here.
    #[arg(long, value_name = "PATH")]
    edges: Option<PathBuf>,

    /// Directory holding colorization.onnx, colorization.onnx_data and pts_in_hull.npy.
    #[arg(long, value_name = "DIR")]
    models: Option<PathBuf>,

    /// Override the network graph path.
    #[arg(long, value_name = "PATH")]
    network: Option<PathBuf>,

    /// Override the network weights path (must sit beside the graph).
    #[arg(long, value_name = "PATH")]
    weights: Option<PathBuf>,

    /// Override the cluster-centre table path.
    #[arg(long, value_name = "PATH")]
    points: Option<PathBuf>,

    /// Blur sigma of the unsharp mask.
    #[arg(long, default_value = "3.0", value_name = "FLOAT")]
    sigma: f32,

    /// Contrast gain applied after sharpening.
    #[arg(long, default_value = "1.2", value_name = "FLOAT")]
    gain: f32,

    /// Lower edge-detection threshold.
    #[arg(long, default_value = "100", value_name = "FLOAT")]
    canny_low: f32,

    /// Upper edge-detection threshold.
    #[arg(long, default_value = "200", value_name = "FLOAT")]
    canny_high: f32,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT", value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn model_paths(&self) -> ModelPaths {
        let mut paths = self
            .models
            .as_ref()
            .map_or_else(ModelPaths::default, ModelPaths::in_dir);

        if let Some(network) = &self.network {
            paths.network.clone_from(network);
        }
        if let Some(weights) = &self.weights {
            paths.weights.clone_from(weights);
        }
        if let Some(points) = &self.points {
            paths.points.clone_from(points);
        }

        paths
    }

    fn config(&self) -> Config {
        Config {
            models: self.model_paths(),
            enhance: EnhanceConfig {
                blur_sigma: self.sigma,
                gain: self.gain,
                canny_low: self.canny_low,
                canny_high: self.canny_high,
                ..EnhanceConfig::default()
            },
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chromafy={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    // Validate input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let config = args.config();
    config.validate().context("Invalid enhancement settings")?;

    // Model loading is fatal on failure; nothing below runs without it.
    let pipeline = Pipeline::new(config).context("Failed to load colorization model")?;
    let mut studio = Studio::new(pipeline);

    let colorized = studio
        .open(&args.input)
        .with_context(|| format!("Failed to colorize {}", args.input.display()))?;
    save_rgb(colorized.as_rgb(), &args.output, args.quality).context("Failed to save colorized image")?;
    println!("Colorized {} -> {}", args.input.display(), args.output.display());

    if args.enhanced.is_none() && args.edges.is_none() {
        return Ok(());
    }

    let enhancement = studio.enhance().context("Failed to enhance image")?;

    if let Some(path) = &args.enhanced {
        save_rgb(&enhancement.image, path, args.quality).context("Failed to save enhanced image")?;
        println!("Enhanced image -> {}", path.display());
    }

    if let Some(path) = &args.edges {
        save_gray(&enhancement.edges, path, args.quality).context("Failed to save edge map")?;
        println!("Edge map -> {}", path.display());
    }

    Ok(())
}
