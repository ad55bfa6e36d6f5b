use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Create an Android bootanimation from a .gif or a folder of images.
#[derive(Parser, Debug)]
#[command(name = "bootpack", version)]
struct Cli {
    /// GIF file, or folder with images (sorted by name, e.g. frame-001.png).
    source: PathBuf,

    /// Width of result images in pixels; use the device screen width.
    #[arg(allow_negative_numbers = true)]
    width: i64,

    /// Height of result images in pixels; use the device screen height.
    #[arg(allow_negative_numbers = true)]
    height: i64,

    /// Frames per second of the animation.
    #[arg(allow_negative_numbers = true)]
    fps: i64,

    /// Folder where result images are saved.
    save_to: PathBuf,

    /// Also create bootanimation.zip with the result images.
    #[arg(long)]
    zip: bool,

    /// Tolerance for detecting the background color (taken from pixel (0, 0)).
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    tolerance: i64,

    /// Colors count for result images.
    #[arg(long, default_value_t = 256, allow_negative_numbers = true)]
    colors: i64,

    /// Grid steps per axis when scanning for the crop box.
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    steps: i64,

    /// Normalize frames on a worker pool (output order is unchanged).
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,
}

impl Cli {
    fn into_config(self) -> bootpack::PackConfig {
        let mut cfg =
            bootpack::PackConfig::new(self.source, self.width, self.height, self.fps, self.save_to);
        cfg.zip = self.zip;
        cfg.tolerance = self.tolerance;
        cfg.colors = self.colors;
        cfg.steps = self.steps;
        cfg.threading.parallel = self.parallel;
        cfg.threading.threads = self.threads;
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = Cli::parse().into_config();

    let violations = cfg.violations();
    if !violations.is_empty() {
        for v in &violations {
            tracing::error!("{v}");
        }
        anyhow::bail!("{} invalid argument(s)", violations.len());
    }

    let stats = bootpack::assemble(&cfg)?;
    eprintln!("wrote {} frames to {}", stats.frames, cfg.save_to.display());
    if let Some(archive) = stats.archive {
        eprintln!("wrote {}", archive.display());
    }
    Ok(())
}
