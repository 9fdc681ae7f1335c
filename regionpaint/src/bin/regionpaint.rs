use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use flexi_logger::Logger;
use regionpaint::region::{DEFAULT_TOLERANCE, LabelOptions};
use regionpaint::threshold::{DEFAULT_THRESHOLD, ThresholdMethod};
use regionpaint::{Color, RegionKey, Session, SessionOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Find the enclosed regions of a line drawing and paint them.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log level or filter spec (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the paintable regions of an image
    Regions(LoadArgs),
    /// Recolor regions and write the result as PNG
    Paint {
        #[command(flatten)]
        load: LoadArgs,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Fill a region by key, e.g. `region3=#ff8800`
        #[arg(long, value_parser = parse_fill)]
        fill: Vec<(RegionKey, Color)>,

        /// Fill the region under a point, e.g. `10,20=red`
        #[arg(long, value_parser = parse_at, allow_hyphen_values = true)]
        at: Vec<((i64, i64), Color)>,
    },
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Input image (PNG, JPEG, BMP, GIF, ...)
    image: PathBuf,

    /// Binarize with Otsu's method instead of a fixed threshold
    #[arg(long, conflicts_with = "threshold")]
    otsu: bool,

    /// Fixed luminance threshold
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Per-channel tolerance for white background pixels
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: u8,
}

impl LoadArgs {
    fn options(&self) -> SessionOptions {
        let threshold = if self.otsu {
            ThresholdMethod::Otsu
        } else {
            ThresholdMethod::Fixed(self.threshold)
        };
        SessionOptions::default()
            .with_threshold(threshold)
            .with_label(LabelOptions::default().with_tolerance(self.tolerance))
    }

    fn open(&self) -> Result<Session> {
        let bytes = fs::read(&self.image)
            .with_context(|| format!("failed to read {}", self.image.display()))?;
        let mut session = Session::new(self.options());
        session
            .load(&bytes)
            .with_context(|| format!("failed to load {}", self.image.display()))?;
        Ok(session)
    }
}

fn split_assignment(s: &str) -> Result<(&str, Color), String> {
    let (lhs, rhs) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `<target>=<color>`, got {:?}", s))?;
    let color = rhs.parse::<Color>().map_err(|e| e.to_string())?;
    Ok((lhs.trim(), color))
}

fn parse_fill(s: &str) -> Result<(RegionKey, Color), String> {
    let (lhs, color) = split_assignment(s)?;
    let key = lhs.parse::<RegionKey>().map_err(|e| e.to_string())?;
    Ok((key, color))
}

fn parse_at(s: &str) -> Result<((i64, i64), Color), String> {
    let (lhs, color) = split_assignment(s)?;
    let (x, y) = lhs
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {:?}", lhs))?;
    let x = x.trim().parse::<i64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<i64>().map_err(|e| e.to_string())?;
    Ok(((x, y), color))
}

fn list_regions(load: &LoadArgs) -> Result<()> {
    let session = load.open()?;
    let Some(store) = session.store() else {
        bail!("no image loaded");
    };
    println!(
        "{}: {}x{}, {} regions",
        load.image.display(),
        store.width(),
        store.height(),
        store.len()
    );
    for (region, _) in store.iter() {
        let bounds = region
            .bounds()
            .map(|b| b.to_string())
            .unwrap_or_default();
        println!("{}\t{}\t{}", region.key(), region.len(), bounds);
    }
    Ok(())
}

fn paint(
    load: &LoadArgs,
    output: &Path,
    fills: &[(RegionKey, Color)],
    points: &[((i64, i64), Color)],
) -> Result<()> {
    let mut session = load.open()?;

    for &(key, color) in fills {
        session
            .pick(key, color)
            .with_context(|| format!("cannot fill {}", key))?;
    }
    for &((x, y), color) in points {
        let Some(key) = session.lookup(x, y) else {
            log::warn!("no region at ({}, {}), skipped", x, y);
            continue;
        };
        session.set_control(key, color)?;
        session.click(x, y)?;
    }

    let png = session.export_png().context("PNG encoding failed")?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, png).with_context(|| format!("failed to write {}", output.display()))?;
    println!("Saved → {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::try_with_env_or_str(&cli.log_level)
        .context("invalid log level")?
        .log_to_stderr()
        .start()
        .context("logger initialization failed")?;

    match &cli.command {
        Command::Regions(load) => list_regions(load),
        Command::Paint {
            load,
            output,
            fill,
            at,
        } => paint(load, output, fill, at),
    }
}
