//! Daily Quantity Dashboard
//!
//! Loads the configured records and opens the dashboard, or renders its charts
//! to files, prints a summary, or writes sample data.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use daydash::analysis::{build_dataset, write_sample, SampleSpec};
use daydash::plotting::{save_day, save_overlay, OverlayView, Palette};
use daydash::utils::TimeWindow;
use daydash::{Config, Dataset};

#[derive(Parser)]
#[command(name = "daydash", version, about = "Day-by-day quantity dashboard")]
struct Cli {
    /// Config file (defaults to the user config dir, then built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Input records file, overriding the config
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive dashboard (default)
    Gui,
    /// Write the overview and every day chart to files
    Render {
        #[arg(short, long, default_value = "charts")]
        out_dir: PathBuf,
        #[arg(short, long, value_enum, default_value_t = ImageFormat::Png)]
        format: ImageFormat,
        /// Start of the overview time window, HH:MM:SS
        #[arg(long)]
        from: Option<NaiveTime>,
        /// End of the overview time window, HH:MM:SS
        #[arg(long)]
        to: Option<NaiveTime>,
        /// Draw the overview with lines only
        #[arg(long)]
        no_markers: bool,
    },
    /// Print the table shape and per-day counts
    Summary,
    /// Write a random sample input file
    Generate {
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, default_value_t = 3)]
        days: u32,
        #[arg(long, default_value_t = 48)]
        per_day: u32,
        #[arg(long, default_value = "2012-01-01")]
        start: NaiveDate,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

fn main() -> Result<()> {
    let default_filter = if cfg!(feature = "dev") { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    if let Some(input) = cli.input {
        config.data.input = input;
    }

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => {
            let dataset = load(&config)?;
            daydash::app::run(config, Arc::new(dataset))
        }
        Command::Render {
            out_dir,
            format,
            from,
            to,
            no_markers,
        } => {
            let dataset = load(&config)?;
            let view = OverlayView {
                window: TimeWindow::new(
                    from.map_or(0, |t| t.num_seconds_from_midnight()),
                    to.map_or(86_400, |t| t.num_seconds_from_midnight()),
                ),
                markers: !no_markers,
            };
            render(&config, &dataset, &view, &out_dir, format)
        }
        Command::Summary => {
            let dataset = load(&config)?;
            summary(&dataset);
            Ok(())
        }
        Command::Generate {
            out,
            days,
            per_day,
            start,
            seed,
        } => {
            let spec = SampleSpec {
                start,
                days,
                per_day,
                seed,
            };
            write_sample(&out, &spec, &config.data)
                .with_context(|| format!("writing sample to {}", out.display()))?;
            Ok(())
        }
    }
}

fn load(config: &Config) -> Result<Dataset> {
    build_dataset(&config.data)
        .with_context(|| format!("building dataset from {}", config.data.input.display()))
}

fn render(
    config: &Config,
    dataset: &Dataset,
    view: &OverlayView,
    out_dir: &Path,
    format: ImageFormat,
) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let ext = format.extension();
    let palette = Palette::from_config(&config.chart, dataset.partition().len());

    let overview = out_dir.join(format!("overview.{ext}"));
    save_overlay(dataset, &config.chart, &palette, view, &overview)
        .map_err(|e| anyhow::anyhow!("rendering {}: {e}", overview.display()))?;
    info!(path = %overview.display(), "wrote overview chart");

    for key in dataset.day_keys() {
        let path = out_dir.join(format!("day_{key}.{ext}"));
        save_day(dataset, key, &config.chart, &path)
            .map_err(|e| anyhow::anyhow!("rendering {}: {e}", path.display()))?;
        info!(path = %path.display(), "wrote day chart");
    }
    Ok(())
}

fn summary(dataset: &Dataset) {
    let table = dataset.table();
    println!("source:  {}", dataset.source().display());
    println!("rows:    {}", table.len());
    println!("days:    {}", dataset.partition().len());
    if !table.dropped.is_empty() {
        println!("dropped: lines {:?}", table.dropped);
    }
    println!("fields:  {}", table.columns().join(", "));
    println!();
    println!("{:<12} {:<12} {:>6} {:>8} {:>8}", "day", "date_str", "rows", "min", "max");
    for day in dataset.days() {
        let date_str = day.rows().next().map(|r| r.date_str.as_str()).unwrap_or("");
        let (lo, hi) = day.quantity_bounds().unwrap_or((0, 0));
        println!(
            "{:<12} {:<12} {:>6} {:>8} {:>8}",
            day.key(),
            date_str,
            day.len(),
            lo,
            hi
        );
    }
}
