//! Point-in-time index constituent reconstruction CLI.
//!
//! Rebuilds monthly index membership from a current constituent list and a
//! joiner/leaver change log.
//!
//! Usage: `cargo run --bin reconstruct --features cli -- --constituents spx.csv --changes spx_changes.csv`
//! Example: `reconstruct --constituents spx.csv --changes spx_changes.csv --end-date 2024-02-29 --months 120`

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use polars::prelude::*;
use rewind::{
    primitives::IndexCode,
    timeline::{ReconstructionConfig, Reconstructor},
    traits::{RetryConfig, RetryOnTimeout},
    utils::{CONSTITUENT_COL, FrameSource, timeline_to_frame},
};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Reconstruct historical index membership month by month.
#[derive(Debug, Parser)]
#[command(name = "reconstruct", version, about)]
struct Cli {
    /// CSV with the current constituents.
    #[arg(long)]
    constituents: PathBuf,

    /// CSV change log with `Date`, `Change` and `Constituent RIC` columns.
    #[arg(long)]
    changes: PathBuf,

    /// Instrument column of the constituents CSV.
    #[arg(long, default_value = CONSTITUENT_COL)]
    column: String,

    /// Index code the files describe.
    #[arg(long)]
    index: Option<String>,

    /// Most recent date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Months to reconstruct, counting the end month.
    #[arg(long)]
    months: Option<u32>,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full timeline as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,
}

/// File configuration; command-line flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    index: Option<String>,
    reconstruction: ReconstructionConfig,
    retry: RetryConfig,
}

impl FileConfig {
    fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = FileConfig::load(cli.config.as_deref())?;
    if let Some(months) = cli.months {
        config.reconstruction.months = months;
    }

    let index = IndexCode::new(cli.index.or(config.index).unwrap_or_else(|| "INDEX".to_string()));
    let end_date = cli.end_date.unwrap_or_else(|| Local::now().date_naive());
    info!(
        %index,
        %end_date,
        months = config.reconstruction.months,
        missing_joiner = ?config.reconstruction.missing_joiner,
        "configuration loaded"
    );

    let constituents = read_csv(&cli.constituents)?;
    let changes = read_csv(&cli.changes)?;
    let source = RetryOnTimeout::with_config(
        FrameSource::from_frames(index.clone(), &constituents, &cli.column, &changes)?,
        config.retry,
    );

    let reconstructor = Reconstructor::with_config(config.reconstruction);
    let timeline = reconstructor.reconstruct_from_source(&source, &index, end_date)?;

    let table = timeline_to_frame(&timeline)?.select(["date", "num_companies"])?;
    println!("{table}");

    if let Some(path) = cli.json {
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &timeline)?;
        info!(path = %path.display(), "wrote timeline");
    }

    Ok(())
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .with_context(|| format!("reading {}", path.display()))
}
