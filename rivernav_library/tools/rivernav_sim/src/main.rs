//! # rivernav - Headless River Navigation Simulator
//!
//! Sails a boat down a partially surveyed river, one segment at a time.
//!
//! Usage:
//!   rivernav                                  # Synthetic river, default config
//!   rivernav --data river.txt                 # Depth table, one row per line
//!   rivernav --data survey.png                # Depth image (luminance = depth)
//!   rivernav --config river.yaml --json       # Custom config, JSON summary
//!   rivernav --snapshot last_segment.png      # Save the final segment

use anyhow::{Context, Result};
use clap::Parser;
use rivernav_core::SimConfig;
use rivernav_sim::{render, source_for_path, DepthSource, SimulationLoop, SyntheticDepthSource};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "rivernav")]
#[command(about = "Headless river navigation simulator")]
pub struct Args {
    /// Depth data (text table or image); a synthetic river when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// Simulation configuration file (YAML or TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Segment width override
    #[arg(long)]
    width: Option<usize>,

    /// Segment height override
    #[arg(long)]
    height: Option<usize>,

    /// Upper bound on simulation ticks
    #[arg(long, default_value = "10000")]
    ticks: u64,

    /// Write the final active segment as a PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Seed of the synthetic river
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

/// Length of the synthetic river in segments, unless a row budget is configured
const SYNTHETIC_SEGMENTS: usize = 5;

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            SimConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => SimConfig::default(),
    };

    if let Some(width) = args.width {
        config.map.width = width;
    }
    if let Some(height) = args.height {
        config.map.height = height;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(&args)?;
    let (width, height) = (config.map.width, config.map.height);

    let (source, path): (Box<dyn DepthSource>, PathBuf) = match &args.data {
        Some(path) => {
            info!("Reading depth data from {}", path.display());
            (
                source_for_path(path, width, height, config.source.remaining_rows),
                path.clone(),
            )
        }
        None => {
            let rows = config
                .source
                .remaining_rows
                .unwrap_or(height * SYNTHETIC_SEGMENTS);
            info!("No depth data given; generating a {}-row river (seed {})", rows, args.seed);
            let source = SyntheticDepthSource::new(width, height, args.seed)
                .with_max_depth(config.depth.max_depth.min(50.0))
                .with_remaining_rows(Some(rows));
            (Box::new(source), PathBuf::from("synthetic"))
        }
    };

    let mut sim = SimulationLoop::new(config, source, &path)
        .with_context(|| format!("Failed to start simulation on {}", path.display()))?;
    let summary = sim.run(args.ticks)?;

    if let Some(snapshot) = &args.snapshot {
        render::save_png(sim.active_grid(), sim.max_depth(), snapshot)
            .with_context(|| format!("Failed to write snapshot {}", snapshot.display()))?;
        info!("Saved final segment to {}", snapshot.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            "Run finished: {} ticks, {} segments, {} rollovers, {} infeasible routes{}",
            summary.ticks,
            summary.segments,
            summary.rollovers,
            summary.infeasible_routes,
            if summary.exhausted { ", course complete" } else { "" }
        );
        info!(
            "Final pose: ({}, {}) heading {:+.1} deg, speed {:.2}",
            summary.boat.x, summary.boat.y, summary.boat.heading, summary.boat.speed
        );
    }

    Ok(())
}
