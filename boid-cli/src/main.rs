use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_cli::{load_settings, parse_orb, run_headless, RunConfig};
use boid_core::BoundaryMode;
use boid_shared::FlockSettings;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flocking runner", long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Canvas width
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Canvas height
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Settings JSON file, missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the population size from the settings
    #[arg(short = 'n', long)]
    num_boids: Option<usize>,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Orb to place before the first frame, as x,y,attract|repel (repeatable)
    #[arg(short, long = "orb")]
    orbs: Vec<String>,

    /// Bounce off the canvas edges instead of wrapping around
    #[arg(short, long)]
    bounce: bool,

    /// Log a status line every N frames (0 disables)
    #[arg(short, long, default_value_t = 100)]
    report_every: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => FlockSettings::default(),
    };
    if let Some(num_boids) = args.num_boids {
        settings.num_boids = num_boids;
    }
    if args.bounce {
        settings.boundary = BoundaryMode::Bounce;
    }

    let orbs = args
        .orbs
        .iter()
        .map(String::as_str)
        .map(parse_orb)
        .collect::<Result<Vec<_>>>()?;

    let config = RunConfig {
        width: args.width,
        height: args.height,
        frames: args.frames,
        report_every: args.report_every,
        seed: args.seed,
        settings,
        orbs,
    };

    let status = run_headless(&config).context("Simulation failed")?;
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
