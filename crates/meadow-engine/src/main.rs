//! # Meadow
//!
//! Headless runner for the meadow skirmish.
//!
//! Loads `meadow.toml`, builds the world, and drives it with a scripted
//! player at a fixed timestep:
//! - Config: TOML file with command-line overrides
//! - Input: built-in player scripts
//! - Timing: fixed-step loop, optionally paced in real time

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod input;
mod timing;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::RunOptions;
use crate::config::EngineConfig;
use crate::input::Script;

/// Headless meadow skirmish runner
#[derive(Parser, Debug)]
#[command(name = "meadow", version)]
#[command(about = "Run the meadow skirmish headless with a scripted player")]
struct Args {
    /// Config file (defaults to ./meadow.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Initial NPC count
    #[arg(long)]
    npcs: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Player input script
    #[arg(long, value_enum, default_value_t = Script::Hunter)]
    script: Script,

    /// Pace ticks against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "meadow=debug"
    } else {
        "meadow=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    info!("Meadow starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let options = RunOptions {
        config_path: args.config.clone(),
        ticks: args.ticks,
        npcs: args.npcs,
        seed: args.seed,
        script: args.script,
        realtime: args.realtime,
    };
    let config = app::load_config(&options);

    if args.init_config {
        let path = args.config.unwrap_or_else(EngineConfig::config_path);
        config.save_to(&path)?;
        return Ok(());
    }

    let summary = app::run(&config, &options)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            "{} ticks ({:.1}s): spawned {}, killed {}, damage {}, score {}",
            summary.ticks,
            summary.seconds,
            summary.stats.spawned,
            summary.stats.killed,
            summary.stats.damage,
            summary.score
        );
    }

    info!("Meadow shutdown complete");
    Ok(())
}
