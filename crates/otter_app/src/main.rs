//! # otter_app
//!
//! Runs the Otter entity-component simulation.
//!
//! ## Startup Sequence
//!
//! 1. Load the JSON configuration given by `--config`, or use defaults.
//! 2. Register component layouts and build the startup scene.
//! 3. Enter the fixed-timestep tick loop.

mod config;
mod scene;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use otter_ecs::TickLoop;

#[derive(Parser)]
#[command(name = "otter_app", about = "Runs the Otter entity-component simulation")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run, overriding the configuration (0 = unlimited)
    #[arg(short, long)]
    ticks: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("otter_app=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.tick.max_ticks = ticks;
    }

    let mut tick_loop = TickLoop::new(config.tick.clone());
    otter_game::register_components(tick_loop.store_mut())?;
    let entity = scene::build(&mut tick_loop, &config.scene)?;

    tick_loop.run()?;

    let position = tick_loop.store().transform(entity)?.position;
    info!(
        %entity,
        %position,
        ticks = tick_loop.tick_id(),
        "simulation finished"
    );
    Ok(())
}
