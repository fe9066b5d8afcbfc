#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Maze Chase game in the terminal.

mod config;
mod script;

use std::{
    fs, io,
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use maze_chase_credits::{CreditFeed, NemNodeLookup, NodeSettings, PlayerAddress};
use maze_chase_rendering::{RenderingBackend, Scene, TextBackend};
use maze_chase_system_clock::{Clock, Simulation, SimulationConfig, ThreadPacer, TickInputs};
use maze_chase_world::{query, Maze};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::GameConfig, script::IntentScript};

/// Command-line arguments. Flags override the configuration file.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Plays Maze Chase in the terminal")]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maze template file, one row per line.
    #[arg(long)]
    maze: Option<PathBuf>,
    /// Seed for adversary placement and steering.
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks simulated per second.
    #[arg(long)]
    ticks_per_second: Option<u32>,
    /// Stop after this many ticks.
    #[arg(long)]
    frames: Option<u64>,
    /// Simulate without printing frames.
    #[arg(long)]
    headless: bool,
    /// NEM address whose hearts become the player's lives.
    #[arg(long)]
    address: Option<String>,
    /// Scripted directions, for example `0:right,12:up`.
    #[arg(long)]
    script: Option<String>,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "maze_chase=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(ticks_per_second) = cli.ticks_per_second {
        config.ticks_per_second = ticks_per_second;
    }
    if let Some(maze) = cli.maze {
        config.maze = Some(maze);
    }

    let maze = match &config.maze {
        Some(path) => load_maze(path)?,
        None => Maze::classic().context("classic maze is malformed")?,
    };
    let script = cli
        .script
        .as_deref()
        .map(IntentScript::parse)
        .transpose()?
        .unwrap_or_default();

    let mut simulation = Simulation::new(
        maze,
        SimulationConfig {
            sub_cell_units: config.sub_cell_units()?,
            adversary_count: config.adversary_count,
            adversary_colors: config.colors()?,
            seed: config.seed,
        },
    )
    .context("maze cannot be simulated at the configured resolution")?;
    info!("{}", query::welcome_banner(simulation.world()));
    let _ = simulation.start();

    let credits = match &cli.address {
        Some(address) => Some(spawn_credit_feed(&config, address)?),
        None => None,
    };

    let clock = Clock::from_rate(config.ticks_per_second()?).with_frame_limit(cli.frames);
    let mut backend = TextBackend::new(io::stdout().lock());
    let headless = cli.headless;

    let ticks = clock.run(
        &mut simulation,
        &mut ThreadPacer::default(),
        |frame| TickInputs {
            intent: script.intent_at(frame),
            lives: credits.as_ref().and_then(CreditFeed::drain),
        },
        |snapshot, _| -> Result<ControlFlow<()>> {
            if !headless {
                backend.present(&Scene::from_snapshot(snapshot)?)?;
            }
            Ok(ControlFlow::Continue(()))
        },
    )?;

    let snapshot = simulation.snapshot();
    info!(
        ticks,
        pickups_left = query::maze(simulation.world()).remaining_pickups(),
        lives = ?snapshot.lives,
        "game finished"
    );
    Ok(())
}

fn load_maze(path: &Path) -> Result<Maze> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read maze at {}", path.display()))?;
    let mut rows: Vec<&str> = contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    while rows.last().is_some_and(|row| row.is_empty()) {
        let _ = rows.pop();
    }
    Maze::parse(&rows).with_context(|| format!("malformed maze at {}", path.display()))
}

fn spawn_credit_feed(config: &GameConfig, address: &str) -> Result<CreditFeed> {
    let settings = NodeSettings::from_env(
        &config.nem.host,
        config.nem.port,
        config.nem.test_mode,
        config.nem.mijin,
    )?;
    let lookup = NemNodeLookup::new(settings)?;
    let node = lookup.settings();
    info!(network = %node.network, node = %node.base_url(), "looking up hearts");
    Ok(CreditFeed::spawn(lookup, PlayerAddress::new(address)))
}
