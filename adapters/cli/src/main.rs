#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for solving and playing maze grid dumps.

mod grid_dump;
mod session;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use maze_runner_core::{CellCoord, Command, Event, Grid, SessionOutcome};
use maze_runner_world::{self as world, query, World};
use tracing::{debug, info};

use crate::session::{BlockRequest, Settings};

/// Maze solver and actor race over plain grid dumps.
#[derive(Debug, Parser)]
#[command(name = "maze-runner", version, about, long_about = None)]
struct Cli {
    /// Tracing filter directive; overrides RUST_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Writes an all-open grid dump.
    New {
        /// Number of rows.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        rows: u32,
        /// Number of columns.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        columns: u32,
        /// Destination file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Prints the reachability flag, distance field and direction field.
    Solve {
        /// Grid dump to read.
        file: PathBuf,
    },
    /// Prints the cells visited from a start cell to its goal.
    Path {
        /// Grid dump to read.
        file: PathBuf,
        /// Start row.
        row: u32,
        /// Start column.
        column: u32,
    },
    /// Prints the merged link masks of every spawn point's path.
    Overlay {
        /// Grid dump to read.
        file: PathBuf,
    },
    /// Runs a headless play session.
    Play(PlayArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Grid dump to read.
    file: PathBuf,
    /// Seed for every random decision of the session.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Cell size in pixels used to pace animation samples.
    #[arg(long, default_value_t = 16.0)]
    cell_size: f32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Simulated seconds after which play is stopped.
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
    /// Wall request issued at a given play time; repeatable.
    #[arg(long = "block", value_name = "ROW,COLUMN@SECONDS")]
    blocks: Vec<BlockRequest>,
}

/// Entry point for the maze runner command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(cli.log_level.as_deref());

    match cli.command {
        Commands::New {
            rows,
            columns,
            output,
        } => new_grid(rows, columns, output),
        Commands::Solve { file } => solve(&load_world(&file)?),
        Commands::Path { file, row, column } => {
            trace_path(&load_world(&file)?, CellCoord::new(row, column))
        }
        Commands::Overlay { file } => overlay(&load_world(&file)?),
        Commands::Play(args) => play(args),
    }
}

fn init_telemetry(level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = level
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_grid(file: &Path) -> Result<Grid> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read grid dump {}", file.display()))?;
    grid_dump::parse(&text).with_context(|| format!("invalid grid dump {}", file.display()))
}

fn load_world(file: &Path) -> Result<World> {
    let grid = read_grid(file)?;
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::LoadGrid { grid }, &mut events);
    debug!(?events, file = %file.display(), "grid loaded");
    Ok(world)
}

fn new_grid(rows: u32, columns: u32, output: Option<PathBuf>) -> Result<()> {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid { rows, columns },
        &mut events,
    );
    if let Some(Event::GridRejected { reason, .. }) = events
        .iter()
        .find(|event| matches!(event, Event::GridRejected { .. }))
    {
        bail!("cannot create a {rows}x{columns} grid: {reason}");
    }
    let text = grid_dump::format(query::grid(&world));

    match output {
        Some(path) => {
            fs::write(&path, text)
                .with_context(|| format!("failed to write grid dump {}", path.display()))?;
            info!(rows, columns, path = %path.display(), "grid written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn solve(world: &World) -> Result<()> {
    let maze = query::solution(world);
    println!("fully reachable: {}", maze.is_fully_reachable());
    println!("distances:");
    print!("{}", maze.distances_table());
    println!("directions:");
    print!("{}", maze.headings_table());
    Ok(())
}

fn trace_path(world: &World, start: CellCoord) -> Result<()> {
    let path = query::path(world, start)
        .with_context(|| format!("cannot trace a path from {start}"))?;
    for cell in path {
        println!("{cell}");
    }
    Ok(())
}

fn overlay(world: &World) -> Result<()> {
    let overlay = query::path_overlay(world).context("cannot build the path overlay")?;
    print!("{overlay}");
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    ensure!(
        args.cell_size.is_finite() && args.cell_size > 0.0,
        "cell size must be a positive number"
    );
    let grid = read_grid(&args.file)?;
    let spawns = grid.spawns().len();
    ensure!(spawns > 0, "{} has no spawn points", args.file.display());

    let settings = Settings {
        seed: args.seed,
        cell_size: args.cell_size,
        tick: Duration::from_millis(args.tick_ms),
        limit: Duration::from_secs(args.max_seconds),
        blocks: args.blocks,
    };
    info!(spawns, seed = settings.seed, "starting headless play");
    let report = session::run(grid, &settings);

    for (request, placed) in &report.blocks {
        let verdict = if *placed { "placed" } else { "rejected" };
        println!(
            "block {} at {:.3}s: {verdict}",
            request.cell,
            request.at.as_secs_f64()
        );
    }
    match report.outcome {
        SessionOutcome::GoalReached { actor, elapsed } => println!(
            "actor {} reached the goal in {:.3}s",
            actor.get(),
            elapsed.as_secs_f64()
        ),
        SessionOutcome::NoPath { actor } => {
            println!("actor {} has no path to a goal", actor.get());
        }
        SessionOutcome::Stopped => println!(
            "stopped after {:.3}s without a winner",
            report.clock.as_secs_f64()
        ),
    }
    debug!(
        position_changes = report.position_changes,
        restored = report.restored,
        "session report"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn play_arguments_collect_block_requests() {
        let cli = Cli::try_parse_from([
            "maze-runner",
            "play",
            "maze.txt",
            "--seed",
            "9",
            "--block",
            "1,2@0.5",
            "--block",
            "3,4@2",
        ])
        .expect("valid arguments");

        let Commands::Play(args) = cli.command else {
            panic!("expected play subcommand");
        };
        assert_eq!(args.seed, 9);
        assert_eq!(args.tick_ms, 20);
        assert_eq!(
            args.blocks,
            vec![
                BlockRequest {
                    cell: CellCoord::new(1, 2),
                    at: Duration::from_millis(500),
                },
                BlockRequest {
                    cell: CellCoord::new(3, 4),
                    at: Duration::from_secs(2),
                },
            ]
        );
    }

    #[test]
    fn zero_sized_grids_are_refused() {
        let parsed = Cli::try_parse_from(["maze-runner", "new", "--rows", "0", "--columns", "3"]);

        assert!(parsed.is_err());
    }

    #[test]
    fn loaded_world_reflects_the_dump() {
        let mut world = World::new();
        let mut events = Vec::new();
        let grid = grid_dump::parse("1 0\n-1 3\n").expect("valid dump");

        world::apply(&mut world, Command::LoadGrid { grid }, &mut events);

        assert!(events.contains(&Event::GridReplaced {
            rows: 2,
            columns: 2
        }));
        assert_eq!(query::distance(&world, CellCoord::new(1, 1)), Some(2));
    }
}
