//! Headless play sessions driven by a fixed tick.

use std::{str::FromStr, time::Duration};

use maze_runner_core::{
    ActorId, ActorSnapshot, CellCode, CellCoord, Command, Event, Grid, PlayMode, SessionOutcome,
};
use maze_runner_system_builder::{Builder, BuilderInput};
use maze_runner_system_movement::{Config, Host, Movement};
use maze_runner_world::{self as world, query, World};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Wall requested at a given play time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BlockRequest {
    /// Cell to wall off.
    pub(crate) cell: CellCoord,
    /// Simulated time at which the request is issued.
    pub(crate) at: Duration,
}

/// Raised when a block request is not written as `ROW,COLUMN@SECONDS`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected ROW,COLUMN@SECONDS, got '{0}'")]
pub(crate) struct BlockRequestError(String);

impl FromStr for BlockRequest {
    type Err = BlockRequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || BlockRequestError(value.to_owned());
        let (cell, seconds) = value.split_once('@').ok_or_else(malformed)?;
        let (row, column) = cell.split_once(',').ok_or_else(malformed)?;
        let row = row.trim().parse().map_err(|_| malformed())?;
        let column = column.trim().parse().map_err(|_| malformed())?;
        let seconds: f64 = seconds.trim().parse().map_err(|_| malformed())?;
        let at = Duration::try_from_secs_f64(seconds).map_err(|_| malformed())?;
        Ok(Self {
            cell: CellCoord::new(row, column),
            at,
        })
    }
}

/// Parameters of a headless session.
#[derive(Clone, Debug)]
pub(crate) struct Settings {
    pub(crate) seed: u64,
    pub(crate) cell_size: f32,
    pub(crate) tick: Duration,
    pub(crate) limit: Duration,
    pub(crate) blocks: Vec<BlockRequest>,
}

/// Summary of a finished session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Report {
    pub(crate) outcome: SessionOutcome,
    pub(crate) clock: Duration,
    pub(crate) position_changes: u64,
    pub(crate) blocks: Vec<(BlockRequest, bool)>,
    pub(crate) restored: bool,
}

struct HeadlessHost {
    cell_size: f32,
    position_changes: u64,
}

impl Host for HeadlessHost {
    fn position_changed(&mut self, actor: &ActorSnapshot) {
        self.position_changes += 1;
        trace!(
            actor = actor.id.get(),
            row = actor.position.row,
            column = actor.position.column,
            "position changed"
        );
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn no_path(&mut self, actor: ActorId) {
        warn!(actor = actor.get(), "actor has no path to a goal");
    }

    fn goal_reached(&mut self, actor: ActorId, elapsed: Duration) {
        info!(actor = actor.get(), ?elapsed, "goal reached");
    }
}

/// Plays the grid until an actor finishes or the time limit expires.
///
/// The grid is restored to its pre-play state before returning.
pub(crate) fn run(grid: Grid, settings: &Settings) -> Report {
    let original = grid.clone();
    let mut world = World::with_grid(grid);
    let mut builder = Builder::new();
    let mut pending = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Play,
        },
        &mut pending,
    );

    let mut movement = Movement::new(Config::new(settings.seed));
    let mut host = HeadlessHost {
        cell_size: settings.cell_size,
        position_changes: 0,
    };
    movement.start(&world);

    let mut schedule = settings.blocks.clone();
    schedule.sort_by_key(|request| request.at);
    let mut schedule = schedule.into_iter().peekable();
    let mut blocks = Vec::new();

    let mut outcome = None;
    while outcome.is_none() && movement.elapsed() < settings.limit {
        while let Some(request) = schedule.next_if(|request| request.at <= movement.elapsed()) {
            let placed = request_block(
                &mut world,
                &mut builder,
                &movement,
                request.cell,
                &mut pending,
            );
            blocks.push((request, placed));
        }
        outcome = movement.tick(settings.tick, &world, &mut host);
    }

    let outcome = outcome.unwrap_or_else(|| {
        info!(limit = ?settings.limit, "time limit reached, stopping play");
        SessionOutcome::Stopped
    });
    let clock = movement.elapsed();
    movement.cancel();

    let mut events = Vec::new();
    world::apply(&mut world, Command::EndPlay { outcome }, &mut events);
    debug!(?events, "play ended");

    Report {
        outcome,
        clock,
        position_changes: host.position_changes,
        blocks,
        restored: query::grid(&world) == &original,
    }
}

/// Routes a wall request through the builder and reports whether the world accepted it.
fn request_block(
    world: &mut World,
    builder: &mut Builder,
    movement: &Movement,
    cell: CellCoord,
    pending: &mut Vec<Event>,
) -> bool {
    let mut commands = Vec::new();
    builder.handle(
        pending,
        BuilderInput::new(true, false, Some(cell), CellCode::WALL),
        &movement.occupancy(),
        &mut commands,
    );
    pending.clear();

    for command in commands {
        world::apply(world, command, pending);
    }

    let placed = pending.contains(&Event::WallPlaced { cell });
    if placed {
        info!(%cell, "wall placed");
    } else {
        let reason = pending.iter().find_map(|event| match event {
            Event::WallPlacementRejected { reason, .. } => Some(*reason),
            _ => None,
        });
        warn!(%cell, ?reason, "wall request rejected");
    }
    placed
}
