#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state for the maze runner.
//!
//! The world owns the grid, the navigation fields solved from it and the
//! play session bookkeeping. Every mutation flows through [`apply`], which
//! re-solves the maze before returning so readers never observe a grid and a
//! direction field that disagree.

pub mod navigation;
pub mod overlay;

use maze_runner_core::{
    CellCode, CellCoord, Command, EditError, Event, Grid, Occupancy, PlacementError, PlayMode,
    SessionOutcome,
};
use tracing::{debug, info, warn};

use crate::navigation::{solve, SolvedMaze};

const DEFAULT_GRID_ROWS: u32 = 10;
const DEFAULT_GRID_COLUMNS: u32 = 10;

/// Represents the authoritative maze state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    solution: SolvedMaze,
    play_mode: PlayMode,
    snapshot: Option<Grid>,
}

impl World {
    /// Creates a world holding an all-open grid of the default size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_grid(Grid::new(DEFAULT_GRID_ROWS, DEFAULT_GRID_COLUMNS))
    }

    /// Creates a world in edit mode around the provided grid.
    #[must_use]
    pub fn with_grid(grid: Grid) -> Self {
        let solution = solve(&grid);
        Self {
            grid,
            solution,
            play_mode: PlayMode::Edit,
            snapshot: None,
        }
    }

    fn replace_grid(&mut self, grid: Grid, out_events: &mut Vec<Event>) {
        if self.play_mode == PlayMode::Play {
            warn!("grid replacement ignored while a play session is running");
            return;
        }

        debug!(rows = grid.rows(), columns = grid.columns(), "grid replaced");
        out_events.push(Event::GridReplaced {
            rows: grid.rows(),
            columns: grid.columns(),
        });
        self.grid = grid;
        self.resolve(out_events);
    }

    fn resolve(&mut self, out_events: &mut Vec<Event>) {
        self.solution = solve(&self.grid);
        out_events.push(Event::MazeSolved {
            fully_reachable: self.solution.is_fully_reachable(),
        });
    }

    fn edit_cell(&mut self, cell: CellCoord, code: CellCode) -> Result<CellCode, EditError> {
        if self.play_mode != PlayMode::Edit {
            return Err(EditError::InvalidMode);
        }
        self.grid.set(cell, code).ok_or(EditError::OutOfBounds)
    }

    fn begin_play(&mut self, out_events: &mut Vec<Event>) {
        self.snapshot = Some(self.grid.clone());
        self.play_mode = PlayMode::Play;
        info!(spawns = self.grid.spawns().len(), "play session started");
        out_events.push(Event::PlayModeChanged {
            mode: PlayMode::Play,
        });
    }

    fn end_play(&mut self, outcome: SessionOutcome, out_events: &mut Vec<Event>) {
        if self.play_mode != PlayMode::Play {
            return;
        }

        info!(?outcome, "play session ended");
        out_events.push(Event::PlayEnded { outcome });
        if let Some(snapshot) = self.snapshot.take() {
            self.grid = snapshot;
        }
        self.play_mode = PlayMode::Edit;
        self.resolve(out_events);
        out_events.push(Event::PlayModeChanged {
            mode: PlayMode::Edit,
        });
    }

    /// Tentatively walls the cell and keeps the wall only when it is legal.
    fn place_wall(
        &mut self,
        cell: CellCoord,
        occupancy: &Occupancy,
    ) -> Result<CellCode, PlacementError> {
        if self.play_mode != PlayMode::Play {
            return Err(PlacementError::InvalidMode);
        }
        let current = self.grid.get(cell).ok_or(PlacementError::OutOfBounds)?;
        if !current.is_open() {
            return Err(PlacementError::NotOpen);
        }
        if occupancy.covers(cell) {
            return Err(PlacementError::Occupied);
        }

        let _ = self.grid.set(cell, CellCode::WALL);
        let solution = solve(&self.grid);
        if occupancy
            .standing()
            .iter()
            .any(|occupant| !solution.heading(*occupant).is_routed())
        {
            let _ = self.grid.set(cell, current);
            return Err(PlacementError::WouldStrand);
        }

        self.solution = solution;
        Ok(current)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { rows, columns } => {
            match Grid::open(rows, columns) {
                Ok(grid) => world.replace_grid(grid, out_events),
                Err(reason) => {
                    warn!(rows, columns, %reason, "grid dimensions rejected");
                    out_events.push(Event::GridRejected {
                        rows,
                        columns,
                        reason,
                    });
                }
            }
        }
        Command::LoadGrid { grid } => {
            world.replace_grid(grid, out_events);
        }
        Command::SetCell { cell, code } => match world.edit_cell(cell, code) {
            Ok(from) => {
                if from != code {
                    out_events.push(Event::CellChanged {
                        cell,
                        from,
                        to: code,
                    });
                    world.resolve(out_events);
                }
            }
            Err(reason) => {
                debug!(?cell, ?reason, "cell edit rejected");
                out_events.push(Event::CellEditRejected { cell, reason });
            }
        },
        Command::SetPlayMode { mode } => match (world.play_mode, mode) {
            (PlayMode::Edit, PlayMode::Play) => world.begin_play(out_events),
            (PlayMode::Play, PlayMode::Edit) => world.end_play(SessionOutcome::Stopped, out_events),
            _ => {}
        },
        Command::PlaceWall { cell, occupancy } => match world.place_wall(cell, &occupancy) {
            Ok(from) => {
                info!(?cell, "wall placed");
                out_events.push(Event::CellChanged {
                    cell,
                    from,
                    to: CellCode::WALL,
                });
                out_events.push(Event::WallPlaced { cell });
                out_events.push(Event::MazeSolved {
                    fully_reachable: world.solution.is_fully_reachable(),
                });
            }
            Err(reason) => {
                debug!(?cell, ?reason, "wall placement rejected");
                out_events.push(Event::WallPlacementRejected { cell, reason });
            }
        },
        Command::EndPlay { outcome } => world.end_play(outcome, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use crate::{
        navigation::{PathError, SolvedMaze},
        overlay::{self, PathOverlay},
    };
    use maze_runner_core::{CellCode, CellCoord, Grid, Heading, PlayMode};

    /// Provides read-only access to the authoritative grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the navigation fields of the current grid.
    #[must_use]
    pub fn solution(world: &World) -> &SolvedMaze {
        &world.solution
    }

    /// Reports the active play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Heading an actor standing on the cell should follow.
    #[must_use]
    pub fn heading(world: &World, cell: CellCoord) -> Heading {
        world.solution.heading(cell)
    }

    /// Hop count from the cell to the nearest goal.
    #[must_use]
    pub fn distance(world: &World, cell: CellCoord) -> Option<u32> {
        world.solution.distance(cell)
    }

    /// Cells leading from `start` to the nearest goal, inclusive.
    pub fn path(world: &World, start: CellCoord) -> Result<Vec<CellCoord>, PathError> {
        world.solution.path(start)
    }

    /// Actor spawn markers of the current grid in row-major order.
    #[must_use]
    pub fn spawns(world: &World) -> Vec<(CellCoord, CellCode)> {
        world.grid.spawns()
    }

    /// Link masks for the routes taken from every spawn marker.
    pub fn path_overlay(world: &World) -> Result<PathOverlay, PathError> {
        overlay::build(&world.grid, &world.solution)
    }
}
