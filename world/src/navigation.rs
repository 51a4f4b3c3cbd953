//! Breadth-first navigation fields seeded from every goal of the maze.

use std::{collections::VecDeque, fmt};

use maze_runner_core::{CellCoord, Direction, Grid, Heading};
use thiserror::Error;

/// Failures raised while reconstructing a path from the direction field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The start cell has no route to any goal.
    #[error("no route leads from {cell} to a goal")]
    UnreachablePoint {
        /// Cell the path was requested for.
        cell: CellCoord,
    },
    /// Following the direction field did not reach a goal within the step limit.
    #[error("path from {start} did not reach a goal within {limit} cells")]
    CorruptPath {
        /// Cell the path was requested for.
        start: CellCoord,
        /// Maximum number of cells a valid path may contain.
        limit: usize,
    },
}

/// Distance and direction fields computed for a single grid.
///
/// Both fields mirror the grid dimensions and are stored in row-major order.
/// Distances use `-1` for walls and for open cells that no goal can reach.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SolvedMaze {
    rows: u32,
    columns: u32,
    distances: Vec<i32>,
    headings: Vec<Heading>,
    fully_reachable: bool,
}

/// Solves the grid with a breadth-first search seeded from every goal cell.
///
/// Goals are seeded in row-major order. Each expanded cell relaxes its
/// neighbours above, below, left and right in that order, so ties between
/// equally short routes always resolve the same way.
#[must_use]
pub fn solve(grid: &Grid) -> SolvedMaze {
    let rows = usize::try_from(grid.rows()).unwrap_or(0);
    let columns = usize::try_from(grid.columns()).unwrap_or(0);
    let mut frontier = Frontier::bordered(grid, rows, columns);

    for (cell, code) in grid.iter_cells() {
        if code.is_goal() {
            frontier.relax(frontier.index(cell), Heading::Goal, 0);
        }
    }

    while let Some(index) = frontier.queue.pop_front() {
        let next = frontier.distances[index] + 1;
        let width = frontier.width;
        frontier.relax(index - width, Heading::Move(Direction::Down), next);
        frontier.relax(index + width, Heading::Move(Direction::Up), next);
        frontier.relax(index - 1, Heading::Move(Direction::Right), next);
        frontier.relax(index + 1, Heading::Move(Direction::Left), next);
    }

    let mut distances = Vec::with_capacity(rows * columns);
    let mut headings = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        let start = (row + 1) * frontier.width + 1;
        distances.extend_from_slice(&frontier.distances[start..start + columns]);
        headings.extend_from_slice(&frontier.headings[start..start + columns]);
    }
    let fully_reachable =
        headings.contains(&Heading::Goal) && !headings.contains(&Heading::Blank);

    SolvedMaze {
        rows: grid.rows(),
        columns: grid.columns(),
        distances,
        headings,
        fully_reachable,
    }
}

/// Working state of the search over a copy of the grid framed by a wall border.
struct Frontier {
    width: usize,
    consumed: Vec<bool>,
    distances: Vec<i32>,
    headings: Vec<Heading>,
    queue: VecDeque<usize>,
}

impl Frontier {
    fn bordered(grid: &Grid, rows: usize, columns: usize) -> Self {
        let width = columns + 2;
        let count = (rows + 2) * width;
        let mut consumed = vec![true; count];
        let mut headings = vec![Heading::Unreachable; count];

        for (offset, code) in grid.cells().iter().enumerate() {
            if code.is_passable() {
                let index = (offset / columns.max(1) + 1) * width + offset % columns.max(1) + 1;
                consumed[index] = false;
                headings[index] = Heading::Blank;
            }
        }

        Self {
            width,
            consumed,
            distances: vec![-1; count],
            headings,
            queue: VecDeque::new(),
        }
    }

    fn index(&self, cell: CellCoord) -> usize {
        let row = usize::try_from(cell.row()).unwrap_or(0);
        let column = usize::try_from(cell.column()).unwrap_or(0);
        (row + 1) * self.width + column + 1
    }

    fn relax(&mut self, index: usize, heading: Heading, distance: i32) {
        if self.consumed[index] {
            return;
        }
        self.consumed[index] = true;
        self.distances[index] = distance;
        self.headings[index] = heading;
        self.queue.push_back(index);
    }
}

impl SolvedMaze {
    /// Number of rows and columns covered by the fields.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Reports whether every open cell received a finite distance.
    ///
    /// A grid without any goal has no reachable region and is never fully
    /// reachable, even when it contains no open cells at all.
    #[must_use]
    pub const fn is_fully_reachable(&self) -> bool {
        self.fully_reachable
    }

    /// Heading stored for the cell; cells outside the grid are unreachable.
    #[must_use]
    pub fn heading(&self, cell: CellCoord) -> Heading {
        self.index(cell)
            .map_or(Heading::Unreachable, |index| self.headings[index])
    }

    /// Hop count from the cell to the nearest goal, if any goal is reachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        let index = self.index(cell)?;
        u32::try_from(self.distances[index]).ok()
    }

    /// Dense distance field in row-major order, `-1` marking unreached cells.
    #[must_use]
    pub fn distances(&self) -> &[i32] {
        &self.distances
    }

    /// Dense direction field in row-major order.
    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Follows the direction field from `start` to the first goal, inclusive.
    pub fn path(&self, start: CellCoord) -> Result<Vec<CellCoord>, PathError> {
        if !self.heading(start).is_routed() {
            return Err(PathError::UnreachablePoint { cell: start });
        }

        let limit = self.distances.len() + 1;
        let mut path = vec![start];
        let mut current = start;
        loop {
            let heading = self.heading(current);
            if heading == Heading::Goal {
                return Ok(path);
            }
            if path.len() >= limit {
                return Err(PathError::CorruptPath { start, limit });
            }

            let next = heading
                .offset()
                .and_then(|offset| current.offset(offset))
                .filter(|cell| self.index(*cell).is_some());
            let Some(next) = next else {
                return Err(PathError::CorruptPath { start, limit });
            };
            path.push(next);
            current = next;
        }
    }

    /// Text rendering of the distance field, one matrix row per line.
    #[must_use]
    pub fn distances_table(&self) -> DistanceTable<'_> {
        DistanceTable { maze: self }
    }

    /// Text rendering of the direction field, one matrix row per line.
    #[must_use]
    pub fn headings_table(&self) -> HeadingTable<'_> {
        HeadingTable { maze: self }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() >= self.rows || cell.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

fn matrix_rows<T>(values: &[T], columns: u32) -> std::slice::Chunks<'_, T> {
    values.chunks(usize::try_from(columns).unwrap_or(1).max(1))
}

/// Display adapter printing the distance field as a right-aligned matrix.
#[derive(Clone, Copy, Debug)]
pub struct DistanceTable<'a> {
    maze: &'a SolvedMaze,
}

impl fmt::Display for DistanceTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .maze
            .distances
            .iter()
            .map(|distance| distance.to_string().len())
            .max()
            .unwrap_or(1);
        for row in matrix_rows(&self.maze.distances, self.maze.columns) {
            let line: Vec<String> = row
                .iter()
                .map(|distance| format!("{distance:>width$}"))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Display adapter printing the direction field with one symbol per cell.
#[derive(Clone, Copy, Debug)]
pub struct HeadingTable<'a> {
    maze: &'a SolvedMaze,
}

impl fmt::Display for HeadingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in matrix_rows(&self.maze.headings, self.maze.columns) {
            let line: String = row.iter().map(|heading| heading.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
