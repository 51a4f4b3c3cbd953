//! Per-cell link masks describing the routes every spawn point takes to a goal.

use std::fmt;

use maze_runner_core::{CellCoord, Direction, Grid, Heading};

use crate::navigation::{PathError, SolvedMaze};

/// Four link bits for a cell, ordered up, right, down, left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinkMask(u8);

impl LinkMask {
    /// Mask without any links.
    pub const EMPTY: LinkMask = LinkMask(0);

    /// Builds a mask from the four link flags.
    #[must_use]
    pub const fn from_links(up: bool, right: bool, down: bool, left: bool) -> Self {
        Self((up as u8) | (right as u8) << 1 | (down as u8) << 2 | (left as u8) << 3)
    }

    /// Reports whether the cell links toward the neighbour in `direction`.
    #[must_use]
    pub const fn links(&self, direction: Direction) -> bool {
        self.0 & bit(direction) != 0
    }

    /// Reports whether no route crosses the cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    fn insert(&mut self, direction: Direction) {
        self.0 |= bit(direction);
    }
}

const fn bit(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 1,
        Direction::Right => 1 << 1,
        Direction::Down => 1 << 2,
        Direction::Left => 1 << 3,
    }
}

impl fmt::Display for LinkMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
            f.write_str(if self.links(direction) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Link masks for every cell of a grid in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathOverlay {
    columns: u32,
    masks: Vec<LinkMask>,
}

impl PathOverlay {
    /// Mask stored for the cell, if it lies inside the grid.
    #[must_use]
    pub fn mask(&self, cell: CellCoord) -> Option<LinkMask> {
        if cell.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.masks.get(row * width + column).copied()
    }

    /// Dense masks in row-major order.
    #[must_use]
    pub fn masks(&self) -> &[LinkMask] {
        &self.masks
    }
}

impl fmt::Display for PathOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        for row in self.masks.chunks(width) {
            let line: Vec<String> = row.iter().map(LinkMask::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Traces the path of every spawn point and merges their links.
///
/// Spawn points without a route are skipped. Each cell on a path links to the
/// neighbour it was entered from and, unless it is the goal, to the neighbour
/// it leaves toward; the first cell has no predecessor and reuses its exit.
pub fn build(grid: &Grid, maze: &SolvedMaze) -> Result<PathOverlay, PathError> {
    let (rows, columns) = maze.dimensions();
    let count = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
    let mut overlay = PathOverlay {
        columns,
        masks: vec![LinkMask::EMPTY; count],
    };
    let width = usize::try_from(columns).unwrap_or(0);

    for (spawn, _) in grid.spawns() {
        let path = match maze.path(spawn) {
            Ok(path) => path,
            Err(PathError::UnreachablePoint { .. }) => continue,
            Err(error) => return Err(error),
        };

        let Heading::Move(mut entry) = maze.heading(spawn) else {
            continue;
        };
        for cell in path {
            let index = usize::try_from(cell.row()).unwrap_or(0) * width
                + usize::try_from(cell.column()).unwrap_or(0);
            let Some(mask) = overlay.masks.get_mut(index) else {
                continue;
            };
            mask.insert(entry);
            if let Heading::Move(exit) = maze.heading(cell) {
                mask.insert(exit);
                entry = exit.opposite();
            }
        }
    }

    Ok(overlay)
}
