#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze runner.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Describes the active mode of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Cells may be painted freely and actors are not running.
    Edit,
    /// Actors traverse the maze; only wall placement may mutate the grid.
    Play,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid with an all-open grid of the provided dimensions.
    ConfigureGrid {
        /// Number of rows in the new grid.
        rows: u32,
        /// Number of columns in the new grid.
        columns: u32,
    },
    /// Replaces the grid with a grid produced externally (loaded or generated).
    LoadGrid {
        /// Grid that becomes authoritative.
        grid: Grid,
    },
    /// Assigns a cell code while editing the maze.
    SetCell {
        /// Cell being edited.
        cell: CellCoord,
        /// Code written into the cell.
        code: CellCode,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Requests that an open cell be blocked while actors are running.
    PlaceWall {
        /// Cell that should become a wall.
        cell: CellCoord,
        /// Cells currently claimed by live actors.
        occupancy: Occupancy,
    },
    /// Ends the running play session and restores the pre-play grid.
    EndPlay {
        /// Terminal condition that ended the session.
        outcome: SessionOutcome,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the whole grid was replaced.
    GridReplaced {
        /// Number of rows in the new grid.
        rows: u32,
        /// Number of columns in the new grid.
        columns: u32,
    },
    /// Reports that a replacement grid was refused.
    GridRejected {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
        /// Why the dimensions cannot form a grid.
        reason: GridShapeError,
    },
    /// Confirms that a single cell changed its code.
    CellChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// Code stored before the change.
        from: CellCode,
        /// Code stored after the change.
        to: CellCode,
    },
    /// Reports that the navigation fields were recomputed.
    MazeSolved {
        /// Whether every open cell received a finite distance.
        fully_reachable: bool,
    },
    /// Reports that an edit request was refused.
    CellEditRejected {
        /// Cell targeted by the edit.
        cell: CellCoord,
        /// Specific reason the edit failed.
        reason: EditError,
    },
    /// Announces that the world entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that a wall was placed during play.
    WallPlaced {
        /// Cell that became a wall.
        cell: CellCoord,
    },
    /// Reports that a wall placement request was rejected.
    WallPlacementRejected {
        /// Cell targeted by the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces the end of a play session.
    PlayEnded {
        /// Terminal condition that ended the session.
        outcome: SessionOutcome,
    },
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Cell reached by applying `offset`, or `None` when it would leave the
    /// non-negative quadrant.
    #[must_use]
    pub fn offset(self, offset: Offset) -> Option<CellCoord> {
        let row = self.row.checked_add_signed(offset.d_row())?;
        let column = self.column.checked_add_signed(offset.d_column())?;
        Some(CellCoord::new(row, column))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row().abs_diff(other.row()) + self.column().abs_diff(other.column())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Integer code stored in a grid cell.
///
/// Negative values are walls, `0` is open floor, `1` marks a goal and values
/// of `2` or more mark actor spawn points whose value selects the behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCode(i32);

impl CellCode {
    /// Canonical wall code.
    pub const WALL: CellCode = CellCode(-1);
    /// Open floor.
    pub const OPEN: CellCode = CellCode(0);
    /// Goal cell that actors try to reach.
    pub const GOAL: CellCode = CellCode(1);

    /// Wraps a raw cell value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw cell value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Reports whether the code blocks movement.
    #[must_use]
    pub const fn is_wall(&self) -> bool {
        self.0 < 0
    }

    /// Reports whether the code is plain open floor.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.0 == 0
    }

    /// Reports whether the code marks a goal.
    #[must_use]
    pub const fn is_goal(&self) -> bool {
        self.0 == 1
    }

    /// Reports whether an actor may stand on the cell.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.0 >= 0
    }

    /// Behavior selected by a spawn marker, if the code is one.
    #[must_use]
    pub const fn actor_kind(&self) -> Option<ActorKind> {
        ActorKind::from_code(*self)
    }
}

/// Behavior policies available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Follows the wall on its right hand once it finds one.
    WallFollower,
    /// Occasionally wanders off in a random direction.
    Confused,
    /// Follows the direction field with shorter steps.
    Fast,
    /// Speeds up while it keeps moving in a straight line.
    Accelerating,
    /// Occasionally teleports to a distant open cell.
    Teleporting,
    /// Follows the direction field at the base pace.
    Direct,
}

impl ActorKind {
    /// Maps a spawn marker to its behavior.
    #[must_use]
    pub const fn from_code(code: CellCode) -> Option<Self> {
        match code.get() {
            i32::MIN..=1 => None,
            2 => Some(Self::WallFollower),
            3 => Some(Self::Confused),
            4 => Some(Self::Fast),
            5 => Some(Self::Accelerating),
            6 => Some(Self::Teleporting),
            _ => Some(Self::Direct),
        }
    }
}

/// Reasons a grid cannot be built from raw rows.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridShapeError {
    /// The grid had no rows or no columns.
    #[error("grid must contain at least one row and one column")]
    Empty,
    /// A row length differed from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The grid dimensions do not fit the coordinate type.
    #[error("grid dimensions exceed the supported range")]
    TooLarge,
    /// The stored cells disagree with the declared dimensions.
    #[error("grid declares {expected} cells but stores {found}")]
    CellCount {
        /// Product of the declared dimensions.
        expected: usize,
        /// Number of stored cells.
        found: usize,
    },
}

/// Rectangular array of cell codes stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<CellCode>,
}

/// Unchecked wire form of [`Grid`].
#[derive(Deserialize)]
struct RawGrid {
    rows: u32,
    columns: u32,
    cells: Vec<CellCode>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridShapeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let expected = cell_count(raw.rows, raw.columns)?;
        if raw.cells.len() != expected {
            return Err(GridShapeError::CellCount {
                expected,
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            rows: raw.rows,
            columns: raw.columns,
            cells: raw.cells,
        })
    }
}

fn cell_count(rows: u32, columns: u32) -> Result<usize, GridShapeError> {
    if rows == 0 || columns == 0 {
        return Err(GridShapeError::Empty);
    }
    usize::try_from(u64::from(rows) * u64::from(columns)).map_err(|_| GridShapeError::TooLarge)
}

impl Grid {
    /// Creates an all-open grid, raising dimensions below one to one.
    #[must_use]
    pub fn new(rows: u32, columns: u32) -> Self {
        let rows = rows.max(1);
        let columns = columns.max(1);
        let count = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        Self {
            rows,
            columns,
            cells: vec![CellCode::OPEN; count],
        }
    }

    /// Creates an all-open grid, refusing empty or oversized dimensions.
    pub fn open(rows: u32, columns: u32) -> Result<Self, GridShapeError> {
        let count = cell_count(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            cells: vec![CellCode::OPEN; count],
        })
    }

    /// Builds a grid from raw rows of cell values.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, GridShapeError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridShapeError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridShapeError::Ragged {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend(row.iter().copied().map(CellCode::new));
        }

        Ok(Self {
            rows: u32::try_from(rows.len()).map_err(|_| GridShapeError::TooLarge)?,
            columns: u32::try_from(expected).map_err(|_| GridShapeError::TooLarge)?,
            cells,
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Code stored at the cell, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellCode> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Stores `code` at the cell and returns the previous code.
    pub fn set(&mut self, cell: CellCoord, code: CellCode) -> Option<CellCode> {
        let index = self.index(cell)?;
        Some(std::mem::replace(&mut self.cells[index], code))
    }

    /// Dense cell codes in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellCode] {
        &self.cells
    }

    /// Iterates all cells in row-major order together with their codes.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellCoord, CellCode)> + '_ {
        let columns = self.columns.max(1);
        (0u32..).zip(self.cells.iter().copied()).map(move |(index, code)| {
            (CellCoord::new(index / columns, index % columns), code)
        })
    }

    /// Goal cells in row-major order.
    #[must_use]
    pub fn goals(&self) -> Vec<CellCoord> {
        self.iter_cells()
            .filter(|(_, code)| code.is_goal())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Actor spawn markers in row-major order.
    #[must_use]
    pub fn spawns(&self) -> Vec<(CellCoord, CellCode)> {
        self.iter_cells()
            .filter(|(_, code)| code.actor_kind().is_some())
            .collect()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Unit offset travelled by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> Offset {
        match self {
            Self::Up => Offset::UP,
            Self::Down => Offset::DOWN,
            Self::Left => Offset::LEFT,
            Self::Right => Offset::RIGHT,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Arrow symbol used by text dumps of the direction field.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => '^',
            Self::Down => 'v',
            Self::Left => '<',
            Self::Right => '>',
        }
    }
}

/// Signed unit displacement between neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    d_row: i32,
    d_column: i32,
}

impl Offset {
    /// One row up.
    pub const UP: Offset = Offset::new(-1, 0);
    /// One row down.
    pub const DOWN: Offset = Offset::new(1, 0);
    /// One column left.
    pub const LEFT: Offset = Offset::new(0, -1);
    /// One column right.
    pub const RIGHT: Offset = Offset::new(0, 1);
    /// The four unit offsets in the order used for random picks.
    pub const CARDINALS: [Offset; 4] = [Offset::DOWN, Offset::RIGHT, Offset::UP, Offset::LEFT];

    /// Creates an offset from row and column deltas.
    #[must_use]
    pub const fn new(d_row: i32, d_column: i32) -> Self {
        Self { d_row, d_column }
    }

    /// Row delta.
    #[must_use]
    pub const fn d_row(&self) -> i32 {
        self.d_row
    }

    /// Column delta.
    #[must_use]
    pub const fn d_column(&self) -> i32 {
        self.d_column
    }

    /// Quarter turn to the right of the travel direction.
    #[must_use]
    pub const fn rotate_clockwise(self) -> Self {
        Self::new(self.d_column, -self.d_row)
    }

    /// Quarter turn to the left of the travel direction.
    #[must_use]
    pub const fn rotate_counter_clockwise(self) -> Self {
        Self::new(-self.d_column, self.d_row)
    }
}

/// Navigation tag stored for every cell of the direction field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Step in this direction to make optimal progress toward a goal.
    Move(Direction),
    /// The cell is a goal.
    Goal,
    /// Open cell with no known route to any goal.
    Blank,
    /// Wall or border cell.
    Unreachable,
}

impl Heading {
    /// Offset to follow from this cell, if the heading is a move.
    #[must_use]
    pub const fn offset(self) -> Option<Offset> {
        match self {
            Self::Move(direction) => Some(direction.offset()),
            _ => None,
        }
    }

    /// Reports whether an actor standing here knows how to reach a goal.
    #[must_use]
    pub const fn is_routed(self) -> bool {
        matches!(self, Self::Move(_) | Self::Goal)
    }

    /// Single character used by text dumps of the direction field.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Move(direction) => direction.symbol(),
            Self::Goal => 'X',
            Self::Blank => ' ',
            Self::Unreachable => '#',
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unique identifier assigned to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fractional actor position measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    /// Row coordinate; fractional while the actor is moving.
    pub row: f32,
    /// Column coordinate; fractional while the actor is moving.
    pub column: f32,
}

impl Position {
    /// Position resting exactly on a cell.
    #[must_use]
    pub fn at(cell: CellCoord) -> Self {
        Self {
            row: cell.row() as f32,
            column: cell.column() as f32,
        }
    }

    /// Cell containing the position, rounded down.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        CellCoord::new(
            self.row.max(0.0).floor() as u32,
            self.column.max(0.0).floor() as u32,
        )
    }

    /// Cell nearest to the position; the cell an actor counts as standing on.
    #[must_use]
    pub fn nearest(&self) -> CellCoord {
        CellCoord::new(
            self.row.max(0.0).round() as u32,
            self.column.max(0.0).round() as u32,
        )
    }

    /// Every cell the actor overlaps, i.e. the floor and ceiling cells on both axes.
    #[must_use]
    pub fn footprint(&self) -> Vec<CellCoord> {
        let rows = span(self.row);
        let columns = span(self.column);
        let mut cells = Vec::with_capacity(4);
        for row in rows.0..=rows.1 {
            for column in columns.0..=columns.1 {
                cells.push(CellCoord::new(row, column));
            }
        }
        cells
    }
}

fn span(value: f32) -> (u32, u32) {
    let low = value.floor().max(0.0) as u32;
    let high = value.ceil().max(0.0) as u32;
    (low, high.max(low))
}

/// Immutable representation of a single actor used for queries and host callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: ActorId,
    /// Behavior policy driving the actor.
    pub kind: ActorKind,
    /// Spawn marker the actor was created from; hosts use it to pick a sprite.
    pub code: CellCode,
    /// Current position of the actor.
    pub position: Position,
}

/// Read-only snapshot describing all live actors.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Cells overlapped and stood on by the captured actors.
    #[must_use]
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::new(
            self.snapshots
                .iter()
                .flat_map(|snapshot| snapshot.position.footprint())
                .collect(),
            self.snapshots
                .iter()
                .map(|snapshot| snapshot.position.nearest())
                .collect(),
        )
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Cells claimed by live actors when a wall is requested.
///
/// The footprint holds every cell an actor overlaps, including the neighbour
/// a hop or shiver leans into; no wall may go there. The standing cells are
/// the rounded actor positions, which must keep a route after the wall.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Occupancy {
    footprint: Vec<CellCoord>,
    standing: Vec<CellCoord>,
}

impl Occupancy {
    /// Creates an occupancy from raw footprint and standing cells.
    #[must_use]
    pub fn new(mut footprint: Vec<CellCoord>, mut standing: Vec<CellCoord>) -> Self {
        footprint.sort();
        footprint.dedup();
        standing.sort();
        standing.dedup();
        Self {
            footprint,
            standing,
        }
    }

    /// Occupancy of actors resting exactly on the provided cells.
    #[must_use]
    pub fn resting(cells: Vec<CellCoord>) -> Self {
        Self::new(cells.clone(), cells)
    }

    /// Every cell overlapped by an actor, sorted.
    #[must_use]
    pub fn footprint(&self) -> &[CellCoord] {
        &self.footprint
    }

    /// Cell each actor stands on, sorted.
    #[must_use]
    pub fn standing(&self) -> &[CellCoord] {
        &self.standing
    }

    /// Reports whether any actor overlaps the cell.
    #[must_use]
    pub fn covers(&self, cell: CellCoord) -> bool {
        self.footprint.binary_search(&cell).is_ok()
    }
}

/// Terminal condition of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// An actor reached a goal cell.
    GoalReached {
        /// Actor that arrived first.
        actor: ActorId,
        /// Play time excluding the opening jump.
        elapsed: Duration,
    },
    /// An actor stood on a cell without a route to any goal.
    NoPath {
        /// Actor that detected the missing route.
        actor: ActorId,
    },
    /// The host stopped play.
    Stopped,
}

/// Reasons a wall placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// No play session is running.
    InvalidMode,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is not plain open floor.
    NotOpen,
    /// A live actor overlaps the requested cell.
    Occupied,
    /// The wall would leave a live actor without a route to any goal.
    WouldStrand,
}

/// Reasons an edit request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditError {
    /// Cells can only be painted while editing.
    InvalidMode,
    /// The requested cell lies outside the grid.
    OutOfBounds,
}

#[cfg(test)]
mod tests {
    use super::{
        ActorId, ActorKind, ActorSnapshot, ActorView, CellCode, CellCoord, Direction, Grid,
        GridShapeError, Heading, Offset, PlacementError, Position, SessionOutcome,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(3, 4);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn offset_refuses_to_leave_the_quadrant() {
        let origin = CellCoord::new(0, 2);
        assert_eq!(origin.offset(Offset::UP), None);
        assert_eq!(origin.offset(Offset::LEFT), Some(CellCoord::new(0, 1)));
        assert_eq!(origin.offset(Offset::DOWN), Some(CellCoord::new(1, 2)));
    }

    #[test]
    fn clockwise_rotation_follows_the_right_hand() {
        assert_eq!(Offset::UP.rotate_clockwise(), Offset::RIGHT);
        assert_eq!(Offset::RIGHT.rotate_clockwise(), Offset::DOWN);
        assert_eq!(Offset::DOWN.rotate_clockwise(), Offset::LEFT);
        assert_eq!(Offset::LEFT.rotate_clockwise(), Offset::UP);
        for offset in Offset::CARDINALS {
            assert_eq!(offset.rotate_clockwise().rotate_counter_clockwise(), offset);
        }
    }

    #[test]
    fn spawn_codes_select_behaviors() {
        assert_eq!(CellCode::WALL.actor_kind(), None);
        assert_eq!(CellCode::new(-2).actor_kind(), None);
        assert_eq!(CellCode::OPEN.actor_kind(), None);
        assert_eq!(CellCode::GOAL.actor_kind(), None);
        assert_eq!(CellCode::new(2).actor_kind(), Some(ActorKind::WallFollower));
        assert_eq!(CellCode::new(3).actor_kind(), Some(ActorKind::Confused));
        assert_eq!(CellCode::new(4).actor_kind(), Some(ActorKind::Fast));
        assert_eq!(CellCode::new(5).actor_kind(), Some(ActorKind::Accelerating));
        assert_eq!(CellCode::new(6).actor_kind(), Some(ActorKind::Teleporting));
        assert_eq!(CellCode::new(9).actor_kind(), Some(ActorKind::Direct));
        assert!(CellCode::new(-7).is_wall());
        assert!(CellCode::new(4).is_passable());
    }

    #[test]
    fn heading_symbols_match_text_dumps() {
        let symbols: String = [
            Heading::Move(Direction::Up),
            Heading::Move(Direction::Down),
            Heading::Move(Direction::Left),
            Heading::Move(Direction::Right),
            Heading::Goal,
            Heading::Blank,
            Heading::Unreachable,
        ]
        .iter()
        .map(|heading| heading.symbol())
        .collect();
        assert_eq!(symbols, "^v<>X #");
        assert!(Heading::Goal.is_routed());
        assert!(!Heading::Blank.is_routed());
        assert_eq!(Heading::Move(Direction::Left).offset(), Some(Offset::LEFT));
    }

    #[test]
    fn grid_rejects_ragged_rows() {
        let result = Grid::from_rows(vec![vec![0, 0, 0], vec![0, -1]]);
        assert_eq!(
            result,
            Err(GridShapeError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(Grid::from_rows(Vec::new()), Err(GridShapeError::Empty));
    }

    #[test]
    fn grid_lists_goals_and_spawns_in_row_major_order() {
        let grid = Grid::from_rows(vec![vec![0, 3, 1], vec![1, -1, 7]]).expect("valid grid");
        assert_eq!(grid.goals(), vec![CellCoord::new(0, 2), CellCoord::new(1, 0)]);
        assert_eq!(
            grid.spawns(),
            vec![
                (CellCoord::new(0, 1), CellCode::new(3)),
                (CellCoord::new(1, 2), CellCode::new(7)),
            ]
        );
    }

    #[test]
    fn grid_set_returns_previous_code() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(
            grid.set(CellCoord::new(1, 1), CellCode::WALL),
            Some(CellCode::OPEN)
        );
        assert_eq!(grid.get(CellCoord::new(1, 1)), Some(CellCode::WALL));
        assert_eq!(grid.set(CellCoord::new(2, 0), CellCode::WALL), None);
    }

    #[test]
    fn footprint_covers_neighbouring_cells_while_moving() {
        let resting = Position::at(CellCoord::new(2, 3));
        assert_eq!(resting.footprint(), vec![CellCoord::new(2, 3)]);

        let moving = Position {
            row: 2.0,
            column: 3.4,
        };
        assert_eq!(
            moving.footprint(),
            vec![CellCoord::new(2, 3), CellCoord::new(2, 4)]
        );
        assert_eq!(moving.cell(), CellCoord::new(2, 3));

        let jumping = Position {
            row: -0.2,
            column: 0.0,
        };
        assert_eq!(jumping.footprint(), vec![CellCoord::new(0, 0)]);
    }

    #[test]
    fn hopping_actor_stands_on_its_own_cell() {
        let hopping = Position {
            row: 1.8,
            column: 0.0,
        };
        let shivering = Position {
            row: 2.0,
            column: 2.76,
        };
        let view = ActorView::from_snapshots(
            [hopping, shivering]
                .into_iter()
                .zip(0u32..)
                .map(|(position, id)| ActorSnapshot {
                    id: ActorId::new(id),
                    kind: ActorKind::Direct,
                    code: CellCode::new(7),
                    position,
                })
                .collect(),
        );

        let occupancy = view.occupancy();

        assert_eq!(
            occupancy.footprint(),
            &[
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(2, 2),
                CellCoord::new(2, 3),
            ]
        );
        assert_eq!(
            occupancy.standing(),
            &[CellCoord::new(2, 0), CellCoord::new(2, 3)]
        );
        assert!(occupancy.covers(CellCoord::new(1, 0)));
        assert!(!occupancy.covers(CellCoord::new(1, 1)));
    }

    #[test]
    fn open_grid_requires_both_dimensions() {
        assert_eq!(Grid::open(0, 4), Err(GridShapeError::Empty));
        assert_eq!(Grid::open(3, 0), Err(GridShapeError::Empty));
        assert_eq!(Grid::open(2, 3), Ok(Grid::new(2, 3)));
        assert_eq!(Grid::new(0, 0), Grid::new(1, 1));
    }

    #[test]
    fn inconsistent_grid_is_refused_on_deserialize() {
        let bytes = bincode::serialize(&(2u32, 2u32, vec![CellCode::OPEN; 3])).expect("serialize");
        assert!(bincode::deserialize::<Grid>(&bytes).is_err());

        let bytes = bincode::serialize(&(0u32, 5u32, Vec::<CellCode>::new())).expect("serialize");
        assert!(bincode::deserialize::<Grid>(&bytes).is_err());
    }

    #[test]
    fn grid_round_trips_through_bincode() {
        let grid = Grid::from_rows(vec![vec![-1, 0], vec![1, 4]]).expect("valid grid");
        assert_round_trip(&grid);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::WouldStrand);
    }

    #[test]
    fn session_outcome_round_trips_through_bincode() {
        assert_round_trip(&SessionOutcome::GoalReached {
            actor: ActorId::new(3),
            elapsed: Duration::from_millis(1250),
        });
    }
}
