//! Per-kind movement policies layered on top of the direction field.

use maze_runner_core::{ActorKind, CellCoord, Grid, Offset};
use maze_runner_world::navigation::SolvedMaze;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::motion::{FAST_STEP_SECONDS, STEP_SECONDS};

/// Odds, as one in this many, that a confused actor ignores the direction field.
pub const CONFUSION_ODDS: u32 = 3;
/// Chance, out of [`TELEPORT_DRAWS`], that a teleporting actor tries to jump away.
pub const TELEPORT_CHANCE: u32 = 2;
/// Denominator of the teleport chance.
pub const TELEPORT_DRAWS: u32 = 11;
/// Teleport targets must lie strictly farther than this from every goal.
pub const TELEPORT_MIN_DISTANCE: u32 = 5;
/// Step duration multiplier applied while an accelerating actor keeps its course.
pub const ACCELERATION_FACTOR: f32 = 0.9;
/// Weight of the fresh random draw in the wall follower's pace.
pub const WALL_FOLLOWER_JITTER: f32 = 0.7;
/// Weight of the previous pace in the wall follower's pace.
pub const WALL_FOLLOWER_MEMORY: f32 = 0.3;

/// Read-only surroundings an actor consults when deciding its next move.
#[derive(Clone, Copy)]
pub(crate) struct Surroundings<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) maze: &'a SolvedMaze,
}

impl Surroundings<'_> {
    /// Neighbour in `offset` direction, if it exists and is not a wall.
    fn open_neighbour(&self, cell: CellCoord, offset: Offset) -> Option<CellCoord> {
        cell.offset(offset)
            .filter(|next| self.grid.get(*next).is_some_and(|code| code.is_passable()))
    }

    fn is_open(&self, cell: CellCoord, offset: Offset) -> bool {
        self.open_neighbour(cell, offset).is_some()
    }
}

/// Next action chosen by a behavior for an actor resting on a routed cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Decision {
    /// Walk to the neighbour in `offset` direction over `seconds`.
    Step { offset: Offset, seconds: f32 },
    /// Relocate to a distant cell, bracketed by shivers.
    Teleport { target: CellCoord },
    /// Hop in place.
    Idle,
    /// Nothing acceptable was drawn; evaluate again at the same instant.
    Reroll,
}

/// Behavior policy and its private state.
#[derive(Clone, Debug)]
pub(crate) enum Behavior {
    Direct,
    Fast,
    Accelerating {
        last: Option<Offset>,
        factor: f32,
    },
    Confused {
        came_from: Option<CellCoord>,
    },
    Teleporting,
    WallFollower {
        last: Option<Offset>,
        seeking: bool,
        pace: f32,
    },
}

impl Behavior {
    pub(crate) fn for_kind(kind: ActorKind) -> Self {
        match kind {
            ActorKind::Direct => Self::Direct,
            ActorKind::Fast => Self::Fast,
            ActorKind::Accelerating => Self::Accelerating {
                last: None,
                factor: 1.0,
            },
            ActorKind::Confused => Self::Confused { came_from: None },
            ActorKind::Teleporting => Self::Teleporting,
            ActorKind::WallFollower => Self::WallFollower {
                last: None,
                seeking: true,
                pace: 1.0,
            },
        }
    }

    /// Chooses the next action for an actor resting on `cell`.
    ///
    /// `field` is the direction field's offset for `cell`; callers handle
    /// goal and unrouted cells before consulting the behavior.
    pub(crate) fn decide(
        &mut self,
        cell: CellCoord,
        field: Offset,
        surroundings: Surroundings<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Decision {
        match self {
            Self::Direct => Decision::Step {
                offset: field,
                seconds: STEP_SECONDS,
            },
            Self::Fast => Decision::Step {
                offset: field,
                seconds: FAST_STEP_SECONDS,
            },
            Self::Accelerating { last, factor } => {
                if *last == Some(field) {
                    *factor *= ACCELERATION_FACTOR;
                } else {
                    *factor = 1.0;
                }
                *last = Some(field);
                Decision::Step {
                    offset: field,
                    seconds: STEP_SECONDS * *factor,
                }
            }
            Self::Confused { came_from } => {
                let mut offset = field;
                if rng.gen_range(0..CONFUSION_ODDS) == 0 {
                    let wander = Offset::CARDINALS[rng.gen_range(0..Offset::CARDINALS.len())];
                    if surroundings.is_open(cell, wander) {
                        offset = wander;
                    }
                }

                let Some(next) = surroundings.open_neighbour(cell, offset) else {
                    return Decision::Reroll;
                };
                if let Some(origin) = *came_from {
                    let has_alternative = Offset::CARDINALS.iter().any(|candidate| {
                        surroundings
                            .open_neighbour(cell, *candidate)
                            .is_some_and(|neighbour| neighbour != origin)
                    });
                    if next == origin && has_alternative {
                        return Decision::Reroll;
                    }
                }

                *came_from = Some(cell);
                Decision::Step {
                    offset,
                    seconds: STEP_SECONDS,
                }
            }
            Self::Teleporting => {
                if rng.gen_range(0..TELEPORT_DRAWS) < TELEPORT_CHANCE {
                    let target = CellCoord::new(
                        rng.gen_range(0..surroundings.grid.rows()),
                        rng.gen_range(0..surroundings.grid.columns()),
                    );
                    let passable = surroundings
                        .grid
                        .get(target)
                        .is_some_and(|code| code.is_passable());
                    let distant = surroundings
                        .maze
                        .distance(target)
                        .is_some_and(|distance| distance > TELEPORT_MIN_DISTANCE);
                    if passable && distant {
                        return Decision::Teleport { target };
                    }
                }
                Decision::Step {
                    offset: field,
                    seconds: STEP_SECONDS,
                }
            }
            Self::WallFollower {
                last,
                seeking,
                pace,
            } => {
                let mut offset = match *last {
                    None => field,
                    Some(previous) => {
                        if !surroundings.is_open(cell, previous.rotate_clockwise()) {
                            *seeking = false;
                            previous
                        } else if !*seeking {
                            previous.rotate_clockwise()
                        } else {
                            field
                        }
                    }
                };

                let mut turns = 0;
                while !surroundings.is_open(cell, offset) {
                    if turns == 3 {
                        return Decision::Idle;
                    }
                    offset = offset.rotate_counter_clockwise();
                    turns += 1;
                }

                let draw: f32 = rng.gen();
                *pace = (1.0 - draw) * WALL_FOLLOWER_JITTER + *pace * WALL_FOLLOWER_MEMORY;
                *last = Some(offset);
                Decision::Step {
                    offset,
                    seconds: STEP_SECONDS * *pace,
                }
            }
        }
    }
}
