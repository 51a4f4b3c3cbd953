#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editing system that turns pointer input into grid mutation commands.

use maze_runner_core::{CellCode, CellCoord, Command, Event, Occupancy, PlayMode};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player painted the hovered cell on this frame.
    pub paint: bool,
    /// Indicates whether the player erased the hovered cell on this frame.
    pub erase: bool,
    /// Cell currently hovered by the cursor.
    pub cursor_cell: Option<CellCoord>,
    /// Code written by a paint action while editing.
    pub selected: CellCode,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        paint: bool,
        erase: bool,
        cursor_cell: Option<CellCoord>,
        selected: CellCode,
    ) -> Self {
        Self {
            paint,
            erase,
            cursor_cell,
            selected,
        }
    }
}

impl Default for BuilderInput {
    fn default() -> Self {
        Self::new(false, false, None, CellCode::WALL)
    }
}

/// Editing system that translates input into cell and wall commands.
#[derive(Debug, Clone)]
pub struct Builder {
    play_mode: PlayMode,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            play_mode: PlayMode::Edit,
        }
    }

    /// Mode the builder believes the world is in.
    #[must_use]
    pub const fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    /// Consumes world events and adapter-derived input to emit editing commands.
    ///
    /// `occupancy` describes where the actors are; it is forwarded with wall
    /// placement requests so the world can refuse them.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        occupancy: &Occupancy,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PlayModeChanged { mode } = event {
                self.play_mode = *mode;
            }
        }

        let Some(cell) = input.cursor_cell else {
            return;
        };

        match self.play_mode {
            PlayMode::Edit => {
                if input.paint {
                    out.push(Command::SetCell {
                        cell,
                        code: input.selected,
                    });
                } else if input.erase {
                    out.push(Command::SetCell {
                        cell,
                        code: CellCode::OPEN,
                    });
                }
            }
            PlayMode::Play => {
                if input.paint {
                    out.push(Command::PlaceWall {
                        cell,
                        occupancy: occupancy.clone(),
                    });
                }
            }
        }
    }
}
