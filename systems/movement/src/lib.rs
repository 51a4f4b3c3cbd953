#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement engine that animates every actor of a play session.
//!
//! Each actor is a resumable state machine that reads the world's direction
//! field, picks its next move according to its behavior and interpolates its
//! position over simulated time. The engine multiplexes all actors onto a
//! single clock advanced by [`Movement::tick`], resuming every actor at the
//! exact instants it asked to wake up, and reports position changes and
//! terminal events through the [`Host`] contract.

mod actor;
mod behavior;
mod host;
mod motion;

use std::time::Duration;

use maze_runner_core::{ActorId, ActorView, Occupancy, SessionOutcome};
use maze_runner_world::{query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::{
    actor::{Actor, Context, Terminal},
    behavior::Surroundings,
};

pub use behavior::{
    ACCELERATION_FACTOR, CONFUSION_ODDS, TELEPORT_CHANCE, TELEPORT_DRAWS, TELEPORT_MIN_DISTANCE,
    WALL_FOLLOWER_JITTER, WALL_FOLLOWER_MEMORY,
};
pub use host::Host;
pub use motion::{
    FAST_STEP_SECONDS, INTRO_JUMP_SECONDS, JUMP_SECONDS, SHIVER_SECONDS, STEP_SECONDS,
};

const DEFAULT_CELL_SIZE_FLOOR: f32 = 1.0;
const DEFAULT_REROLL_LIMIT: u32 = 64;

/// Configuration parameters required to construct the movement engine.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    cell_size_floor: f32,
    reroll_limit: u32,
}

impl Config {
    /// Creates a configuration seeding every random decision from `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            cell_size_floor: DEFAULT_CELL_SIZE_FLOOR,
            reroll_limit: DEFAULT_REROLL_LIMIT,
        }
    }

    /// Smallest cell size used for pacing, whatever the host reports.
    #[must_use]
    pub const fn with_cell_size_floor(mut self, cell_size_floor: f32) -> Self {
        self.cell_size_floor = cell_size_floor;
        self
    }

    /// Number of rejected draws after which an actor waits for the next tick.
    #[must_use]
    pub const fn with_reroll_limit(mut self, reroll_limit: u32) -> Self {
        self.reroll_limit = reroll_limit;
        self
    }

    /// Seed used for every random decision of a session.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Drives all actors of the current play session.
#[derive(Debug)]
pub struct Movement {
    config: Config,
    rng: ChaCha8Rng,
    actors: Vec<Actor>,
    clock: Duration,
    running: bool,
}

impl Movement {
    /// Creates an idle engine using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            actors: Vec::new(),
            clock: Duration::ZERO,
            running: false,
        }
    }

    /// Spawns one actor per spawn marker of the world's grid and restarts the clock.
    pub fn start(&mut self, world: &World) {
        self.rng = ChaCha8Rng::seed_from_u64(self.config.rng_seed);
        self.clock = Duration::ZERO;
        self.actors = query::spawns(world)
            .into_iter()
            .zip(0u32..)
            .filter_map(|((cell, code), id)| {
                code.actor_kind()
                    .map(|kind| Actor::spawn(ActorId::new(id), cell, code, kind))
            })
            .collect();
        self.running = true;
        info!(
            actors = self.actors.len(),
            seed = self.config.rng_seed,
            "movement session started"
        );
    }

    /// Advances the clock by `dt`, resuming every actor whose wake-up time falls inside it.
    ///
    /// Returns the session outcome exactly once, from the tick in which the
    /// first actor reaches a goal or finds itself without a route. No actor is
    /// resumed after that.
    pub fn tick<H: Host + ?Sized>(
        &mut self,
        dt: Duration,
        world: &World,
        host: &mut H,
    ) -> Option<SessionOutcome> {
        if !self.running {
            return None;
        }

        let horizon = self.clock.saturating_add(dt);
        let context = Context {
            surroundings: Surroundings {
                grid: query::grid(world),
                maze: query::solution(world),
            },
            cell_size: host.cell_size().max(self.config.cell_size_floor),
            reroll_limit: self.config.reroll_limit,
        };
        for actor in &mut self.actors {
            actor.unpark(self.clock);
        }

        loop {
            let next = self
                .actors
                .iter()
                .enumerate()
                .filter_map(|(index, actor)| actor.wake().map(|wake| (wake, actor.id(), index)))
                .filter(|(wake, _, _)| *wake <= horizon)
                .min();
            let Some((wake, _, index)) = next else {
                break;
            };

            self.clock = self.clock.max(wake);
            if let Some(terminal) = self.actors[index].resume(self.clock, &context, &mut self.rng, host)
            {
                return Some(self.finish(index, terminal, host));
            }
        }

        self.clock = horizon;
        None
    }

    fn finish<H: Host + ?Sized>(
        &mut self,
        index: usize,
        terminal: Terminal,
        host: &mut H,
    ) -> SessionOutcome {
        self.running = false;
        let actor = self.actors[index].id();
        let outcome = match terminal {
            Terminal::GoalReached => {
                let intro = Duration::try_from_secs_f32(INTRO_JUMP_SECONDS).unwrap_or_default();
                let elapsed = self.clock.saturating_sub(intro);
                host.goal_reached(actor, elapsed);
                SessionOutcome::GoalReached { actor, elapsed }
            }
            Terminal::NoPath => {
                host.no_path(actor);
                SessionOutcome::NoPath { actor }
            }
        };
        info!(?outcome, clock = ?self.clock, "movement session finished");
        outcome
    }

    /// Stops the session and tears every actor down.
    pub fn cancel(&mut self) {
        if self.running {
            info!(clock = ?self.clock, "movement session cancelled");
        }
        self.running = false;
        self.actors.clear();
    }

    /// Reports whether actors are still being resumed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Simulated time since the session started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.clock
    }

    /// Captures the current position of every actor.
    #[must_use]
    pub fn view(&self) -> ActorView {
        ActorView::from_snapshots(self.actors.iter().map(Actor::snapshot).collect())
    }

    /// Cells overlapped and stood on by the actors right now.
    #[must_use]
    pub fn occupancy(&self) -> Occupancy {
        self.view().occupancy()
    }
}
