//! Resumable state machine driving a single actor.

use std::{collections::VecDeque, time::Duration};

use maze_runner_core::{ActorId, ActorKind, ActorSnapshot, CellCode, CellCoord, Heading, Position};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::{
    behavior::{Behavior, Decision, Surroundings},
    host::Host,
    motion::{Motion, PositionGuard, INTRO_JUMP_SECONDS, JUMP_SECONDS},
};

/// Number of shivers played on each side of a teleport.
const TELEPORT_SHIVERS: usize = 4;

/// Shared inputs for resuming actors during one tick.
pub(crate) struct Context<'a> {
    pub(crate) surroundings: Surroundings<'a>,
    pub(crate) cell_size: f32,
    pub(crate) reroll_limit: u32,
}

/// Conditions that end the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Terminal {
    GoalReached,
    NoPath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Spawned,
    Running,
}

#[derive(Clone, Copy, Debug)]
enum Planned {
    Motion(Motion),
    Relocate(CellCoord),
}

#[derive(Debug)]
pub(crate) struct Actor {
    body: ActorSnapshot,
    behavior: Behavior,
    phase: Phase,
    motion: Option<Motion>,
    plan: VecDeque<Planned>,
    wake: Duration,
    parked: bool,
}

impl Actor {
    pub(crate) fn spawn(id: ActorId, cell: CellCoord, code: CellCode, kind: ActorKind) -> Self {
        Self {
            body: ActorSnapshot {
                id,
                kind,
                code,
                position: Position::at(cell),
            },
            behavior: Behavior::for_kind(kind),
            phase: Phase::Spawned,
            motion: None,
            plan: VecDeque::new(),
            wake: Duration::ZERO,
            parked: false,
        }
    }

    pub(crate) fn snapshot(&self) -> ActorSnapshot {
        self.body
    }

    pub(crate) fn id(&self) -> ActorId {
        self.body.id
    }

    /// Instant the actor wants to be resumed, or `None` while it waits for the next tick.
    pub(crate) fn wake(&self) -> Option<Duration> {
        (!self.parked).then_some(self.wake)
    }

    pub(crate) fn unpark(&mut self, now: Duration) {
        if self.parked {
            self.parked = false;
            self.wake = now;
        }
    }

    /// Runs the actor until its next suspension point or a terminal condition.
    pub(crate) fn resume<H: Host + ?Sized>(
        &mut self,
        now: Duration,
        context: &Context<'_>,
        rng: &mut ChaCha8Rng,
        host: &mut H,
    ) -> Option<Terminal> {
        let mut rerolls = 0;
        loop {
            if let Some(motion) = self.motion.as_mut() {
                if let Some(position) = motion.sample(now) {
                    self.wake = now + motion.sample_delay(context.cell_size);
                    self.move_to(position, host);
                    return None;
                }
                let end = motion.end();
                self.motion = None;
                self.move_to(end, host);
                continue;
            }

            if let Some(planned) = self.plan.pop_front() {
                match planned {
                    Planned::Motion(motion) => self.motion = Some(motion),
                    Planned::Relocate(target) => self.move_to(Position::at(target), host),
                }
                continue;
            }

            let cell = self.body.position.cell();
            let heading = context.surroundings.maze.heading(cell);
            if self.phase == Phase::Spawned {
                if !heading.is_routed() {
                    return Some(Terminal::NoPath);
                }
                self.phase = Phase::Running;
                self.motion = Some(Motion::jump(self.body.position, INTRO_JUMP_SECONDS));
                continue;
            }

            let field = match heading {
                Heading::Goal => return Some(Terminal::GoalReached),
                Heading::Move(direction) => direction.offset(),
                Heading::Blank | Heading::Unreachable => return Some(Terminal::NoPath),
            };

            match self
                .behavior
                .decide(cell, field, context.surroundings, rng)
            {
                Decision::Step { offset, seconds } => {
                    trace!(actor = self.id().get(), ?cell, ?offset, seconds, "step");
                    self.motion = Some(Motion::step(self.body.position, offset, seconds));
                }
                Decision::Teleport { target } => {
                    debug!(actor = self.id().get(), from = ?cell, to = ?target, "teleport");
                    self.plan_teleport(target);
                }
                Decision::Idle => {
                    self.motion = Some(Motion::jump(self.body.position, JUMP_SECONDS));
                }
                Decision::Reroll => {
                    rerolls += 1;
                    if rerolls >= context.reroll_limit {
                        trace!(actor = self.id().get(), rerolls, "yielding until next tick");
                        self.parked = true;
                        return None;
                    }
                }
            }
        }
    }

    fn plan_teleport(&mut self, target: CellCoord) {
        let here = self.body.position;
        let there = Position::at(target);
        self.plan
            .extend((0..TELEPORT_SHIVERS).map(|_| Planned::Motion(Motion::shiver(here))));
        self.plan.push_back(Planned::Relocate(target));
        self.plan
            .extend((0..TELEPORT_SHIVERS).map(|_| Planned::Motion(Motion::shiver(there))));
    }

    fn move_to<H: Host + ?Sized>(&mut self, position: Position, host: &mut H) {
        let mut guard = PositionGuard::acquire(&mut self.body, host);
        guard.set(position);
    }
}
