//! Time-driven motion primitives shared by every behavior.

use std::time::Duration;

use maze_runner_core::{ActorSnapshot, Offset, Position};

use crate::host::Host;

/// Duration of a regular step between neighbouring cells, in seconds.
pub const STEP_SECONDS: f32 = 1.0;
/// Duration of a step taken by fast actors, in seconds.
pub const FAST_STEP_SECONDS: f32 = 0.57;
/// Duration of the hop played while idle, in seconds.
pub const JUMP_SECONDS: f32 = 0.2;
/// Duration of the hop every actor plays before it starts moving, in seconds.
pub const INTRO_JUMP_SECONDS: f32 = 1.0;
/// Duration of a single sideways wobble around a teleport, in seconds.
pub const SHIVER_SECONDS: f32 = 0.1;
/// Jumps and shivers sample half as often as steps.
const HOP_PACING: f32 = 2.0;
/// Lower bound on the pause between two samples of a motion.
const MIN_SAMPLE_DELAY: Duration = Duration::from_micros(100);

/// Completion fractions of a motion measured against the simulation clock.
///
/// The clock reading of the first sample becomes the start time. Every later
/// sample reports the fraction of `duration` that elapsed since then, and the
/// sequence ends once that fraction reaches one.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Progress {
    seconds: f32,
    started: Option<Duration>,
}

impl Progress {
    pub(crate) fn new(seconds: f32) -> Self {
        Self {
            seconds,
            started: None,
        }
    }

    pub(crate) fn sample(&mut self, now: Duration) -> Option<f32> {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_sub(started).as_secs_f32();
        if self.seconds <= 0.0 || elapsed >= self.seconds {
            return None;
        }
        Some(elapsed / self.seconds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Shape {
    Step(Offset),
    Jump,
    Shiver,
}

/// A single interpolated movement starting from a resting position.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Motion {
    shape: Shape,
    origin: Position,
    progress: Progress,
}

impl Motion {
    pub(crate) fn step(origin: Position, offset: Offset, seconds: f32) -> Self {
        Self::new(Shape::Step(offset), origin, seconds)
    }

    pub(crate) fn jump(origin: Position, seconds: f32) -> Self {
        Self::new(Shape::Jump, origin, seconds)
    }

    pub(crate) fn shiver(origin: Position) -> Self {
        Self::new(Shape::Shiver, origin, SHIVER_SECONDS)
    }

    fn new(shape: Shape, origin: Position, seconds: f32) -> Self {
        Self {
            shape,
            origin,
            progress: Progress::new(seconds),
        }
    }

    /// Samples the motion, yielding the interpolated position while it runs.
    pub(crate) fn sample(&mut self, now: Duration) -> Option<Position> {
        let p = self.progress.sample(now)?;
        let hop = p * (1.0 - p);
        let mut position = self.origin;
        match self.shape {
            Shape::Step(offset) => {
                position.row += offset.d_row() as f32 * p;
                position.column += offset.d_column() as f32 * p;
            }
            Shape::Jump => position.row -= hop,
            Shape::Shiver => position.column -= hop,
        }
        Some(position)
    }

    /// Exact resting position once the motion completes.
    pub(crate) fn end(&self) -> Position {
        let mut position = self.origin;
        if let Shape::Step(offset) = self.shape {
            position.row += offset.d_row() as f32;
            position.column += offset.d_column() as f32;
        }
        position
    }

    /// Pause between samples, roughly one pixel of travel at the given cell size.
    pub(crate) fn sample_delay(&self, cell_size: f32) -> Duration {
        let pacing = match self.shape {
            Shape::Step(_) => 1.0,
            Shape::Jump | Shape::Shiver => HOP_PACING,
        };
        let seconds = self.progress.seconds / cell_size * pacing;
        Duration::try_from_secs_f32(seconds)
            .unwrap_or(MIN_SAMPLE_DELAY)
            .max(MIN_SAMPLE_DELAY)
    }
}

/// Scoped position update that notifies the host on entry and on exit.
///
/// The exit notification runs from `Drop`, so the host always observes both
/// halves of the bracket even when the holder returns early.
pub(crate) struct PositionGuard<'a, H: Host + ?Sized> {
    body: &'a mut ActorSnapshot,
    host: &'a mut H,
}

impl<'a, H: Host + ?Sized> PositionGuard<'a, H> {
    pub(crate) fn acquire(body: &'a mut ActorSnapshot, host: &'a mut H) -> Self {
        host.position_changed(&*body);
        Self { body, host }
    }

    pub(crate) fn set(&mut self, position: Position) {
        self.body.position = position;
    }
}

impl<H: Host + ?Sized> Drop for PositionGuard<'_, H> {
    fn drop(&mut self) {
        self.host.position_changed(&*self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_runner_core::CellCoord;

    #[test]
    fn progress_starts_at_first_sample() {
        let mut progress = Progress::new(1.0);

        assert_eq!(progress.sample(Duration::from_secs(3)), Some(0.0));
        assert_eq!(progress.sample(Duration::from_millis(3500)), Some(0.5));
        assert_eq!(progress.sample(Duration::from_secs(4)), None);
    }

    #[test]
    fn step_interpolates_toward_the_neighbour() {
        let mut motion = Motion::step(Position::at(CellCoord::new(2, 2)), Offset::LEFT, 1.0);

        assert_eq!(
            motion.sample(Duration::ZERO),
            Some(Position {
                row: 2.0,
                column: 2.0
            })
        );
        assert_eq!(
            motion.sample(Duration::from_millis(250)),
            Some(Position {
                row: 2.0,
                column: 1.75
            })
        );
        assert_eq!(motion.sample(Duration::from_secs(1)), None);
        assert_eq!(motion.end(), Position::at(CellCoord::new(2, 1)));
    }

    #[test]
    fn jump_follows_a_parabola_and_lands_in_place() {
        let origin = Position::at(CellCoord::new(1, 1));
        let mut motion = Motion::jump(origin, 1.0);

        let _ = motion.sample(Duration::ZERO);
        let top = motion.sample(Duration::from_millis(500)).expect("mid jump");
        assert!((top.row - 0.75).abs() < 1e-6);
        assert_eq!(top.column, 1.0);
        assert_eq!(motion.end(), origin);
    }

    #[test]
    fn hops_sample_half_as_often_as_steps() {
        let origin = Position::at(CellCoord::new(0, 0));
        let step = Motion::step(origin, Offset::RIGHT, 1.0);
        let jump = Motion::jump(origin, 1.0);

        assert_eq!(step.sample_delay(16.0), Duration::from_micros(62_500));
        assert_eq!(jump.sample_delay(16.0), Duration::from_millis(125));
        assert_eq!(
            step.sample_delay(f32::INFINITY),
            MIN_SAMPLE_DELAY,
            "delays never collapse to zero"
        );
    }
}
