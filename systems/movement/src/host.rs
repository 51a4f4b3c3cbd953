//! Contract between the movement engine and the program displaying it.

use std::time::Duration;

use maze_runner_core::{ActorId, ActorSnapshot};

/// Observer notified about every position change and terminal event.
pub trait Host {
    /// Called immediately before and immediately after every position change.
    fn position_changed(&mut self, actor: &ActorSnapshot);

    /// Current size of a grid cell in pixels; paces how often motions are sampled.
    fn cell_size(&self) -> f32;

    /// Reports that an actor has no route to any goal, ending the session.
    fn no_path(&mut self, actor: ActorId);

    /// Reports that an actor reached a goal after `elapsed` seconds of play.
    fn goal_reached(&mut self, actor: ActorId, elapsed: Duration);
}
