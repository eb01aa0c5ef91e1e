//! Turn-counted delays, wall-clock pacing and chance nodes.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::{Behavior, Status, TreeContext};

/// Fails for `turns` consecutive ticks, then delegates to its child once and
/// starts counting again.
///
/// The counter advances once per tick, not per game turn. It measures turns
/// only when the host ticks the tree exactly once per actor per turn, as the
/// runtime's AI player does. Ticking the same tree twice in one turn counts
/// two turns.
///
/// The counter lives inside the node, so one instance must not be shared
/// between actors that should count independently. Interpreted trees use
/// [`crate::NodeSpec::TurnDelay`], which keeps the counter in the context.
pub struct TurnDelay<C> {
    turns: u32,
    elapsed: AtomicU32,
    child: Box<dyn Behavior<C>>,
}

impl<C> TurnDelay<C> {
    /// Wraps `child` so it runs on every `turns + 1`-th tick.
    pub fn new(turns: u32, child: Box<dyn Behavior<C>>) -> Self {
        Self {
            turns,
            elapsed: AtomicU32::new(0),
            child,
        }
    }

    /// Number of ticks counted since the last delegation.
    pub fn elapsed(&self) -> u32 {
        self.elapsed.load(Ordering::Relaxed)
    }
}

impl<C> Behavior<C> for TurnDelay<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let mut elapsed = self.elapsed.load(Ordering::Relaxed);
        let ready = step_counter(&mut elapsed, self.turns);
        self.elapsed.store(elapsed, Ordering::Relaxed);
        if ready {
            self.child.tick(ctx)
        } else {
            Status::Failure
        }
    }
}

/// Advances a counter stored in the context; shared with the interpreter.
pub(crate) fn step_counter(counter: &mut u32, turns: u32) -> bool {
    if *counter < turns {
        *counter += 1;
        false
    } else {
        *counter = 0;
        true
    }
}

/// Pauses for a fixed wall-clock duration and succeeds.
///
/// Pacing only: the outcome never depends on the pause.
#[derive(Debug, Clone, Copy)]
pub struct RealtimeDelay {
    delay: Duration,
}

impl RealtimeDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl<C: TreeContext> Behavior<C> for RealtimeDelay {
    fn tick(&self, ctx: &mut C) -> Status {
        ctx.pace(self.delay);
        Status::Success
    }
}

/// Succeeds with the configured probability, drawing from the context's
/// random source.
#[derive(Debug, Clone, Copy)]
pub struct Random {
    probability: f32,
}

impl Random {
    /// `probability` is clamped to `[0, 1]`.
    pub fn new(probability: f32) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

pub(crate) fn roll<C: TreeContext>(ctx: &mut C, probability: f32) -> Status {
    Status::from(ctx.random_unit() < probability)
}

impl<C: TreeContext> Behavior<C> for Random {
    fn tick(&self, ctx: &mut C) -> Status {
        roll(ctx, self.probability)
    }
}
