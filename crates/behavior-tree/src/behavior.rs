//! Core behavior trait.

use crate::Status;

/// A behavior tree node evaluated against a context of type `C`.
///
/// The context is the blackboard: nodes read game state through it and
/// perform their effects through it (for example by executing a command).
pub trait Behavior<C>: Send + Sync {
    /// Runs this node to completion and reports whether it succeeded.
    fn tick(&self, ctx: &mut C) -> Status;
}

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
