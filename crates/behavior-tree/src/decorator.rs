//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and rewrite its result:
//! [`Inverter`] negates it and [`Succeeder`] discards it.

use crate::{Behavior, Status};

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
///
/// This is analogous to a logical NOT (!) operation.
pub struct Inverter<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> Inverter<C> {
    /// Creates a new inverter that wraps the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Inverter<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }
}

/// Always returns `Success`, regardless of the child's result.
///
/// # Semantics
///
/// - The child is always ticked, so its side effects still happen
/// - If the child returns `Success`, returns `Success`
/// - If the child returns `Failure`, **still returns `Success`**
///
/// Useful for optional steps that must not break an enclosing sequence.
pub struct Succeeder<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> Succeeder<C> {
    /// Creates a new succeeder around the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Succeeder<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let _ = self.child.tick(ctx);
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i32,
    }

    struct IsPositive;
    impl Behavior<Counter> for IsPositive {
        fn tick(&self, ctx: &mut Counter) -> Status {
            Status::from(ctx.value > 0)
        }
    }

    struct FailAndIncrement;
    impl Behavior<Counter> for FailAndIncrement {
        fn tick(&self, ctx: &mut Counter) -> Status {
            ctx.value += 1;
            Status::Failure
        }
    }

    #[test]
    fn inverter_flips_both_outcomes() {
        let inverter = Inverter::new(Box::new(IsPositive));

        assert_eq!(inverter.tick(&mut Counter { value: 3 }), Status::Failure);
        assert_eq!(inverter.tick(&mut Counter { value: -3 }), Status::Success);
    }

    #[test]
    fn succeeder_runs_child_and_forces_success() {
        let succeeder = Succeeder::new(Box::new(FailAndIncrement));

        let mut ctx = Counter { value: 0 };
        assert_eq!(succeeder.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 1);
    }
}
