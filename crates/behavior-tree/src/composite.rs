//! Composite behavior nodes.
//!
//! [`Sequence`] is a short-circuited AND over its children, [`Selector`] a
//! short-circuited OR. The interpreted [`crate::NodeSpec`] shares the same
//! evaluation order through [`run_sequence`] and [`run_selector`].

use crate::{Behavior, Status};

/// Ticks children left to right, stopping at the first failure.
pub fn run_sequence<'n, C, B, I>(children: I, ctx: &mut C) -> Status
where
    B: Behavior<C> + ?Sized + 'n,
    I: IntoIterator<Item = &'n B>,
{
    for child in children {
        if child.tick(ctx).is_failure() {
            return Status::Failure;
        }
    }
    Status::Success
}

/// Ticks children left to right, stopping at the first success.
pub fn run_selector<'n, C, B, I>(children: I, ctx: &mut C) -> Status
where
    B: Behavior<C> + ?Sized + 'n,
    I: IntoIterator<Item = &'n B>,
{
    for child in children {
        if child.tick(ctx).is_success() {
            return Status::Success;
        }
    }
    Status::Failure
}

/// Executes child behaviors in sequence until one fails.
///
/// # Semantics
///
/// A `Sequence` node evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately** and returns `Failure`
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence returns `Success`
///
/// Children after the failing one are never ticked, so side effects they
/// carry (issuing a command, moving a unit) do not happen.
pub struct Sequence<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Sequence<C> {
    /// Creates a new sequence with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Sequence must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        run_sequence(self.children.iter().map(|child| child.as_ref()), ctx)
    }
}

/// Executes child behaviors in sequence until one succeeds.
///
/// # Semantics
///
/// A `Selector` node evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector returns `Failure`
///
/// Order encodes priority: the first child that succeeds wins.
pub struct Selector<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Selector<C> {
    /// Creates a new selector with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Selector must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        run_selector(self.children.iter().map(|child| child.as_ref()), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Log {
        visited: Vec<&'static str>,
    }

    struct Mark(&'static str, Status);

    impl Behavior<Log> for Mark {
        fn tick(&self, ctx: &mut Log) -> Status {
            ctx.visited.push(self.0);
            self.1
        }
    }

    fn mark(name: &'static str, status: Status) -> Box<dyn Behavior<Log>> {
        Box::new(Mark(name, status))
    }

    #[test]
    fn sequence_all_success() {
        let seq = Sequence::new(vec![
            mark("a", Status::Success),
            mark("b", Status::Success),
        ]);

        let mut ctx = Log { visited: vec![] };
        assert_eq!(seq.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.visited, ["a", "b"]);
    }

    #[test]
    fn sequence_stops_at_first_failure() {
        let seq = Sequence::new(vec![
            mark("a", Status::Success),
            mark("b", Status::Failure),
            mark("c", Status::Success),
        ]);

        let mut ctx = Log { visited: vec![] };
        assert_eq!(seq.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.visited, ["a", "b"]);
    }

    #[test]
    fn selector_stops_at_first_success() {
        let sel = Selector::new(vec![
            mark("a", Status::Failure),
            mark("b", Status::Success),
            mark("c", Status::Success),
        ]);

        let mut ctx = Log { visited: vec![] };
        assert_eq!(sel.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.visited, ["a", "b"]);
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let sel = Selector::new(vec![mark("a", Status::Failure), mark("b", Status::Failure)]);

        let mut ctx = Log { visited: vec![] };
        assert_eq!(sel.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.visited, ["a", "b"]);
    }

    #[test]
    #[should_panic(expected = "Sequence must have at least one child")]
    fn empty_sequence_is_rejected() {
        let _ = Sequence::<Log>::new(Vec::new());
    }
}
