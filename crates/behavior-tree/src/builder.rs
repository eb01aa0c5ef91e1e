//! Builder utilities for programmatic tree construction.
//!
//! Instead of `Box::new(Sequence::new(vec![...]))`, write
//! `sequence(vec![...])`. Every helper returns a boxed node ready to nest.

use std::time::Duration;

use crate::{
    Behavior, Inverter, Random, RealtimeDelay, Selector, Sequence, Succeeder, TreeContext,
    TurnDelay,
};

/// Creates a sequence node (fails at the first failing child).
///
/// Shorthand for `Box::new(Sequence::new(children))`.
#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

/// Creates a selector node (succeeds at the first succeeding child).
///
/// Shorthand for `Box::new(Selector::new(children))`.
#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

/// Creates an inverter node.
///
/// Shorthand for `Box::new(Inverter::new(child))`.
#[inline]
pub fn inverter<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(Inverter::new(child))
}

/// Creates a node that ticks `child` and always succeeds.
///
/// Shorthand for `Box::new(Succeeder::new(child))`.
#[inline]
pub fn succeeder<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(Succeeder::new(child))
}

/// Creates a node that fails for `turns` ticks before running `child`.
///
/// Shorthand for `Box::new(TurnDelay::new(turns, child))`.
#[inline]
pub fn turn_delay<C: 'static>(turns: u32, child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(TurnDelay::new(turns, child))
}

/// Creates a leaf that paces the host by `delay` and succeeds.
#[inline]
pub fn realtime_delay<C: TreeContext + 'static>(delay: Duration) -> Box<dyn Behavior<C>> {
    Box::new(RealtimeDelay::new(delay))
}

/// Creates a leaf that succeeds with the given probability.
#[inline]
pub fn random<C: TreeContext + 'static>(probability: f32) -> Box<dyn Behavior<C>> {
    Box::new(Random::new(probability))
}
