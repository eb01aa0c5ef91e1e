//! Host capabilities required by stateful nodes.

use std::time::Duration;

/// Services the host context provides to delay and random nodes.
///
/// Keeping counters and the random source in the context lets a tree
/// description stay immutable and shareable between units.
pub trait TreeContext {
    /// Returns a uniformly distributed value in `[0, 1)`.
    fn random_unit(&mut self) -> f32;

    /// Returns the persistent turn counter stored under `key`.
    ///
    /// Counters must survive between ticks of the same tree for the same
    /// actor. Unknown keys start at zero.
    fn turn_counter(&mut self, key: &str) -> &mut u32;

    /// Pauses for pacing purposes. The default blocks the current thread.
    fn pace(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
