//! Topic-based event publishing for runtime consumers.
//!
//! Every [`tactics_core::GameEvent`] the controller drains from the board
//! goes two ways: onto a broadcast [`EventBus`] channel chosen by its
//! [`Topic`] for decoupled (possibly async) consumers, and through the
//! synchronous [`Listeners`] registry for callbacks that must observe events
//! in order before the next command runs.

mod bus;
mod listeners;

pub use bus::{EventBus, Topic};
pub use listeners::{ListenerId, ListenerScope, Listeners};
