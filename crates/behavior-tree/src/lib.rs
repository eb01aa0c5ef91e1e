//! Behavior tree library for turn-based tactics AI.
//!
//! Trees are deterministic and tick-to-completion: every node returns
//! [`Status::Success`] or [`Status::Failure`] before control returns to the
//! caller. The only suspension a node may perform is wall-clock pacing
//! through [`TreeContext::pace`], which never changes the outcome.
//!
//! Two ways of composing a tree are supported:
//!
//! - Programmatic composition with boxed nodes ([`Sequence`], [`Selector`],
//!   [`Inverter`], [`Succeeder`], [`TurnDelay`], [`RealtimeDelay`],
//!   [`Random`]), see [`builder`].
//! - Data composition with [`NodeSpec`], a serializable description of the
//!   tree shape interpreted at tick time. Interpreted trees hold no runtime
//!   state; counters live in the context ([`TreeContext::turn_counter`]).
//!
//! # Architecture
//!
//! - [`Behavior`]: core trait for all nodes
//! - [`Status`]: success or failure (no running state)
//! - [`TreeContext`]: capabilities stateful nodes require from the host

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod context;
pub mod decorator;
pub mod spec;
pub mod status;
pub mod timing;

pub use behavior::Behavior;
pub use composite::{Selector, Sequence};
pub use context::TreeContext;
pub use decorator::{Inverter, Succeeder};
pub use spec::NodeSpec;
pub use status::Status;
pub use timing::{Random, RealtimeDelay, TurnDelay};
