//! Runtime orchestration for tactics matches.
//!
//! This crate drives a [`tactics_core::Board`] through a match. Consumers
//! build a [`GridController`], feed it input (clicks from a presentation
//! layer, commands from AI players or remote peers) and observe the results
//! through the [`Presenter`] callbacks and the topic [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the interaction state machine and the single
//!   execution funnel every command passes through
//! - [`ability`] holds the per-unit input handlers that turn clicks into
//!   commands
//! - [`ai`] provides behavior-tree players and the cell/target evaluators
//!   they score options with
//! - [`events`] publishes game events by topic and to synchronous listeners
//! - [`network`] carries serialized commands between peers
//! - [`game`] steps AI turns until a human or remote player has to act
pub mod ability;
pub mod ai;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod game;
pub mod network;
pub mod presenter;

pub use ability::{
    Ability, AbilityContext, AbilityResponse, AttackAbility, CaptureAbility, HealAbility,
    MoveAbility, SpawnAbility,
};
pub use ai::{
    AiContext, AiLeaf, AiPlayer, PositionEvaluator, PositionEvaluatorSpec, TargetEvaluator,
    TargetEvaluatorSpec, WeightedPosition, WeightedTarget,
};
pub use config::{InputMode, RuntimeConfig};
pub use controller::{GridController, GridState, GridStateKind, Invocation, LogEntry};
pub use error::{Result, RuntimeError};
pub use events::{EventBus, ListenerId, ListenerScope, Listeners, Topic};
pub use game::{Game, StepOutcome};
pub use network::NetworkBridge;
pub use presenter::{NullPresenter, Presenter};
