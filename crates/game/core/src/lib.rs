//! Deterministic rules of the tactics engine.
//!
//! `tactics-core` owns the board arena (cells and units), pathfinding, unit
//! rules and combat, the command pipeline with its wire format, and turn
//! resolution. It exposes plain synchronous APIs; the runtime crate drives
//! them from input, AI and the network bridge. All board mutation flows
//! through [`command::CommandEngine`] or the [`grid::Board`] mutators.
pub mod combat;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod pathfinding;
pub mod rng;
pub mod turn;
pub mod unit;

pub use command::{
    Actor, AttackCommand, CaptureCommand, ChargeCommand, Command, CommandEngine, CommandError,
    CommandTransition, EndTurnCommand, ExecuteError, HealCommand, MoveCommand, MultiAttackCommand,
    Payload, SpawnCommand, TransitionPhase, TransitionPhaseError, UndoRecord,
};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use events::GameEvent;
pub use grid::{
    Board, Cell, Coord, Cube, GridError, GridShape, HealthChange, HexLayout, RectangularGenerator,
    WorldPosition,
};
pub use pathfinding::{PathAlgorithm, PathCache, PathCacheSet, PathError};
pub use rng::{PcgRng, RandomSource};
pub use turn::{
    DominationCondition, EndCondition, GameResult, ObjectiveCondition, Player, PlayerKind,
    PlayerRegistry, SequentialTurnResolver, TurnContext, TurnResolver, UnitTurnResolver,
};
pub use unit::{
    PlayerId, StandardRules, StructureRules, Traversal, Unit, UnitId, UnitKind, UnitRules,
    UnitStats, UnitTemplate,
};
