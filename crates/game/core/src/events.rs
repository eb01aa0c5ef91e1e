//! Notifications produced while the game state changes.
//!
//! The board records events in an outbox as mutations happen; the runtime
//! drains them after every command or turn transition and publishes them to
//! presenters and subscribers. Game logic never waits on a consumer.

use serde::{Deserialize, Serialize};

use crate::grid::Coord;
use crate::turn::{GameResult, TurnContext};
use crate::unit::{PlayerId, UnitId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameInitialized,
    GameStarted,
    TurnStarted {
        context: TurnContext,
        network: bool,
    },
    TurnEnded {
        context: TurnContext,
        network: bool,
    },
    GameEnded {
        result: GameResult,
    },
    UnitPlaced {
        unit: UnitId,
        player: PlayerId,
        cell: Coord,
    },
    UnitMoved {
        unit: UnitId,
        from: Coord,
        to: Coord,
        path: Vec<Coord>,
    },
    UnitAttacked {
        attacker: UnitId,
        target: UnitId,
        damage: i32,
    },
    UnitHealed {
        healer: UnitId,
        target: UnitId,
        amount: i32,
    },
    StructureCaptured {
        unit: UnitId,
        structure: UnitId,
    },
    HealthChanged {
        unit: UnitId,
        old: i32,
        new: i32,
    },
    UnitDestroyed {
        unit: UnitId,
        player: PlayerId,
        cell: Coord,
    },
    OwnerChanged {
        unit: UnitId,
        old: PlayerId,
        new: PlayerId,
    },
    /// A unit was put back to an earlier snapshot by an undo.
    UnitRestored {
        unit: UnitId,
    },
}

impl GameEvent {
    /// Unit the event is about, if it concerns a single unit.
    pub fn subject(&self) -> Option<UnitId> {
        match self {
            GameEvent::UnitPlaced { unit, .. }
            | GameEvent::UnitMoved { unit, .. }
            | GameEvent::StructureCaptured { unit, .. }
            | GameEvent::HealthChanged { unit, .. }
            | GameEvent::UnitDestroyed { unit, .. }
            | GameEvent::OwnerChanged { unit, .. }
            | GameEvent::UnitRestored { unit } => Some(*unit),
            GameEvent::UnitAttacked { target, .. } | GameEvent::UnitHealed { target, .. } => {
                Some(*target)
            }
            GameEvent::GameInitialized
            | GameEvent::GameStarted
            | GameEvent::TurnStarted { .. }
            | GameEvent::TurnEnded { .. }
            | GameEvent::GameEnded { .. } => None,
        }
    }
}
