//! Players, turn contexts and the policies that decide who acts next.

mod end;
mod resolver;

pub use end::{DominationCondition, EndCondition, GameResult, ObjectiveCondition};
pub use resolver::{SequentialTurnResolver, TurnResolver, UnitTurnResolver};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::unit::{PlayerId, UnitId};

/// Who supplies a player's decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlayerKind {
    /// Local input through the interaction state machine.
    Human,
    /// A behavior tree driven by the runtime.
    Ai,
    /// Commands arrive through the network bridge.
    Remote,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub kind: PlayerKind,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, kind: PlayerKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
        }
    }
}

/// Players taking part in a match, ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player, replacing any previous entry with the same id.
    pub fn add(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn with(mut self, player: Player) -> Self {
        self.add(player);
        self
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn kind_of(&self, id: PlayerId) -> Option<PlayerKind> {
        self.players.get(&id).map(|player| player.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// The current player and the units it may act with.
///
/// A context is computed by a [`TurnResolver`] and replaced wholesale on
/// every turn transition; it is never edited in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    pub player: PlayerId,
    pub playable: BTreeSet<UnitId>,
    /// Number of the turn, starting at 1.
    pub turn: u32,
}

impl TurnContext {
    pub fn new(player: PlayerId, playable: impl IntoIterator<Item = UnitId>, turn: u32) -> Self {
        Self {
            player,
            playable: playable.into_iter().collect(),
            turn,
        }
    }

    pub fn is_playable(&self, unit: UnitId) -> bool {
        self.playable.contains(&unit)
    }
}
