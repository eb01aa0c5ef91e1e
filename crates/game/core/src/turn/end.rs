use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Board;
use crate::unit::{PlayerId, UnitId};

use super::PlayerRegistry;

/// Outcome of a finished match. An empty `winners` set is a draw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winners: BTreeSet<PlayerId>,
    pub losers: BTreeSet<PlayerId>,
}

impl GameResult {
    pub fn is_draw(&self) -> bool {
        self.winners.is_empty()
    }
}

/// Checked after every executed command and every turn transition.
pub trait EndCondition: Send + Sync + fmt::Debug {
    fn check(&self, board: &Board, players: &PlayerRegistry) -> Option<GameResult>;
}

/// The match ends once at most one registered player still owns units.
#[derive(Clone, Copy, Debug, Default)]
pub struct DominationCondition;

impl EndCondition for DominationCondition {
    fn check(&self, board: &Board, players: &PlayerRegistry) -> Option<GameResult> {
        let owners = board.players_with_units();
        let alive: BTreeSet<PlayerId> = players.ids().filter(|id| owners.contains(id)).collect();
        if alive.len() > 1 {
            return None;
        }
        let losers = players.ids().filter(|id| !alive.contains(id)).collect();
        Some(GameResult {
            winners: alive,
            losers,
        })
    }
}

/// Each player guards a set of objective units. A player loses once none
/// of its objectives is still on the board under its ownership; the match
/// ends when at most one player is left standing.
#[derive(Clone, Debug, Default)]
pub struct ObjectiveCondition {
    objectives: BTreeMap<PlayerId, BTreeSet<UnitId>>,
}

impl ObjectiveCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objective(mut self, player: PlayerId, unit: UnitId) -> Self {
        self.objectives.entry(player).or_default().insert(unit);
        self
    }

    fn has_lost(&self, board: &Board, player: PlayerId) -> bool {
        self.objectives.get(&player).is_some_and(|units| {
            !units
                .iter()
                .any(|id| board.unit(*id).is_some_and(|unit| unit.player == player))
        })
    }
}

impl EndCondition for ObjectiveCondition {
    fn check(&self, board: &Board, players: &PlayerRegistry) -> Option<GameResult> {
        let losers: BTreeSet<PlayerId> = players
            .ids()
            .filter(|player| self.has_lost(board, *player))
            .collect();
        if losers.is_empty() {
            return None;
        }
        let winners: BTreeSet<PlayerId> = players.ids().filter(|id| !losers.contains(id)).collect();
        if winners.len() > 1 {
            return None;
        }
        Some(GameResult { winners, losers })
    }
}
