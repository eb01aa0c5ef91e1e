use std::fmt;

use crate::grid::Board;
use crate::unit::{PlayerId, UnitId};

use super::{PlayerRegistry, TurnContext};

/// Decides whose turn it is.
///
/// Both methods return `None` when nobody can act, which the controller
/// treats as the end of the match.
pub trait TurnResolver: Send + Sync + fmt::Debug {
    fn resolve_start(&self, board: &Board, players: &PlayerRegistry) -> Option<TurnContext>;

    fn resolve_next(
        &self,
        current: &TurnContext,
        board: &Board,
        players: &PlayerRegistry,
    ) -> Option<TurnContext>;
}

/// Players take turns in ascending id order, skipping players without
/// units. Every unit of the current player is playable.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialTurnResolver;

impl SequentialTurnResolver {
    fn context_for(board: &Board, player: PlayerId, turn: u32) -> TurnContext {
        TurnContext::new(player, board.units_of(player).map(|unit| unit.id()), turn)
    }

    fn active_players(board: &Board, players: &PlayerRegistry) -> Vec<PlayerId> {
        players
            .ids()
            .filter(|player| board.units_of(*player).next().is_some())
            .collect()
    }
}

impl TurnResolver for SequentialTurnResolver {
    fn resolve_start(&self, board: &Board, players: &PlayerRegistry) -> Option<TurnContext> {
        let first = Self::active_players(board, players).into_iter().next()?;
        Some(Self::context_for(board, first, 1))
    }

    fn resolve_next(
        &self,
        current: &TurnContext,
        board: &Board,
        players: &PlayerRegistry,
    ) -> Option<TurnContext> {
        let active = Self::active_players(board, players);
        let next = active
            .iter()
            .copied()
            .find(|player| *player > current.player)
            .or_else(|| active.first().copied())?;
        Some(Self::context_for(board, next, current.turn + 1))
    }
}

/// One unit acts per turn. Units of registered players are cycled in id
/// order; the turn belongs to the owner of the selected unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitTurnResolver;

impl UnitTurnResolver {
    fn candidates(board: &Board, players: &PlayerRegistry) -> Vec<(UnitId, PlayerId)> {
        board
            .units()
            .filter(|unit| players.get(unit.player).is_some())
            .filter(|unit| {
                let rules = board.rules_for(unit);
                rules.can_move(unit) || rules.can_attack(unit)
            })
            .map(|unit| (unit.id(), unit.player))
            .collect()
    }
}

impl TurnResolver for UnitTurnResolver {
    fn resolve_start(&self, board: &Board, players: &PlayerRegistry) -> Option<TurnContext> {
        let (unit, player) = Self::candidates(board, players).into_iter().next()?;
        Some(TurnContext::new(player, [unit], 1))
    }

    fn resolve_next(
        &self,
        current: &TurnContext,
        board: &Board,
        players: &PlayerRegistry,
    ) -> Option<TurnContext> {
        let candidates = Self::candidates(board, players);
        let last = current.playable.iter().next_back().copied();
        let (unit, player) = candidates
            .iter()
            .copied()
            .find(|(unit, _)| last.is_some_and(|last| *unit > last))
            .or_else(|| candidates.first().copied())?;
        Some(TurnContext::new(player, [unit], current.turn + 1))
    }
}
