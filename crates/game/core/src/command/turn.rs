use crate::config::GameConfig;
use crate::grid::Board;
use crate::unit::{PlayerId, UnitId};

use super::payload::{PayloadReader, PayloadWriter};
use super::{Actor, CommandError, CommandTransition, Payload};

/// Hands control to the next player. Travels through the command pipeline
/// so that remote peers observe turn ends in order with other commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndTurnCommand {
    pub player: PlayerId,
}

impl EndTurnCommand {
    pub const NAME: &'static str = "end_turn";

    pub fn new(player: PlayerId) -> Self {
        Self { player }
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        Ok(Self::new(reader.player("player")?))
    }
}

impl CommandTransition for EndTurnCommand {
    fn actor(&self) -> Actor {
        Actor::Player(self.player)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        Vec::new()
    }

    fn is_undoable(&self) -> bool {
        false
    }

    fn apply(&self, _board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        Ok(())
    }

    fn to_payload(&self) -> Payload {
        PayloadWriter::new(Self::NAME)
            .player("player", self.player)
            .finish()
    }
}
