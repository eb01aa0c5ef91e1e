use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::grid::{Board, Coord};
use crate::unit::{UnitId, UnitTemplate};

use super::payload::{PayloadReader, PayloadWriter};
use super::{
    Actor, CommandError, CommandTransition, Payload, require_action_point, spend_action_point,
    unit_of,
};

/// Takes ownership of a capturable structure sharing the unit's cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureCommand {
    pub unit: UnitId,
    pub structure: UnitId,
}

impl CaptureCommand {
    pub const NAME: &'static str = "capture";

    pub fn new(unit: UnitId, structure: UnitId) -> Self {
        Self { unit, structure }
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        Ok(Self::new(reader.unit("unit")?, reader.unit("structure")?))
    }
}

impl CommandTransition for CaptureCommand {
    fn actor(&self) -> Actor {
        Actor::Unit(self.unit)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        vec![self.unit, self.structure]
    }

    fn pre_validate(&self, board: &Board, _config: &GameConfig) -> Result<(), CommandError> {
        let capturer = unit_of(board, self.unit)?;
        let structure = unit_of(board, self.structure)?;
        require_action_point(capturer)?;

        let capturable = board.rules_for(structure).is_capturable(structure)
            && structure.player != capturer.player
            && structure.cell() == capturer.cell();
        if !capturable {
            return Err(CommandError::NotCapturable {
                unit: self.unit,
                structure: self.structure,
            });
        }
        Ok(())
    }

    fn apply(&self, board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        let player = unit_of(board, self.unit)?.player;
        spend_action_point(board, self.unit)?;
        board.set_owner(self.structure, player)?;
        board.emit(GameEvent::StructureCaptured {
            unit: self.unit,
            structure: self.structure,
        });
        Ok(())
    }

    fn to_payload(&self) -> Payload {
        PayloadWriter::new(Self::NAME)
            .unit("unit", self.unit)
            .unit("structure", self.structure)
            .finish()
    }
}

/// Creates a unit from `template` on the spawner's cell or a neighbour.
///
/// The new id is fixed when the command is built so that the network
/// replay creates the same unit. Spawned units start without points and
/// act from their owner's next turn.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnCommand {
    pub spawner: UnitId,
    pub unit: UnitId,
    pub cell: Coord,
    pub template: UnitTemplate,
}

impl SpawnCommand {
    pub const NAME: &'static str = "spawn";

    pub fn new(spawner: UnitId, unit: UnitId, cell: Coord, template: UnitTemplate) -> Self {
        Self {
            spawner,
            unit,
            cell,
            template,
        }
    }

    /// Builds the command using the board's next free unit id.
    pub fn next(board: &Board, spawner: UnitId, cell: Coord, template: UnitTemplate) -> Self {
        Self::new(spawner, board.next_unit_id(), cell, template)
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        Ok(Self::new(
            reader.unit("spawner")?,
            reader.new_unit("unit")?,
            reader.cell("cell")?,
            reader.value("template")?,
        ))
    }
}

impl CommandTransition for SpawnCommand {
    fn actor(&self) -> Actor {
        Actor::Unit(self.spawner)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        vec![self.spawner]
    }

    fn spawned_unit(&self) -> Option<UnitId> {
        Some(self.unit)
    }

    fn pre_validate(&self, board: &Board, _config: &GameConfig) -> Result<(), CommandError> {
        let spawner = unit_of(board, self.spawner)?;
        require_action_point(spawner)?;
        if board.unit(self.unit).is_some() {
            return Err(CommandError::SpawnIdTaken(self.unit));
        }
        let cell = board
            .cell(self.cell)
            .ok_or(CommandError::CellNotFound(self.cell))?;
        if board.distance(spawner.cell(), self.cell) > 1 {
            return Err(CommandError::SpawnOutOfReach(self.cell));
        }

        let preview = self.template.instantiate(self.unit, spawner.player, self.cell);
        let blocking = board.rules_for(&preview).is_blocking(&preview);
        if cell.is_obstacle() || (blocking && cell.is_taken()) {
            return Err(CommandError::DestinationBlocked(self.cell));
        }
        Ok(())
    }

    fn apply(&self, board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        let player = unit_of(board, self.spawner)?.player;
        spend_action_point(board, self.spawner)?;

        let mut unit = self.template.instantiate(self.unit, player, self.cell);
        unit.action_points = 0;
        unit.movement_points = 0.0;
        board.place_unit(unit)?;
        Ok(())
    }

    fn to_payload(&self) -> Payload {
        PayloadWriter::new(Self::NAME)
            .unit("spawner", self.spawner)
            .unit("unit", self.unit)
            .coord("cell", self.cell)
            .value("template", &self.template)
            .finish()
    }
}
