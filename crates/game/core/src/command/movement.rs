use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::grid::{Board, Coord};
use crate::pathfinding::path_cost;
use crate::unit::UnitId;

use super::combat::{strike, validate_target};
use super::payload::{PayloadReader, PayloadWriter};
use super::{
    Actor, CommandError, CommandTransition, Payload, require_action_point, unit_of,
};

/// Walks a unit along `path` (origin excluded), spending the summed
/// movement cost of its steps.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveCommand {
    pub unit: UnitId,
    pub path: Vec<Coord>,
}

impl MoveCommand {
    pub const NAME: &'static str = "move";

    pub fn new(unit: UnitId, path: Vec<Coord>) -> Self {
        Self { unit, path }
    }

    pub fn destination(&self) -> Option<Coord> {
        self.path.last().copied()
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        Ok(Self::new(reader.unit("unit")?, reader.path("path")?))
    }
}

/// Checks that `unit` can walk `path` and end on its last cell. Returns
/// the movement cost. The destination is checked before the path so a
/// blocked goal reports `DestinationBlocked`.
fn validate_walk(board: &Board, unit: UnitId, path: &[Coord]) -> Result<f32, CommandError> {
    let walker = unit_of(board, unit)?;
    let destination = *path.last().ok_or(CommandError::EmptyPath)?;
    if !board.rules_for(walker).can_move(walker) {
        return Err(CommandError::CannotMove(unit));
    }
    let cell = board
        .cell(destination)
        .ok_or(CommandError::CellNotFound(destination))?;
    if !board.rules_for(walker).is_cell_movable_to(walker, board, cell) {
        return Err(CommandError::DestinationBlocked(destination));
    }
    let cost = path_cost(board, walker, path).ok_or(CommandError::InvalidPath(unit))?;
    if cost > walker.movement_points {
        return Err(CommandError::InsufficientMovement {
            unit,
            required: cost,
            available: walker.movement_points,
        });
    }
    Ok(cost)
}

fn walk(board: &mut Board, unit: UnitId, path: &[Coord]) -> Result<(), CommandError> {
    let walker = unit_of(board, unit)?;
    let cost = path_cost(board, walker, path).ok_or(CommandError::InvalidPath(unit))?;
    let destination = *path.last().ok_or(CommandError::EmptyPath)?;

    let from = board.relocate_unit(unit, destination)?;
    if let Some(walker) = board.unit_mut(unit) {
        walker.movement_points = (walker.movement_points - cost).max(0.0);
    }
    board.emit(GameEvent::UnitMoved {
        unit,
        from,
        to: destination,
        path: path.to_vec(),
    });
    Ok(())
}

impl CommandTransition for MoveCommand {
    fn actor(&self) -> Actor {
        Actor::Unit(self.unit)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        vec![self.unit]
    }

    fn pre_validate(&self, board: &Board, _config: &GameConfig) -> Result<(), CommandError> {
        validate_walk(board, self.unit, &self.path).map(|_| ())
    }

    fn apply(&self, board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        walk(board, self.unit, &self.path)
    }

    fn to_payload(&self) -> Payload {
        PayloadWriter::new(Self::NAME)
            .unit("unit", self.unit)
            .path("path", &self.path)
            .finish()
    }
}

/// Moves along `path`, then attacks `target` from the destination.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeCommand {
    pub unit: UnitId,
    pub path: Vec<Coord>,
    pub target: UnitId,
    pub damage: i32,
}

impl ChargeCommand {
    pub const NAME: &'static str = "charge";

    pub fn new(unit: UnitId, path: Vec<Coord>, target: UnitId, damage: i32) -> Self {
        Self {
            unit,
            path,
            target,
            damage,
        }
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        Ok(Self::new(
            reader.unit("unit")?,
            reader.path("path")?,
            reader.unit("target")?,
            reader.int("damage")?,
        ))
    }
}

impl CommandTransition for ChargeCommand {
    fn actor(&self) -> Actor {
        Actor::Unit(self.unit)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        vec![self.unit, self.target]
    }

    fn pre_validate(&self, board: &Board, config: &GameConfig) -> Result<(), CommandError> {
        validate_walk(board, self.unit, &self.path)?;
        require_action_point(unit_of(board, self.unit)?)?;
        let destination = *self.path.last().ok_or(CommandError::EmptyPath)?;
        validate_target(
            board,
            config,
            self.unit,
            destination,
            self.target,
            self.damage,
        )
    }

    fn apply(&self, board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        walk(board, self.unit, &self.path)?;
        super::spend_action_point(board, self.unit)?;
        strike(board, self.unit, self.target, self.damage)
    }

    fn to_payload(&self) -> Payload {
        PayloadWriter::new(Self::NAME)
            .unit("unit", self.unit)
            .path("path", &self.path)
            .unit("target", self.target)
            .int("damage", self.damage)
            .finish()
    }
}
