use crate::error::{ErrorSeverity, GameError};
use crate::grid::{Coord, GridError};
use crate::unit::UnitId;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unit {0} does not exist")]
    UnitNotFound(UnitId),

    #[error("cell {0} does not exist")]
    CellNotFound(Coord),

    #[error("path is empty")]
    EmptyPath,

    #[error("path of unit {0} is not walkable")]
    InvalidPath(UnitId),

    #[error("unit {unit} needs {required} movement points but has {available}")]
    InsufficientMovement {
        unit: UnitId,
        required: f32,
        available: f32,
    },

    #[error("unit cannot end its move on {0}")]
    DestinationBlocked(Coord),

    #[error("unit {0} cannot move")]
    CannotMove(UnitId),

    #[error("unit {0} has no action points left")]
    NoActionPoints(UnitId),

    #[error("unit {attacker} cannot attack unit {target}")]
    NotAttackable { attacker: UnitId, target: UnitId },

    #[error("damage {damage} against unit {target} does not match the rules ({expected})")]
    DamageMismatch {
        target: UnitId,
        damage: i32,
        expected: i32,
    },

    #[error("attack names no targets")]
    NoTargets,

    #[error("unit {0} is targeted more than once")]
    DuplicateTarget(UnitId),

    #[error("unit {unit} cannot capture unit {structure}")]
    NotCapturable { unit: UnitId, structure: UnitId },

    #[error("unit id {0} is already in use")]
    SpawnIdTaken(UnitId),

    #[error("cell {0} is out of spawn reach")]
    SpawnOutOfReach(Coord),

    #[error("unit {healer} cannot heal unit {target}")]
    NotHealable { healer: UnitId, target: UnitId },

    #[error("{0} commands cannot be undone")]
    NotUndoable(&'static str),

    #[error("payload field {0:?} is missing")]
    MissingField(String),

    #[error("payload field {key:?} is invalid: {reason}")]
    InvalidField { key: String, reason: String },

    #[error("unknown command type {0:?}")]
    UnknownCommand(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommandError::UnitNotFound(_)
            | CommandError::CellNotFound(_)
            | CommandError::MissingField(_)
            | CommandError::InvalidField { .. }
            | CommandError::UnknownCommand(_) => ErrorSeverity::InvalidUsage,
            CommandError::NotUndoable(_) => ErrorSeverity::Unsupported,
            CommandError::Grid(error) => error.severity(),
            _ => ErrorSeverity::Rejected,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CommandError::UnitNotFound(_) => "COMMAND_UNIT_NOT_FOUND",
            CommandError::CellNotFound(_) => "COMMAND_CELL_NOT_FOUND",
            CommandError::EmptyPath => "COMMAND_EMPTY_PATH",
            CommandError::InvalidPath(_) => "COMMAND_INVALID_PATH",
            CommandError::InsufficientMovement { .. } => "COMMAND_INSUFFICIENT_MOVEMENT",
            CommandError::DestinationBlocked(_) => "COMMAND_DESTINATION_BLOCKED",
            CommandError::CannotMove(_) => "COMMAND_CANNOT_MOVE",
            CommandError::NoActionPoints(_) => "COMMAND_NO_ACTION_POINTS",
            CommandError::NotAttackable { .. } => "COMMAND_NOT_ATTACKABLE",
            CommandError::DamageMismatch { .. } => "COMMAND_DAMAGE_MISMATCH",
            CommandError::NoTargets => "COMMAND_NO_TARGETS",
            CommandError::DuplicateTarget(_) => "COMMAND_DUPLICATE_TARGET",
            CommandError::NotCapturable { .. } => "COMMAND_NOT_CAPTURABLE",
            CommandError::SpawnIdTaken(_) => "COMMAND_SPAWN_ID_TAKEN",
            CommandError::SpawnOutOfReach(_) => "COMMAND_SPAWN_OUT_OF_REACH",
            CommandError::NotHealable { .. } => "COMMAND_NOT_HEALABLE",
            CommandError::NotUndoable(_) => "COMMAND_NOT_UNDOABLE",
            CommandError::MissingField(_) => "COMMAND_MISSING_FIELD",
            CommandError::InvalidField { .. } => "COMMAND_INVALID_FIELD",
            CommandError::UnknownCommand(_) => "COMMAND_UNKNOWN",
            CommandError::Grid(error) => error.error_code(),
        }
    }
}
