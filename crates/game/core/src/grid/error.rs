use crate::error::{ErrorSeverity, GameError};
use crate::unit::UnitId;

use super::Coord;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell {0} does not exist")]
    CellNotFound(Coord),

    #[error("unit {0} does not exist")]
    UnitNotFound(UnitId),

    #[error("unit id {0} is already in use")]
    DuplicateUnit(UnitId),

    #[error("cell {0} is an obstacle")]
    Obstacle(Coord),

    #[error("cell {0} is already taken")]
    Occupied(Coord),

    #[error("cell {0} cannot hold more occupants")]
    CellFull(Coord),

    #[error("no rules registered under {0:?}")]
    UnknownRules(String),

    #[error("occupancy desync for unit {unit} at {coord}")]
    OccupancyDesync { unit: UnitId, coord: Coord },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            GridError::Obstacle(_) | GridError::Occupied(_) | GridError::CellFull(_) => {
                ErrorSeverity::Rejected
            }
            GridError::CellNotFound(_)
            | GridError::UnitNotFound(_)
            | GridError::DuplicateUnit(_)
            | GridError::UnknownRules(_) => ErrorSeverity::InvalidUsage,
            GridError::OccupancyDesync { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::CellNotFound(_) => "GRID_CELL_NOT_FOUND",
            GridError::UnitNotFound(_) => "GRID_UNIT_NOT_FOUND",
            GridError::DuplicateUnit(_) => "GRID_DUPLICATE_UNIT",
            GridError::Obstacle(_) => "GRID_OBSTACLE",
            GridError::Occupied(_) => "GRID_OCCUPIED",
            GridError::CellFull(_) => "GRID_CELL_FULL",
            GridError::UnknownRules(_) => "GRID_UNKNOWN_RULES",
            GridError::OccupancyDesync { .. } => "GRID_OCCUPANCY_DESYNC",
        }
    }
}
