//! Weighted shortest paths over the board.
//!
//! A [`Graph`] is built per moving unit: edges exist only where the unit's
//! rules allow the step, weighted by the unit's movement cost. Dijkstra
//! answers "every reachable destination"; A* answers single-destination
//! queries. Both break ties in favour of the first-discovered node and
//! return an empty path when the destination cannot be reached.
//!
//! Graphs and their search results are cached per unit in a [`PathCache`]
//! stamped with the board revision it was built from. Querying a stale or
//! missing cache is invalid usage and reported as a [`PathError`].

mod cache;
mod graph;
mod search;

pub use cache::{PathCache, PathCacheSet};
pub use graph::{Edge, Graph, path_cost};
pub use search::{ShortestPaths, a_star, dijkstra};

use serde::{Deserialize, Serialize};

use crate::error::{ErrorSeverity, GameError};
use crate::grid::Coord;
use crate::unit::UnitId;

/// Algorithm used for single-destination queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PathAlgorithm {
    Dijkstra,
    #[default]
    AStar,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path cache of unit {unit} was built at revision {built}, board is at {current}")]
    StaleCache { unit: UnitId, built: u64, current: u64 },

    #[error("no path cache primed for unit {0}")]
    CacheNotPrimed(UnitId),

    #[error("cell {0} does not exist")]
    CellNotFound(Coord),

    #[error("unit {0} does not exist")]
    UnitNotFound(UnitId),
}

impl GameError for PathError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::InvalidUsage
    }

    fn error_code(&self) -> &'static str {
        match self {
            PathError::StaleCache { .. } => "PATH_STALE_CACHE",
            PathError::CacheNotPrimed(_) => "PATH_CACHE_NOT_PRIMED",
            PathError::CellNotFound(_) => "PATH_CELL_NOT_FOUND",
            PathError::UnitNotFound(_) => "PATH_UNIT_NOT_FOUND",
        }
    }
}
