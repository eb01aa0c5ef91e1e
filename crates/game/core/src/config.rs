use serde::{Deserialize, Serialize};

use crate::grid::GridShape;
use crate::pathfinding::PathAlgorithm;

/// Rule constants and tunable parameters for a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Geometry of the board; decides adjacency and distance.
    pub shape: GridShape,

    /// Algorithm answering single-destination path queries.
    pub path_algorithm: PathAlgorithm,

    /// Smallest damage an attack that lands can inflict.
    pub minimum_damage: i32,

    /// World units between the centres of two neighbouring cells.
    pub cell_size: f32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Units that may share one cell (blocking and non-blocking together).
    pub const MAX_OCCUPANTS_PER_CELL: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MINIMUM_DAMAGE: i32 = 1;
    pub const DEFAULT_CELL_SIZE: f32 = 1.0;

    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            path_algorithm: PathAlgorithm::AStar,
            minimum_damage: Self::DEFAULT_MINIMUM_DAMAGE,
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }

    pub fn with_path_algorithm(mut self, algorithm: PathAlgorithm) -> Self {
        self.path_algorithm = algorithm;
        self
    }

    pub fn with_minimum_damage(mut self, minimum_damage: i32) -> Self {
        self.minimum_damage = minimum_damage;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(GridShape::Square)
    }
}
