use std::collections::BTreeMap;

use tracing::trace;

use crate::grid::{Board, Coord};
use crate::unit::UnitId;

use super::{Graph, PathAlgorithm, PathError, ShortestPaths, a_star, dijkstra};

/// Search results for one unit, valid for a single board revision.
#[derive(Clone, Debug)]
pub struct PathCache {
    unit: UnitId,
    origin: Coord,
    revision: u64,
    algorithm: PathAlgorithm,
    graph: Graph,
    paths: ShortestPaths,
}

impl PathCache {
    pub fn build(board: &Board, unit: UnitId, algorithm: PathAlgorithm) -> Result<Self, PathError> {
        let moving = board.unit(unit).ok_or(PathError::UnitNotFound(unit))?;
        let graph = Graph::for_unit(board, moving);
        let paths = dijkstra(&graph, moving.cell());
        trace!(
            target: "tactics::path",
            unit = %unit,
            origin = %moving.cell(),
            revision = board.revision(),
            reachable = paths.reachable().count(),
            "path cache built"
        );
        Ok(Self {
            unit,
            origin: moving.cell(),
            revision: board.revision(),
            algorithm,
            graph,
            paths,
        })
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn is_fresh(&self, board: &Board) -> bool {
        self.revision == board.revision()
    }

    fn ensure_fresh(&self, board: &Board) -> Result<(), PathError> {
        if self.is_fresh(board) {
            Ok(())
        } else {
            Err(PathError::StaleCache {
                unit: self.unit,
                built: self.revision,
                current: board.revision(),
            })
        }
    }

    /// Cells the unit can end a move on while spending at most
    /// `movement_points`, ordered by coordinate. The origin is excluded.
    pub fn available_destinations(
        &self,
        board: &Board,
        movement_points: f32,
    ) -> Result<Vec<Coord>, PathError> {
        self.ensure_fresh(board)?;
        let unit = board.unit(self.unit).ok_or(PathError::UnitNotFound(self.unit))?;
        let rules = board.rules_for(unit);
        Ok(self
            .paths
            .reachable()
            .filter(|(coord, cost)| *coord != self.origin && *cost <= movement_points)
            .filter(|(coord, _)| {
                board
                    .cell(*coord)
                    .is_some_and(|cell| rules.is_cell_movable_to(unit, board, cell))
            })
            .map(|(coord, _)| coord)
            .collect())
    }

    /// Cheapest path to `destination` with the configured algorithm; empty
    /// when unreachable.
    pub fn find_path(&self, board: &Board, destination: Coord) -> Result<Vec<Coord>, PathError> {
        self.ensure_fresh(board)?;
        if !board.contains(destination) {
            return Err(PathError::CellNotFound(destination));
        }
        Ok(match self.algorithm {
            PathAlgorithm::Dijkstra => self.paths.path_to(destination),
            PathAlgorithm::AStar => a_star(&self.graph, board.shape(), self.origin, destination),
        })
    }

    /// Cost of the cheapest path to `destination`, ignoring movement points.
    pub fn cost_to(&self, board: &Board, destination: Coord) -> Result<Option<f32>, PathError> {
        self.ensure_fresh(board)?;
        Ok(self.paths.cost_to(destination))
    }

    /// Every node reachable with unlimited movement points.
    pub fn reachable(&self, board: &Board) -> Result<Vec<(Coord, f32)>, PathError> {
        self.ensure_fresh(board)?;
        Ok(self.paths.reachable().collect())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

/// Per-unit path caches, invalidated together whenever the board changes.
#[derive(Clone, Debug, Default)]
pub struct PathCacheSet {
    algorithm: PathAlgorithm,
    caches: BTreeMap<UnitId, PathCache>,
}

impl PathCacheSet {
    pub fn new(algorithm: PathAlgorithm) -> Self {
        Self {
            algorithm,
            caches: BTreeMap::new(),
        }
    }

    /// Builds (or rebuilds) the cache of `unit` against the current board.
    pub fn prime(&mut self, board: &Board, unit: UnitId) -> Result<&PathCache, PathError> {
        let cache = PathCache::build(board, unit, self.algorithm)?;
        self.caches.insert(unit, cache);
        self.get(unit)
    }

    /// Returns a fresh cache, priming it when missing or stale.
    pub fn ensure(&mut self, board: &Board, unit: UnitId) -> Result<&PathCache, PathError> {
        let fresh = self
            .caches
            .get(&unit)
            .is_some_and(|cache| cache.is_fresh(board));
        if fresh {
            self.get(unit)
        } else {
            self.prime(board, unit)
        }
    }

    pub fn get(&self, unit: UnitId) -> Result<&PathCache, PathError> {
        self.caches.get(&unit).ok_or(PathError::CacheNotPrimed(unit))
    }

    pub fn invalidate(&mut self, unit: UnitId) {
        self.caches.remove(&unit);
    }

    pub fn invalidate_all(&mut self) {
        self.caches.clear();
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}
