use std::collections::BTreeMap;

use crate::grid::{Board, Coord};
use crate::unit::Unit;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub to: Coord,
    pub cost: f32,
}

/// Directed weighted graph of the steps one unit may take.
///
/// Edge lists keep the board's neighbour order, which the searches rely on
/// for deterministic tie-breaking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    edges: BTreeMap<Coord, Vec<Edge>>,
    min_cost: f32,
}

impl Graph {
    pub fn for_unit(board: &Board, unit: &Unit) -> Self {
        let rules = board.rules_for(unit);
        let mut edges = BTreeMap::new();
        let mut min_cost = f32::INFINITY;

        for from in board.cells() {
            let outgoing: Vec<Edge> = board
                .neighbours(from.coord())
                .filter(|to| rules.is_cell_traversable(unit, board, from, to))
                .map(|to| Edge {
                    to: to.coord(),
                    cost: rules.movement_cost(unit, from, to),
                })
                .collect();
            for edge in &outgoing {
                min_cost = min_cost.min(edge.cost);
            }
            edges.insert(from.coord(), outgoing);
        }

        Self {
            edges,
            min_cost: if min_cost.is_finite() { min_cost } else { 0.0 },
        }
    }

    pub fn contains(&self, node: Coord) -> bool {
        self.edges.contains_key(&node)
    }

    pub fn edges(&self, node: Coord) -> &[Edge] {
        self.edges.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_cost(&self, from: Coord, to: Coord) -> Option<f32> {
        self.edges(from)
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.cost)
    }

    /// Cheapest edge in the graph; scales the A* heuristic so it never
    /// overestimates.
    pub fn min_cost(&self) -> f32 {
        self.min_cost
    }
}

/// Cost of walking `path` (origin excluded) from the unit's current cell,
/// or `None` if any step is not adjacent, not traversable or leaves the
/// board.
pub fn path_cost(board: &Board, unit: &Unit, path: &[Coord]) -> Option<f32> {
    let rules = board.rules_for(unit);
    let mut current = board.cell(unit.cell())?;
    let mut total = 0.0;
    for step in path {
        let next = board.cell(*step)?;
        if !board.shape().is_adjacent(current.coord(), next.coord())
            || !rules.is_cell_traversable(unit, board, current, next)
        {
            return None;
        }
        total += rules.movement_cost(unit, current, next);
        current = next;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RectangularGenerator;
    use crate::unit::{PlayerId, Traversal, UnitStats, UnitTemplate};

    #[test]
    fn edges_respect_occupancy_and_cost() {
        let mut board = RectangularGenerator::new(3, 1)
            .with_cost(Coord::new(1, 0), 2.0)
            .generate();
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        let id = board.spawn(&soldier, PlayerId(0), Coord::new(0, 0)).unwrap();
        board.spawn(&soldier, PlayerId(1), Coord::new(2, 0)).unwrap();

        let graph = Graph::for_unit(&board, board.unit(id).unwrap());
        assert_eq!(graph.edge_cost(Coord::new(0, 0), Coord::new(1, 0)), Some(2.0));
        assert_eq!(graph.edge_cost(Coord::new(1, 0), Coord::new(2, 0)), None);
        assert_eq!(graph.edge_cost(Coord::new(1, 0), Coord::new(0, 0)), Some(1.0));
    }

    #[test]
    fn allies_can_be_crossed_with_pass_flag() {
        let mut board = RectangularGenerator::new(3, 1).generate();
        let scout = UnitTemplate::new("scout", UnitStats::default())
            .with_traversal(Traversal::PASS_ALLIES);
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        let id = board.spawn(&scout, PlayerId(0), Coord::new(0, 0)).unwrap();
        board.spawn(&soldier, PlayerId(0), Coord::new(1, 0)).unwrap();

        let unit = board.unit(id).unwrap();
        assert_eq!(
            path_cost(&board, unit, &[Coord::new(1, 0), Coord::new(2, 0)]),
            Some(2.0)
        );
        assert_eq!(path_cost(&board, unit, &[Coord::new(2, 0)]), None);
    }
}
