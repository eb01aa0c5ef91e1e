use std::collections::{BTreeMap, BTreeSet};

use super::{Board, Cell, Coord, GridShape};

/// Builds rectangular boards of `width` x `height` cells starting at the
/// origin.
#[derive(Clone, Debug)]
pub struct RectangularGenerator {
    width: u32,
    height: u32,
    shape: GridShape,
    cell_size: f32,
    default_cost: f32,
    costs: BTreeMap<Coord, f32>,
    obstacles: BTreeSet<Coord>,
}

impl RectangularGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shape: GridShape::Square,
            cell_size: 1.0,
            default_cost: 1.0,
            costs: BTreeMap::new(),
            obstacles: BTreeSet::new(),
        }
    }

    pub fn with_shape(mut self, shape: GridShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_default_cost(mut self, cost: f32) -> Self {
        self.default_cost = cost;
        self
    }

    pub fn with_cost(mut self, coord: Coord, cost: f32) -> Self {
        self.costs.insert(coord, cost);
        self
    }

    pub fn with_obstacle(mut self, coord: Coord) -> Self {
        self.obstacles.insert(coord);
        self
    }

    pub fn generate(&self) -> Board {
        let mut board = Board::new(self.shape).with_cell_size(self.cell_size);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let coord = Coord::new(x, y);
                let cost = self.costs.get(&coord).copied().unwrap_or(self.default_cost);
                let cell = Cell::new(coord, board.world_position(coord))
                    .with_movement_cost(cost)
                    .with_obstacle(self.obstacles.contains(&coord));
                // Fresh board: no cell has occupants yet.
                let _ = board.insert_cell(cell);
            }
        }
        board
    }
}
