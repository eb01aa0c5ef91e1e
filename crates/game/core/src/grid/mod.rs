//! Grid model: coordinates, shapes, cells and the board arena.
//!
//! Cells are addressed by integer [`Coord`]s. For hexagonal grids the
//! coordinate is an offset coordinate (`x` = column, `y` = row) interpreted
//! through one of four [`HexLayout`] conventions; adjacency and distance are
//! computed in cube space.

mod board;
mod cell;
mod error;
mod generator;

pub use board::{Board, HealthChange};
pub use cell::{Cell, Occupant, OccupantSlots};
pub use error::GridError;
pub use generator::RectangularGenerator;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer grid coordinates; the identity of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position of a cell or unit in world space, used only by presenters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Offset convention used to store hexagonal coordinates.
///
/// `*Row` layouts shift every other row (pointy-top hexes), `*Column`
/// layouts shift every other column (flat-top hexes). `Odd*` shifts odd
/// lines, `Even*` shifts even lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HexLayout {
    OddRow,
    EvenRow,
    OddColumn,
    EvenColumn,
}

/// Cube coordinates of a hex; `q + r + s == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cube {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl Cube {
    const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    pub fn distance(self, other: Cube) -> u32 {
        ((self.q - other.q).unsigned_abs()
            + (self.r - other.r).unsigned_abs()
            + (self.s - other.s).unsigned_abs())
            / 2
    }

    pub fn neighbours(self) -> impl Iterator<Item = Cube> {
        Self::DIRECTIONS
            .into_iter()
            .map(move |(dq, dr)| Cube::new(self.q + dq, self.r + dr))
    }
}

impl HexLayout {
    pub fn to_cube(self, coord: Coord) -> Cube {
        let Coord { x: col, y: row } = coord;
        match self {
            HexLayout::OddRow => Cube::new(col - (row - (row & 1)) / 2, row),
            HexLayout::EvenRow => Cube::new(col - (row + (row & 1)) / 2, row),
            HexLayout::OddColumn => Cube::new(col, row - (col - (col & 1)) / 2),
            HexLayout::EvenColumn => Cube::new(col, row - (col + (col & 1)) / 2),
        }
    }

    pub fn from_cube(self, cube: Cube) -> Coord {
        let Cube { q, r, .. } = cube;
        match self {
            HexLayout::OddRow => Coord::new(q + (r - (r & 1)) / 2, r),
            HexLayout::EvenRow => Coord::new(q + (r + (r & 1)) / 2, r),
            HexLayout::OddColumn => Coord::new(q, r + (q - (q & 1)) / 2),
            HexLayout::EvenColumn => Coord::new(q, r + (q + (q & 1)) / 2),
        }
    }

    fn is_row_layout(self) -> bool {
        matches!(self, HexLayout::OddRow | HexLayout::EvenRow)
    }

    fn shifts(self, line: i32) -> bool {
        let odd = line & 1 == 1;
        match self {
            HexLayout::OddRow | HexLayout::OddColumn => odd,
            HexLayout::EvenRow | HexLayout::EvenColumn => !odd,
        }
    }
}

/// Geometry of the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridShape {
    /// Four-connected squares with Manhattan distance.
    #[default]
    Square,
    /// Six-connected hexes with cube distance.
    Hex(HexLayout),
}

impl GridShape {
    const SQUARE_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    /// Grid distance: Manhattan for squares, cube distance for hexes.
    pub fn distance(self, a: Coord, b: Coord) -> u32 {
        match self {
            GridShape::Square => (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs(),
            GridShape::Hex(layout) => layout.to_cube(a).distance(layout.to_cube(b)),
        }
    }

    /// Coordinates adjacent to `coord`, in a fixed order. The order is part
    /// of the pathfinding tie-breaking contract.
    pub fn neighbours(self, coord: Coord) -> Vec<Coord> {
        match self {
            GridShape::Square => Self::SQUARE_DIRECTIONS
                .iter()
                .map(|&(dx, dy)| coord.offset(dx, dy))
                .collect(),
            GridShape::Hex(layout) => layout
                .to_cube(coord)
                .neighbours()
                .map(|cube| layout.from_cube(cube))
                .collect(),
        }
    }

    pub fn is_adjacent(self, a: Coord, b: Coord) -> bool {
        self.distance(a, b) == 1
    }

    /// Centre of the cell in world space for a given cell size.
    pub fn world_position(self, coord: Coord, cell_size: f32) -> WorldPosition {
        let x = coord.x as f32;
        let y = coord.y as f32;
        match self {
            GridShape::Square => WorldPosition::new(x * cell_size, y * cell_size),
            GridShape::Hex(layout) => {
                let width = 3f32.sqrt() * cell_size / 2.0;
                let height = cell_size * 0.75;
                if layout.is_row_layout() {
                    let shift = if layout.shifts(coord.y) { width / 2.0 } else { 0.0 };
                    WorldPosition::new(x * width + shift, y * height)
                } else {
                    let shift = if layout.shifts(coord.x) { width / 2.0 } else { 0.0 };
                    WorldPosition::new(x * height, y * width + shift)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUTS: [HexLayout; 4] = [
        HexLayout::OddRow,
        HexLayout::EvenRow,
        HexLayout::OddColumn,
        HexLayout::EvenColumn,
    ];

    #[test]
    fn square_distance_is_manhattan() {
        let shape = GridShape::Square;
        assert_eq!(shape.distance(Coord::new(0, 0), Coord::new(4, 4)), 8);
        assert_eq!(shape.distance(Coord::new(-2, 3), Coord::new(1, -1)), 7);
    }

    #[test]
    fn cube_conversion_is_reversible_for_every_layout() {
        for layout in LAYOUTS {
            for x in -3..4 {
                for y in -3..4 {
                    let coord = Coord::new(x, y);
                    assert_eq!(layout.from_cube(layout.to_cube(coord)), coord, "{layout}");
                }
            }
        }
    }

    #[test]
    fn hex_neighbours_are_at_distance_one() {
        for layout in LAYOUTS {
            let shape = GridShape::Hex(layout);
            let centre = Coord::new(2, 3);
            let neighbours = shape.neighbours(centre);
            assert_eq!(neighbours.len(), 6);
            for n in neighbours {
                assert_eq!(shape.distance(centre, n), 1, "{layout} {n}");
            }
        }
    }

    #[test]
    fn odd_row_neighbours_depend_on_row_parity() {
        let shape = GridShape::Hex(HexLayout::OddRow);
        let even_row = shape.neighbours(Coord::new(1, 2));
        assert!(even_row.contains(&Coord::new(0, 1)));
        assert!(!even_row.contains(&Coord::new(2, 1)));

        let odd_row = shape.neighbours(Coord::new(1, 1));
        assert!(odd_row.contains(&Coord::new(2, 0)));
        assert!(!odd_row.contains(&Coord::new(0, 0)));
    }

    #[test]
    fn hex_distance_along_a_row() {
        let shape = GridShape::Hex(HexLayout::EvenColumn);
        assert_eq!(shape.distance(Coord::new(0, 0), Coord::new(4, 0)), 4);
        assert_eq!(shape.distance(Coord::new(0, 0), Coord::new(0, 3)), 3);
    }
}
