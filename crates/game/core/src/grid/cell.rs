use std::hash::{Hash, Hasher};

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::unit::UnitId;

use super::{Coord, WorldPosition};

/// A unit standing on a cell. Non-blocking occupants (structures) coexist
/// with at most one blocking unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub unit: UnitId,
    pub blocking: bool,
}

pub type OccupantSlots = ArrayVec<Occupant, { GameConfig::MAX_OCCUPANTS_PER_CELL }>;

/// An addressable grid location.
///
/// Equality, ordering and hashing use the coordinates only. Occupancy is
/// only changed through [`super::Board`], which keeps it consistent with
/// each unit's own cell reference.
#[derive(Clone, Debug)]
pub struct Cell {
    coord: Coord,
    world_position: WorldPosition,
    movement_cost: f32,
    obstacle: bool,
    occupants: OccupantSlots,
}

impl Cell {
    pub fn new(coord: Coord, world_position: WorldPosition) -> Self {
        Self {
            coord,
            world_position,
            movement_cost: 1.0,
            obstacle: false,
            occupants: OccupantSlots::new(),
        }
    }

    pub fn with_movement_cost(mut self, movement_cost: f32) -> Self {
        self.movement_cost = movement_cost;
        self
    }

    /// Marks the cell as impassable terrain.
    pub fn with_obstacle(mut self, obstacle: bool) -> Self {
        self.obstacle = obstacle;
        self
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn world_position(&self) -> WorldPosition {
        self.world_position
    }

    /// Intrinsic cost of entering this cell.
    pub fn movement_cost(&self) -> f32 {
        self.movement_cost
    }

    pub fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    /// True iff at least one blocking unit stands here.
    pub fn is_taken(&self) -> bool {
        self.occupants.iter().any(|occupant| occupant.blocking)
    }

    /// Units currently on this cell, blocking or not.
    pub fn current_units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.occupants.iter().map(|occupant| occupant.unit)
    }

    pub fn occupants(&self) -> &OccupantSlots {
        &self.occupants
    }

    pub fn contains_unit(&self, unit: UnitId) -> bool {
        self.occupants.iter().any(|occupant| occupant.unit == unit)
    }

    pub(crate) fn set_obstacle(&mut self, obstacle: bool) {
        self.obstacle = obstacle;
    }

    pub(crate) fn add_occupant(&mut self, occupant: Occupant) -> bool {
        if self.contains_unit(occupant.unit) {
            return true;
        }
        self.occupants.try_push(occupant).is_ok()
    }

    pub(crate) fn remove_occupant(&mut self, unit: UnitId) -> bool {
        match self.occupants.iter().position(|occupant| occupant.unit == unit) {
            Some(index) => {
                self.occupants.remove(index);
                true
            }
            None => false,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.coord.cmp(&other.coord)
    }
}
