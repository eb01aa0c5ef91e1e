//! Per-unit-type movement and combat rules.
//!
//! The board resolves a unit's [`UnitKind`](super::UnitKind) to a
//! `UnitRules` implementation. Built-in kinds map to [`StandardRules`] and
//! [`StructureRules`]; downstream crates register their own implementations
//! under a name and reference it with `UnitKind::Custom`.

use std::fmt;

use crate::grid::{Board, Cell};

use super::{Traversal, Unit, UnitKind};

pub trait UnitRules: Send + Sync + fmt::Debug {
    /// Whether the unit makes its cell taken for other units.
    fn is_blocking(&self, _unit: &Unit) -> bool {
        true
    }

    fn can_move(&self, _unit: &Unit) -> bool {
        true
    }

    fn can_attack(&self, unit: &Unit) -> bool {
        unit.stats.attack_factor > 0
    }

    fn is_capturable(&self, _unit: &Unit) -> bool {
        false
    }

    /// Whether the unit may end a move on `cell`.
    fn is_cell_movable_to(&self, unit: &Unit, _board: &Board, cell: &Cell) -> bool {
        !cell.is_obstacle() && (cell.coord() == unit.cell() || !cell.is_taken())
    }

    /// Whether the unit may step from `from` into `to` while moving.
    ///
    /// Entering its own cell is always allowed; cells taken by other units
    /// can only be crossed when the unit's [`Traversal`] flags allow it.
    fn is_cell_traversable(&self, unit: &Unit, board: &Board, _from: &Cell, to: &Cell) -> bool {
        if to.is_obstacle() {
            return false;
        }
        if to.coord() == unit.cell() || !to.is_taken() {
            return true;
        }
        board
            .blocking_unit_at(to.coord())
            .is_some_and(|other| {
                if other.player == unit.player {
                    unit.traversal.contains(Traversal::PASS_ALLIES)
                } else {
                    unit.traversal.contains(Traversal::PASS_ENEMIES)
                }
            })
    }

    /// Cost of the edge `from -> to`; the destination's intrinsic cost.
    fn movement_cost(&self, _unit: &Unit, _from: &Cell, to: &Cell) -> f32 {
        to.movement_cost()
    }

    /// Raw damage the attacker produces against `defender`.
    fn damage_dealt(&self, attacker: &Unit, _defender: &Unit) -> i32 {
        attacker.stats.attack_factor
    }

    /// Damage the defender actually takes from `dealt`, before the global
    /// minimum-damage floor is applied.
    fn damage_taken(&self, defender: &Unit, dealt: i32) -> i32 {
        dealt - defender.stats.defence_factor
    }
}

/// Rules for ordinary combat units.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl UnitRules for StandardRules {}

/// Rules for structures: they never move or attack, do not block the cell
/// they stand on and may change owner through capture.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructureRules;

impl UnitRules for StructureRules {
    fn is_blocking(&self, _unit: &Unit) -> bool {
        false
    }

    fn can_move(&self, _unit: &Unit) -> bool {
        false
    }

    fn can_attack(&self, _unit: &Unit) -> bool {
        false
    }

    fn is_capturable(&self, unit: &Unit) -> bool {
        matches!(unit.kind(), UnitKind::Structure { capturable: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Coord, RectangularGenerator};
    use crate::unit::{PlayerId, UnitStats, UnitTemplate};

    #[test]
    fn traversal_flags_open_occupied_cells() {
        let mut board = RectangularGenerator::new(3, 1).generate();
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        let scout = soldier.clone().with_traversal(Traversal::PASS_ALLIES);
        let walker = board.spawn(&soldier, PlayerId(0), Coord::new(0, 0)).unwrap();
        let runner = board.spawn(&scout, PlayerId(0), Coord::new(2, 0)).unwrap();
        board.spawn(&soldier, PlayerId(0), Coord::new(1, 0)).unwrap();

        let from = board.cell(Coord::new(0, 0)).unwrap();
        let middle = board.cell(Coord::new(1, 0)).unwrap();
        let walker = board.unit(walker).unwrap();
        let runner = board.unit(runner).unwrap();

        assert!(!StandardRules.is_cell_traversable(walker, &board, from, middle));
        assert!(StandardRules.is_cell_traversable(runner, &board, from, middle));
        assert!(!StandardRules.is_cell_movable_to(runner, &board, middle));
        assert!(StandardRules.is_cell_traversable(walker, &board, middle, from));
    }

    #[test]
    fn structures_share_cells_and_stay_put() {
        let mut board = RectangularGenerator::new(1, 1).generate();
        let town = UnitTemplate::new("town", UnitStats::default())
            .with_kind(UnitKind::Structure { capturable: true });
        let id = board.spawn(&town, PlayerId(1), Coord::ORIGIN).unwrap();
        let town = board.unit(id).unwrap();

        assert!(!StructureRules.is_blocking(town));
        assert!(!StructureRules.can_move(town));
        assert!(!StructureRules.can_attack(town));
        assert!(StructureRules.is_capturable(town));
        assert!(!board.cell(Coord::ORIGIN).unwrap().is_taken());
    }
}
