//! Combat resolution.
//!
//! Pure functions over the board: nothing here mutates state. Commands call
//! them to validate targets and compute damage before they touch health.
//!
//! - `calculate_damage`: two-phase damage (dealt by the attacker's rules,
//!   taken by the defender's rules) with the global minimum-damage floor
//! - `is_attackable`: ownership, capability and range check
//! - `targets_in_range`: every enemy a unit could attack from a given cell

pub mod damage;

pub use damage::{calculate_damage, damage_between};

use crate::grid::{Board, Coord};
use crate::unit::{Unit, UnitId};

/// Whether `attacker` could attack `defender` if it stood on `from`.
///
/// Range uses the board's grid distance (Manhattan on squares, cube
/// distance on hexes).
pub fn is_attackable_from(board: &Board, attacker: &Unit, from: Coord, defender: &Unit) -> bool {
    attacker.is_enemy_of(defender)
        && board.rules_for(attacker).can_attack(attacker)
        && board.distance(from, defender.cell()) <= attacker.stats.attack_range
}

pub fn is_attackable(board: &Board, attacker: &Unit, defender: &Unit) -> bool {
    is_attackable_from(board, attacker, attacker.cell(), defender)
}

/// Enemies attackable from `from`, ordered by id.
pub fn targets_in_range(board: &Board, attacker: &Unit, from: Coord) -> Vec<UnitId> {
    board
        .enemies_of(attacker.player)
        .filter(|defender| is_attackable_from(board, attacker, from, defender))
        .map(Unit::id)
        .collect()
}
