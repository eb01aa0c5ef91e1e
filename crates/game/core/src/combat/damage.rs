//! Damage calculation.

use crate::grid::Board;
use crate::unit::{Unit, UnitRules};

/// Two-phase damage.
///
/// ```text
/// dealt = attacker_rules.damage_dealt(attacker, defender)
/// taken = defender_rules.damage_taken(defender, dealt)
/// final = max(taken, minimum)
/// ```
///
/// The floor guarantees that every landed attack makes progress.
pub fn calculate_damage(
    attacker_rules: &dyn UnitRules,
    attacker: &Unit,
    defender_rules: &dyn UnitRules,
    defender: &Unit,
    minimum: i32,
) -> i32 {
    let dealt = attacker_rules.damage_dealt(attacker, defender);
    defender_rules.damage_taken(defender, dealt).max(minimum)
}

/// [`calculate_damage`] with both rule sets resolved through the board.
pub fn damage_between(board: &Board, attacker: &Unit, defender: &Unit, minimum: i32) -> i32 {
    calculate_damage(
        board.rules_for(attacker),
        attacker,
        board.rules_for(defender),
        defender,
        minimum,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use crate::unit::{PlayerId, StandardRules, UnitId, UnitStats, UnitTemplate};

    fn unit(attack_factor: i32, defence_factor: i32) -> Unit {
        UnitTemplate::new(
            "unit",
            UnitStats {
                attack_factor,
                defence_factor,
                ..UnitStats::default()
            },
        )
        .instantiate(UnitId(0), PlayerId(0), Coord::ORIGIN)
    }

    #[test]
    fn defence_is_subtracted_from_attack() {
        let damage = calculate_damage(&StandardRules, &unit(5, 0), &StandardRules, &unit(0, 2), 1);
        assert_eq!(damage, 3);
    }

    #[test]
    fn damage_never_drops_below_floor() {
        for (attack, defence) in [(1, 1), (1, 10), (0, 0), (3, 99)] {
            let damage =
                calculate_damage(&StandardRules, &unit(attack, 0), &StandardRules, &unit(0, defence), 1);
            assert!(damage >= 1, "attack {attack} defence {defence} gave {damage}");
        }
    }

    #[derive(Debug)]
    struct Armoured;

    impl UnitRules for Armoured {
        fn damage_taken(&self, _defender: &Unit, dealt: i32) -> i32 {
            dealt / 2
        }
    }

    #[test]
    fn defender_rules_override_damage_taken() {
        let damage = calculate_damage(&StandardRules, &unit(9, 0), &Armoured, &unit(0, 0), 1);
        assert_eq!(damage, 4);
    }
}
