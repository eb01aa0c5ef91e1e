use std::collections::BTreeSet;

use crate::combat::{damage_between, is_attackable_from};
use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::grid::{Board, Coord};
use crate::unit::UnitId;

use super::payload::{PayloadReader, PayloadWriter};
use super::{
    Actor, CommandError, CommandTransition, Payload, require_action_point, spend_action_point,
    unit_of,
};

/// Emits the attack notification and applies the damage.
pub(super) fn strike(
    board: &mut Board,
    attacker: UnitId,
    target: UnitId,
    damage: i32,
) -> Result<(), CommandError> {
    board.emit(GameEvent::UnitAttacked {
        attacker,
        target,
        damage,
    });
    board.modify_health(target, -damage)?;
    Ok(())
}

/// Range check plus a recomputation of the damage: a carried value that
/// differs from what the rules give is rejected.
pub(super) fn validate_target(
    board: &Board,
    config: &GameConfig,
    attacker: UnitId,
    from: Coord,
    target: UnitId,
    damage: i32,
) -> Result<(), CommandError> {
    let attacking = unit_of(board, attacker)?;
    let defending = unit_of(board, target)?;
    if !is_attackable_from(board, attacking, from, defending) {
        return Err(CommandError::NotAttackable { attacker, target });
    }
    let expected = damage_between(board, attacking, defending, config.minimum_damage);
    if damage != expected {
        return Err(CommandError::DamageMismatch {
            target,
            damage,
            expected,
        });
    }
    Ok(())
}

/// Single-target attack. The damage is resolved when the command is
/// created so that replays reproduce it exactly; validation recomputes it
/// and refuses a payload carrying any other value.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackCommand {
    pub attacker: UnitId,
    pub target: UnitId,
    pub damage: i32,
}

impl AttackCommand {
    pub const NAME: &'static str = "attack";

    pub fn new(attacker: UnitId, target: UnitId, damage: i32) -> Self {
        Self {
            attacker,
            target,
            damage,
        }
    }

    /// Builds the command with damage computed from both units' rules.
    pub fn resolve(
        board: &Board,
        config: &GameConfig,
        attacker: UnitId,
        target: UnitId,
    ) -> Result<Self, CommandError> {
        let damage = damage_between(
            board,
            unit_of(board, attacker)?,
            unit_of(board, target)?,
            config.minimum_damage,
        );
        Ok(Self::new(attacker, target, damage))
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        Ok(Self::new(
            reader.unit("attacker")?,
            reader.unit("target")?,
            reader.int("damage")?,
        ))
    }
}

impl CommandTransition for AttackCommand {
    fn actor(&self) -> Actor {
        Actor::Unit(self.attacker)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        vec![self.attacker, self.target]
    }

    fn pre_validate(&self, board: &Board, config: &GameConfig) -> Result<(), CommandError> {
        let attacker = unit_of(board, self.attacker)?;
        require_action_point(attacker)?;
        validate_target(
            board,
            config,
            self.attacker,
            attacker.cell(),
            self.target,
            self.damage,
        )
    }

    fn apply(&self, board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        spend_action_point(board, self.attacker)?;
        strike(board, self.attacker, self.target, self.damage)
    }

    fn to_payload(&self) -> Payload {
        PayloadWriter::new(Self::NAME)
            .unit("attacker", self.attacker)
            .unit("target", self.target)
            .int("damage", self.damage)
            .finish()
    }
}

/// Attack hitting several targets for one action point.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiAttackCommand {
    pub attacker: UnitId,
    /// Targets with their resolved damage, applied in order.
    pub targets: Vec<(UnitId, i32)>,
}

impl MultiAttackCommand {
    pub const NAME: &'static str = "multi_attack";

    pub fn new(attacker: UnitId, targets: Vec<(UnitId, i32)>) -> Self {
        Self { attacker, targets }
    }

    pub fn resolve(
        board: &Board,
        config: &GameConfig,
        attacker: UnitId,
        targets: &[UnitId],
    ) -> Result<Self, CommandError> {
        let resolved = targets
            .iter()
            .map(|target| {
                AttackCommand::resolve(board, config, attacker, *target)
                    .map(|attack| (attack.target, attack.damage))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self::new(attacker, resolved))
    }

    pub(crate) fn from_payload(reader: &PayloadReader<'_>) -> Result<Self, CommandError> {
        let targets = reader
            .list("targets")?
            .into_iter()
            .map(|entry| {
                let entry = reader.nested(entry);
                Ok((entry.unit("unit")?, entry.int("damage")?))
            })
            .collect::<Result<_, CommandError>>()?;
        Ok(Self::new(reader.unit("attacker")?, targets))
    }
}

impl CommandTransition for MultiAttackCommand {
    fn actor(&self) -> Actor {
        Actor::Unit(self.attacker)
    }

    fn touched_units(&self) -> Vec<UnitId> {
        std::iter::once(self.attacker)
            .chain(self.targets.iter().map(|(target, _)| *target))
            .collect()
    }

    fn pre_validate(&self, board: &Board, config: &GameConfig) -> Result<(), CommandError> {
        let attacker = unit_of(board, self.attacker)?;
        require_action_point(attacker)?;
        if self.targets.is_empty() {
            return Err(CommandError::NoTargets);
        }
        let mut seen = BTreeSet::new();
        for (target, damage) in &self.targets {
            if !seen.insert(*target) {
                return Err(CommandError::DuplicateTarget(*target));
            }
            validate_target(board, config, self.attacker, attacker.cell(), *target, *damage)?;
        }
        Ok(())
    }

    fn apply(&self, board: &mut Board, _config: &GameConfig) -> Result<(), CommandError> {
        spend_action_point(board, self.attacker)?;
        for (target, damage) in &self.targets {
            strike(board, self.attacker, *target, *damage)?;
        }
        Ok(())
    }

    fn to_payload(&self) -> Payload {
        let targets = self.targets.iter().map(|(target, damage)| {
            PayloadWriter::default()
                .unit("unit", *target)
                .int("damage", *damage)
                .finish()
        });
        PayloadWriter::new(Self::NAME)
            .unit("attacker", self.attacker)
            .list("targets", targets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Coord, RectangularGenerator};
    use crate::unit::{PlayerId, UnitStats, UnitTemplate};

    fn setup() -> (Board, UnitId, UnitId, UnitId) {
        let mut board = RectangularGenerator::new(3, 3).generate();
        let soldier = UnitTemplate::new("soldier", UnitStats::default());
        let brute = UnitTemplate::new(
            "brute",
            UnitStats {
                attack_factor: 20,
                ..UnitStats::default()
            },
        );
        let attacker = board.spawn(&brute, PlayerId(0), Coord::new(1, 1)).unwrap();
        let left = board.spawn(&soldier, PlayerId(1), Coord::new(0, 1)).unwrap();
        let right = board.spawn(&soldier, PlayerId(1), Coord::new(2, 1)).unwrap();
        (board, attacker, left, right)
    }

    #[test]
    fn attack_spends_action_point_and_damages() {
        let (mut board, attacker, left, _) = setup();
        let config = GameConfig::default();
        let command = AttackCommand::resolve(&board, &config, attacker, left).unwrap();

        command.pre_validate(&board, &config).unwrap();
        command.apply(&mut board, &config).unwrap();

        assert_eq!(board.unit(attacker).unwrap().action_points, 0);
        assert!(board.unit(left).is_none());
        assert_eq!(
            command.pre_validate(&board, &config),
            Err(CommandError::NoActionPoints(attacker))
        );
    }

    #[test]
    fn resolved_damage_uses_rules() {
        let (board, attacker, left, _) = setup();
        let command = AttackCommand::resolve(&board, &GameConfig::default(), attacker, left).unwrap();
        assert_eq!(command.damage, 19);
    }

    #[test]
    fn carried_damage_must_match_the_rules() {
        let (board, attacker, left, right) = setup();
        let config = GameConfig::default();

        for damage in [0, 18, 20] {
            assert_eq!(
                AttackCommand::new(attacker, left, damage).pre_validate(&board, &config),
                Err(CommandError::DamageMismatch {
                    target: left,
                    damage,
                    expected: 19,
                })
            );
        }
        let inflated = MultiAttackCommand::new(attacker, vec![(left, 19), (right, 40)]);
        assert!(matches!(
            inflated.pre_validate(&board, &config),
            Err(CommandError::DamageMismatch {
                target,
                damage: 40,
                expected: 19,
            }) if target == right
        ));
    }

    #[test]
    fn multi_attack_destroys_every_target() {
        let (mut board, attacker, left, right) = setup();
        let config = GameConfig::default();
        let command = MultiAttackCommand::resolve(&board, &config, attacker, &[left, right]).unwrap();

        command.pre_validate(&board, &config).unwrap();
        command.apply(&mut board, &config).unwrap();
        command.post_validate(&board, &config).unwrap();

        assert!(board.unit(left).is_none());
        assert!(board.unit(right).is_none());
        let destroyed = board
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, GameEvent::UnitDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 2);
    }

    #[test]
    fn multi_attack_rejects_duplicates() {
        let (board, attacker, left, _) = setup();
        let command = MultiAttackCommand::new(attacker, vec![(left, 19), (left, 19)]);
        assert_eq!(
            command.pre_validate(&board, &GameConfig::default()),
            Err(CommandError::DuplicateTarget(left))
        );
    }
}
